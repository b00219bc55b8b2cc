use std::fmt;
use std::fmt::Formatter;
use chrono::ParseError;

#[derive(Debug)]
pub enum WeatherError {
    Network(String),
    Schema(String),
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::Network(e) => write!(f, "WeatherError::Network: {}", e),
            WeatherError::Schema(e)  => write!(f, "WeatherError::Schema: {}", e),
        }
    }
}
impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self { WeatherError::Network(e.to_string()) }
}
impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self { WeatherError::Schema(e.to_string()) }
}
impl From<ParseError> for WeatherError {
    fn from(e: ParseError) -> Self { WeatherError::Schema(e.to_string()) }
}
