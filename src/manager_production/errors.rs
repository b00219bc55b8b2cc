use std::fmt;
use std::fmt::Formatter;
use spa_sra::errors::SpaError;
use crate::manager_weather::errors::WeatherError;

#[derive(Debug)]
pub enum ProdError {
    Weather(WeatherError),
    Validation(String),
    InvalidArgument(String),
}

impl fmt::Display for ProdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProdError::Weather(e)         => write!(f, "ProdError::{}", e),
            ProdError::Validation(e)      => write!(f, "ProdError::Validation: {}", e),
            ProdError::InvalidArgument(e) => write!(f, "ProdError::InvalidArgument: {}", e),
        }
    }
}
impl From<WeatherError> for ProdError {
    fn from(e: WeatherError) -> Self { ProdError::Weather(e) }
}
impl From<SpaError> for ProdError {
    fn from(e: SpaError) -> Self { ProdError::InvalidArgument(e.to_string()) }
}
