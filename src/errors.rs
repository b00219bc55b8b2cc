use std::fmt;
use std::fmt::Formatter;

/// Errors that stop the service from starting or keep it from running
#[derive(Debug)]
pub struct UnrecoverableError(pub String);

impl fmt::Display for UnrecoverableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "UnrecoverableError: {}", self.0)
    }
}
impl From<&str> for UnrecoverableError {
    fn from(e: &str) -> Self { UnrecoverableError(e.to_string()) }
}
impl From<std::io::Error> for UnrecoverableError {
    fn from(e: std::io::Error) -> Self { UnrecoverableError(e.to_string()) }
}
impl From<toml::de::Error> for UnrecoverableError {
    fn from(e: toml::de::Error) -> Self { UnrecoverableError(format!("config: {}", e)) }
}
impl From<log::SetLoggerError> for UnrecoverableError {
    fn from(e: log::SetLoggerError) -> Self { UnrecoverableError(e.to_string()) }
}
