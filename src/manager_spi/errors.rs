use std::fmt;
use std::fmt::Formatter;

#[derive(Debug)]
pub enum SpiError {
    HardwareIo(String),
    InvalidArgument(String),
}

impl fmt::Display for SpiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SpiError::HardwareIo(e)      => write!(f, "SpiError::HardwareIo: {}", e),
            SpiError::InvalidArgument(e) => write!(f, "SpiError::InvalidArgument: {}", e),
        }
    }
}
impl From<rppal::spi::Error> for SpiError {
    fn from(e: rppal::spi::Error) -> Self { SpiError::HardwareIo(e.to_string()) }
}
