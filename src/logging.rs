use std::str::FromStr;
use log::LevelFilter;
use crate::errors::UnrecoverableError;

/// Sets up the global logger
///
/// The level from config is the default, RUST_LOG still wins when set
///
/// # Arguments
///
/// * 'level' - one of off, error, warn, info, debug, trace
pub fn init(level: &str) -> Result<(), UnrecoverableError> {
    let level = LevelFilter::from_str(level)
        .map_err(|_| UnrecoverableError(format!("unknown log level '{}'", level)))?;

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()?;

    Ok(())
}
