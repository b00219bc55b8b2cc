use std::env;
use std::fs;
use serde::Deserialize;
use crate::errors::UnrecoverableError;
use crate::logging;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Clone, Deserialize)]
pub struct WebServer {
    pub bind_address: String,
    pub bind_port: u16,
}

/// Forecast provider settings, the api key used to be part of a hard coded url
#[derive(Clone, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_forecast_url")]
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Clone, Deserialize)]
pub struct TmyConfig {
    #[serde(default = "default_tmy_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Clone, Deserialize)]
pub struct GeoRef {
    pub lat: f64,
    pub long: f64,
    #[serde(default = "default_elevation")]
    pub elevation: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PvSystemConfig {
    /// Nameplate DC capacity in W
    #[serde(default = "default_pdc0")]
    pub pdc0: f64,
    /// Temperature coefficient of power in 1/°C
    #[serde(default = "default_gamma_pdc")]
    pub gamma_pdc: f64,
    /// Inverter DC input rating in W
    #[serde(default = "default_inverter_pdc0")]
    pub inverter_pdc0: f64,
    #[serde(default = "default_eta_inv_nom")]
    pub eta_inv_nom: f64,
    #[serde(default = "default_eta_inv_ref")]
    pub eta_inv_ref: f64,
    #[serde(default = "default_albedo")]
    pub albedo: f64,
    #[serde(default)]
    pub thermal: ThermalConfig,
}

impl Default for PvSystemConfig {
    fn default() -> Self {
        Self {
            pdc0: default_pdc0(),
            gamma_pdc: default_gamma_pdc(),
            inverter_pdc0: default_inverter_pdc0(),
            eta_inv_nom: default_eta_inv_nom(),
            eta_inv_ref: default_eta_inv_ref(),
            albedo: default_albedo(),
            thermal: ThermalConfig::default(),
        }
    }
}

/// SAPM thermal model parameters, defaults are open rack glass/polymer
#[derive(Clone, Debug, Deserialize)]
pub struct ThermalConfig {
    pub a: f64,
    pub b: f64,
    pub delta_t: f64,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self { a: -3.56, b: -0.075, delta_t: 3.0 }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_max_tilt")]
    pub max_tilt: f64,
    #[serde(default = "default_fixed_tilt")]
    pub fixed_tilt: f64,
    #[serde(default = "default_fixed_azimuth")]
    pub fixed_azimuth: f64,
    #[serde(default = "default_linke_turbidity")]
    pub linke_turbidity: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_tilt: default_max_tilt(),
            fixed_tilt: default_fixed_tilt(),
            fixed_azimuth: default_fixed_azimuth(),
            linke_turbidity: default_linke_turbidity(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpiConfig {
    #[serde(default = "default_spi_bus")]
    pub bus: u8,
    #[serde(default)]
    pub slave_select: u8,
    #[serde(default)]
    pub mode: u8,
    #[serde(default = "default_clock_speed")]
    pub clock_speed: u32,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self { bus: default_spi_bus(), slave_select: 0, mode: 0, clock_speed: default_clock_speed() }
    }
}

#[derive(Clone, Deserialize)]
pub struct General {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for General {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

#[derive(Clone, Deserialize)]
pub struct Config {
    pub web_server: WebServer,
    pub weather: WeatherConfig,
    pub tmy: TmyConfig,
    pub geo_ref: GeoRef,
    #[serde(default)]
    pub pv_system: PvSystemConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub spi: SpiConfig,
    #[serde(default)]
    pub general: General,
}

/// Loads the configuration file and sets up logging
///
/// The config file path is taken from the first program argument, falling back
/// to 'config.toml' in the current directory
pub fn config() -> Result<Config, UnrecoverableError> {
    let path = env::args().nth(1).unwrap_or(DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&path)?;

    logging::init(&config.general.log_level)?;

    Ok(config)
}

/// Reads and parses a config file
///
/// # Arguments
///
/// * 'path' - path to the toml config file
pub fn load_config(path: &str) -> Result<Config, UnrecoverableError> {
    let text = fs::read_to_string(path)
        .map_err(|e| UnrecoverableError(format!("unable to read config file {}: {}", path, e)))?;

    parse_config(&text)
}

pub(crate) fn parse_config(text: &str) -> Result<Config, UnrecoverableError> {
    let config: Config = toml::from_str(text)?;

    Ok(config)
}

fn default_forecast_url() -> String { "https://my.meteoblue.com/packages/basic-1h_solar-1h".to_string() }
fn default_tmy_url() -> String { "https://re.jrc.ec.europa.eu/api/v5_2/tmy".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_elevation() -> f64 { 279.0 }
fn default_pdc0() -> f64 { 12e3 }
fn default_gamma_pdc() -> f64 { -0.004 }
fn default_inverter_pdc0() -> f64 { 10000.0 / 0.96 }
fn default_eta_inv_nom() -> f64 { 0.96 }
fn default_eta_inv_ref() -> f64 { 0.9637 }
fn default_albedo() -> f64 { 0.25 }
fn default_max_tilt() -> f64 { 30.0 }
fn default_fixed_tilt() -> f64 { 30.0 }
fn default_fixed_azimuth() -> f64 { 180.0 }
fn default_linke_turbidity() -> f64 { 3.0 }
fn default_spi_bus() -> u8 { 1 }
fn default_clock_speed() -> u32 { 500_000 }
fn default_log_level() -> String { "info".to_string() }
