use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use crate::serialize_timestamp;

/// One hour of weather at the site
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeatherSample {
    #[serde(with = "serialize_timestamp")]
    pub time: DateTime<Local>,
    pub temperature: f64,
    pub ghi: f64,
    pub dni: f64,
    pub dhi: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub precipitation: f64,
    pub snow_fraction: f64,
    pub snow_load: f64,
}

impl WeatherSample {
    pub fn irradiance(&self) -> Irradiance {
        Irradiance { time: self.time, ghi: self.ghi, dni: self.dni, dhi: self.dhi }
    }
}

/// Horizontal irradiance components in W/m²
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Irradiance {
    #[serde(with = "serialize_timestamp")]
    pub time: DateTime<Local>,
    pub ghi: f64,
    pub dni: f64,
    pub dhi: f64,
}

/// Apparent sun position, azimuth in degrees clockwise from north
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SolarPosition {
    #[serde(with = "serialize_timestamp")]
    pub time: DateTime<Local>,
    pub apparent_zenith: f64,
    pub azimuth: f64,
    pub apparent_elevation: f64,
}

/// Panel orientation, tilt from horizontal and azimuth clockwise from north (180 is south)
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrackerOrientation {
    #[serde(with = "serialize_timestamp")]
    pub time: DateTime<Local>,
    pub surface_tilt: f64,
    pub surface_azimuth: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PoaIrradiance {
    #[serde(with = "serialize_timestamp")]
    pub time: DateTime<Local>,
    pub poa_global: f64,
    pub poa_direct: f64,
    pub poa_diffuse: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PowerSample {
    #[serde(with = "serialize_timestamp")]
    pub time: DateTime<Local>,
    pub dc: f64,
    pub ac: f64,
}

/// Everything a pipeline run produces for one day
#[derive(Serialize)]
pub struct Estimate {
    pub orientation: Vec<TrackerOrientation>,
    pub poa: Vec<PoaIrradiance>,
    pub power: Vec<PowerSample>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MountType {
    Fixed,
    DualAxis,
}

impl FromStr for MountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(MountType::Fixed),
            "dual_axis" => Ok(MountType::DualAxis),
            _ => Err(format!("mount type '{}' is not supported, use 'fixed' or 'dual_axis'", s)),
        }
    }
}

impl fmt::Display for MountType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MountType::Fixed => write!(f, "fixed"),
            MountType::DualAxis => write!(f, "dual_axis"),
        }
    }
}

/// Selects the weather source of a pipeline run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductVersion {
    WithForecast,
    WithoutForecast,
}

impl FromStr for ProductVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "with_forecast" => Ok(ProductVersion::WithForecast),
            "without_forecast" => Ok(ProductVersion::WithoutForecast),
            _ => Err(format!("product version '{}' is not supported, use 'with_forecast' or 'without_forecast'", s)),
        }
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProductVersion::WithForecast => write!(f, "with_forecast"),
            ProductVersion::WithoutForecast => write!(f, "without_forecast"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_type_parses_known_values() {
        assert_eq!("fixed".parse::<MountType>(), Ok(MountType::Fixed));
        assert_eq!("dual_axis".parse::<MountType>(), Ok(MountType::DualAxis));
    }

    #[test]
    fn mount_type_rejects_unknown_value() {
        assert!("invalid".parse::<MountType>().is_err());
        assert!("Fixed".parse::<MountType>().is_err());
    }

    #[test]
    fn product_version_round_trips_through_display() {
        for v in [ProductVersion::WithForecast, ProductVersion::WithoutForecast] {
            assert_eq!(v.to_string().parse::<ProductVersion>(), Ok(v));
        }
    }
}
