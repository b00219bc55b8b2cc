pub mod errors;
mod models;
mod tmy;

pub use tmy::Tmy;

use std::time::Duration;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};
use log::{debug, info};
use reqwest::Client;
use crate::initialization::WeatherConfig;
use crate::manager_weather::errors::WeatherError;
use crate::manager_weather::models::ForecastResponse;
use crate::models::WeatherSample;

/// The forecast starts at hour 0 of today, the second day is what gets used
const FORECAST_START: usize = 24;
const FORECAST_END: usize = 48;

/// Weather forecast manager
///
pub struct Weather {
    client: Client,
    url: String,
    api_key: String,
    elevation: f64,
}

impl Weather {

    /// Returns a new instance of Weather
    ///
    /// # Arguments
    ///
    /// * 'config' - forecast provider configuration
    /// * 'elevation' - site elevation in meters above sea level
    pub fn new(config: &WeatherConfig, elevation: f64) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, url: config.url.to_string(), api_key: config.api_key.to_string(), elevation })
    }

    /// Returns tomorrow's hourly weather forecast for the given position
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude in decimal degrees
    /// * 'lon' - longitude in decimal degrees
    pub async fn get_forecast(&self, lat: f64, lon: f64) -> Result<Vec<WeatherSample>, WeatherError> {
        let query = [
            ("apikey", self.api_key.to_string()),
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("asl", self.elevation.to_string()),
            ("format", "json".to_string()),
        ];

        debug!("requesting forecast for lat {}, lon {}", lat, lon);
        let req = self.client.get(&self.url)
            .query(&query)
            .send().await?;

        let status = req.status();
        if !status.is_success() {
            return Err(WeatherError::Network(format!("{:?}", status)));
        }

        let json = req.text().await?;
        let forecast = parse_forecast(&json)?;
        info!("got {} forecast hours starting {}", forecast.len(), forecast[0].time);

        Ok(forecast)
    }
}

/// Parses a forecast document and returns the second day of hourly samples
///
/// # Arguments
///
/// * 'json' - the forecast response body
fn parse_forecast(json: &str) -> Result<Vec<WeatherSample>, WeatherError> {
    let res: ForecastResponse = serde_json::from_str(json)?;
    let data = res.data_1h;

    let offset = FixedOffset::east_opt((res.metadata.utc_timeoffset * 3600.0).round() as i32)
        .ok_or(WeatherError::Schema(format!("utc_timeoffset {} out of range", res.metadata.utc_timeoffset)))?;

    let time = second_day("time", &data.time)?;
    let temperature = second_day("temperature", &data.temperature)?;
    let ghi = second_day("ghi_instant", &data.ghi_instant)?;
    let dni = second_day("dni_instant", &data.dni_instant)?;
    let dhi = second_day("dif_instant", &data.dif_instant)?;
    let wind_speed = second_day("windspeed", &data.windspeed)?;
    let wind_direction = second_day("winddirection", &data.winddirection)?;
    let precipitation = second_day("precipitation", &data.precipitation)?;
    let snow_fraction = second_day("snowfraction", &data.snowfraction)?;

    let mut result: Vec<WeatherSample> = Vec::with_capacity(FORECAST_END - FORECAST_START);
    for i in 0..time.len() {
        result.push(WeatherSample {
            time: parse_time(&time[i], offset)?,
            temperature: temperature[i],
            ghi: ghi[i],
            dni: dni[i],
            dhi: dhi[i],
            wind_speed: wind_speed[i],
            wind_direction: wind_direction[i],
            precipitation: precipitation[i],
            snow_fraction: snow_fraction[i],
            snow_load: precipitation[i] * snow_fraction[i],
        });
    }

    Ok(result)
}

/// Returns the slice covering the second forecast day of a field
///
/// # Arguments
///
/// * 'name' - field name, used in the error message
/// * 'values' - all hourly values of the field
fn second_day<'a, T>(name: &str, values: &'a [T]) -> Result<&'a [T], WeatherError> {
    if values.len() < FORECAST_END {
        return Err(WeatherError::Schema(
            format!("field {} has {} hourly entries, at least {} needed", name, values.len(), FORECAST_END)));
    }

    Ok(&values[FORECAST_START..FORECAST_END])
}

/// Parses a site local timestamp like '2024-05-02 13:00'
///
/// # Arguments
///
/// * 'time' - timestamp text from the forecast
/// * 'offset' - the site's offset from UTC
fn parse_time(time: &str, offset: FixedOffset) -> Result<DateTime<Local>, WeatherError> {
    let naive = NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M")?;

    Ok(naive.and_local_timezone(offset)
        .single()
        .ok_or(WeatherError::Schema(format!("ambiguous timestamp {}", time)))?
        .with_timezone(&Local))
}
