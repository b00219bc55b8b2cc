use std::time::Duration;
use chrono::{DateTime, Datelike, Local, NaiveDateTime, Timelike};
use log::{debug, info};
use reqwest::Client;
use crate::initialization::TmyConfig;
use crate::manager_weather::errors::WeatherError;
use crate::manager_weather::models::{TmyHour, TmyResponse};
use crate::models::WeatherSample;

/// Typical meteorological year manager
///
pub struct Tmy {
    client: Client,
    url: String,
}

impl Tmy {

    /// Returns a new instance of Tmy
    ///
    /// # Arguments
    ///
    /// * 'config' - climatology source configuration
    pub fn new(config: &TmyConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, url: config.url.to_string() })
    }

    /// Returns climatological weather for the calendar day of the given hours,
    /// one sample per given hour
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude in decimal degrees
    /// * 'lon' - longitude in decimal degrees
    /// * 'times' - the hours to return samples for, all on the same day
    pub async fn get_tmy_day(&self, lat: f64, lon: f64, times: &[DateTime<Local>]) -> Result<Vec<WeatherSample>, WeatherError> {
        let query = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("outputformat", "json".to_string()),
        ];

        debug!("requesting tmy for lat {}, lon {}", lat, lon);
        let req = self.client.get(&self.url)
            .query(&query)
            .send().await?;

        let status = req.status();
        if !status.is_success() {
            return Err(WeatherError::Network(format!("{:?}", status)));
        }

        let json = req.text().await?;
        let result = parse_tmy_day(&json, times)?;
        info!("got {} tmy hours", result.len());

        Ok(result)
    }
}

#[derive(Clone, Copy, Default)]
struct HourSum {
    temperature: f64,
    ghi: f64,
    dni: f64,
    dhi: f64,
    wind_speed: f64,
    wind_direction: f64,
    count: usize,
}

/// Averages all TMY rows that fall on the calendar day of 'times' by local hour of day
///
/// A typical year is stitched from non leap years, so Feb 29 takes the rows of Feb 28
/// unless the document actually has Feb 29 rows.
///
/// # Arguments
///
/// * 'json' - PVGIS tmy document
/// * 'times' - the hours to return samples for
fn parse_tmy_day(json: &str, times: &[DateTime<Local>]) -> Result<Vec<WeatherSample>, WeatherError> {
    let Some(first) = times.first() else {
        return Ok(Vec::new());
    };

    let res: TmyResponse = serde_json::from_str(json)?;
    let rows = res.outputs.tmy_hourly.iter()
        .map(|row| Ok((NaiveDateTime::parse_from_str(&row.time, "%Y%m%d:%H%M")?.and_utc().with_timezone(&Local), row)))
        .collect::<Result<Vec<(DateTime<Local>, &TmyHour)>, WeatherError>>()?;

    let (mut month, mut day) = (first.month(), first.day());
    if (month, day) == (2, 29) && !rows.iter().any(|(local, _)| local.month() == 2 && local.day() == 29) {
        debug!("no tmy rows for 02-29, using 02-28");
        (month, day) = (2, 28);
    }

    let mut sums = [HourSum::default(); 24];
    for (local, row) in rows.iter().filter(|(local, _)| local.month() == month && local.day() == day) {
        let s = &mut sums[local.hour() as usize];
        s.temperature += row.temp_air;
        s.ghi += row.ghi;
        s.dni += row.dni;
        s.dhi += row.dhi;
        s.wind_speed += row.wind_speed;
        s.wind_direction += row.wind_direction;
        s.count += 1;
    }

    times.iter()
        .map(|&time| {
            let s = sums[time.hour() as usize];
            if s.count == 0 {
                return Err(WeatherError::Schema(format!("no tmy data for {:02}-{:02} hour {}", month, day, time.hour())));
            }
            let n = s.count as f64;

            Ok(WeatherSample {
                time,
                temperature: s.temperature / n,
                ghi: s.ghi / n,
                dni: s.dni / n,
                dhi: s.dhi / n,
                wind_speed: s.wind_speed / n,
                wind_direction: s.wind_direction / n,
                precipitation: 0.0,
                snow_fraction: 0.0,
                snow_load: 0.0,
            })
        })
        .collect()
}
