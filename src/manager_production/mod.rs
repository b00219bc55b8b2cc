pub mod errors;
pub mod power;

use std::ops::Add;
use chrono::{DateTime, Local, NaiveDate, TimeDelta, Timelike};
use log::info;
use crate::initialization::{Config, GeoRef, TrackerConfig};
use crate::manager_production::errors::ProdError;
use crate::manager_production::power::{plane_of_array, pv_generation};
use crate::manager_solar::{clear_sky, mask_night, solar_positions};
use crate::manager_weather::{Tmy, Weather};
use crate::models::{Estimate, Irradiance, MountType, ProductVersion, SolarPosition, TrackerOrientation};

/// Runs the orientation and yield estimation for one site and day
pub struct Pipeline<'a> {
    config: &'a Config,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Returns tracker orientation, plane of array irradiance and power for tomorrow
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude in decimal degrees
    /// * 'lon' - longitude in decimal degrees
    /// * 'mount_type' - 'fixed' or 'dual_axis'
    /// * 'product_version' - 'with_forecast' or 'without_forecast'
    pub async fn estimate(&self, lat: f64, lon: f64, mount_type: &str, product_version: &str) -> Result<Estimate, ProdError> {
        let mount_type: MountType = mount_type.parse().map_err(ProdError::InvalidArgument)?;
        let product_version: ProductVersion = product_version.parse().map_err(ProdError::InvalidArgument)?;
        let site = GeoRef { lat, long: lon, elevation: self.config.geo_ref.elevation };

        info!("estimating {} mount at lat {}, lon {} {}", mount_type, lat, lon, product_version);

        match product_version {
            ProductVersion::WithForecast => self.with_forecast(&site, mount_type).await,
            ProductVersion::WithoutForecast => self.without_forecast(&site, mount_type).await,
        }
    }

    async fn with_forecast(&self, site: &GeoRef, mount_type: MountType) -> Result<Estimate, ProdError> {
        let weather = Weather::new(&self.config.weather, site.elevation)?
            .get_forecast(site.lat, site.long).await?;

        let times = weather.iter().map(|w| w.time).collect::<Vec<DateTime<Local>>>();
        let positions = solar_positions(site, &times)?;
        let orientation = tracker_orientation(mount_type, &mask_night(&positions), &self.config.tracker);

        let irradiance = weather.iter().map(|w| w.irradiance()).collect::<Vec<Irradiance>>();
        let poa = plane_of_array(&orientation, &positions, &irradiance, self.config.pv_system.albedo)?;
        let power = pv_generation(&poa, &weather, &self.config.pv_system)?;

        Ok(Estimate { orientation, poa, power })
    }

    async fn without_forecast(&self, site: &GeoRef, mount_type: MountType) -> Result<Estimate, ProdError> {
        let times = create_time_series()?;
        ensure_single_day(&times)?;

        let positions = solar_positions(site, &times)?;
        let orientation = tracker_orientation(mount_type, &mask_night(&positions), &self.config.tracker);

        let irradiance = clear_sky(&positions, site.elevation, self.config.tracker.linke_turbidity);
        let poa = plane_of_array(&orientation, &positions, &irradiance, self.config.pv_system.albedo)?;

        let weather = Tmy::new(&self.config.tmy)?
            .get_tmy_day(site.lat, site.long, &times).await?;
        let power = pv_generation(&poa, &weather, &self.config.pv_system)?;

        Ok(Estimate { orientation, poa, power })
    }
}

/// Returns the 24 hours of tomorrow, 00:00 to 23:00 local time
///
pub fn create_time_series() -> Result<Vec<DateTime<Local>>, ProdError> {
    time_series_after(Local::now())
}

/// Returns the wall clock hours 00:00 to 23:00 of the day after 'now'
///
/// An hour skipped by a daylight saving change resolves to the instant right after the gap.
///
/// # Arguments
///
/// * 'now' - the point in time to count from
pub fn time_series_after(now: DateTime<Local>) -> Result<Vec<DateTime<Local>>, ProdError> {
    let day = now.date_naive()
        .succ_opt()
        .ok_or(ProdError::Validation(format!("no day after {}", now)))?;

    (0..24)
        .map(|h| local_hour(day, h))
        .collect::<Result<Vec<DateTime<Local>>, ProdError>>()
}

/// Resolves a wall clock hour to local time, the earlier instant if the hour is repeated
///
/// # Arguments
///
/// * 'day' - calendar day
/// * 'hour' - hour of day, 0 to 23
fn local_hour(day: NaiveDate, hour: u32) -> Result<DateTime<Local>, ProdError> {
    let naive = day.and_hms_opt(hour, 0, 0)
        .ok_or(ProdError::Validation(format!("no hour {} on {}", hour, day)))?;

    naive.and_local_timezone(Local).earliest()
        .or_else(|| (naive - TimeDelta::hours(1))
            .and_local_timezone(Local).earliest()
            .map(|t| t.add(TimeDelta::hours(1))))
        .ok_or(ProdError::Validation(format!("{} does not exist in local time", naive)))
}

/// Fails unless all points in time are on the same calendar day
///
/// # Arguments
///
/// * 'times' - ordered points in time
pub fn ensure_single_day(times: &[DateTime<Local>]) -> Result<(), ProdError> {
    if let (Some(first), Some(last)) = (times.first(), times.last()) {
        if first.date_naive() != last.date_naive() {
            return Err(ProdError::Validation(
                format!("time series spans more than one day, {} to {}", first, last)));
        }
    }

    Ok(())
}

/// Returns panel orientation for every sun position
///
/// # Arguments
///
/// * 'mount_type' - fixed or discontinuous dual axis
/// * 'positions' - sun positions with night already masked
/// * 'tracker' - fixed orientation and mechanical tilt limit
pub fn tracker_orientation(mount_type: MountType, positions: &[SolarPosition], tracker: &TrackerConfig) -> Vec<TrackerOrientation> {
    match mount_type {
        MountType::Fixed => positions.iter()
            .map(|p| TrackerOrientation {
                time: p.time,
                surface_tilt: tracker.fixed_tilt,
                surface_azimuth: tracker.fixed_azimuth,
            })
            .collect(),
        MountType::DualAxis => hold_hourly(positions).into_iter()
            .map(|p| TrackerOrientation {
                time: p.time,
                surface_tilt: p.apparent_zenith.min(tracker.max_tilt),
                surface_azimuth: p.azimuth,
            })
            .collect(),
    }
}

/// Zero-order hold, each position takes the angles of the first position in its clock hour
///
/// The tracker moves once per hour and stays put until the next hour starts.
///
/// # Arguments
///
/// * 'positions' - time ordered sun positions
pub fn hold_hourly(positions: &[SolarPosition]) -> Vec<SolarPosition> {
    let mut held: Option<(NaiveDate, u32, SolarPosition)> = None;

    positions.iter()
        .map(|p| {
            let (date, hour) = (p.time.date_naive(), p.time.hour());
            match held {
                Some((d, h, first)) if d == date && h == hour => SolarPosition { time: p.time, ..first },
                _ => {
                    held = Some((date, hour, *p));
                    *p
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, TimeZone};
    use crate::initialization::tests::MINIMAL;
    use crate::initialization::parse_config;
    use super::*;

    fn position(time: DateTime<Local>, zenith: f64, azimuth: f64) -> SolarPosition {
        SolarPosition { time, apparent_zenith: zenith, azimuth, apparent_elevation: 90.0 - zenith }
    }

    /// Sun positions every 15 minutes over a day with a zenith that changes on every sample
    fn quarter_hours() -> Vec<SolarPosition> {
        let start = Local.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        (0..96)
            .map(|i| position(start.add(TimeDelta::minutes(15 * i)), 90.0 - i as f64 * 0.7, 60.0 + i as f64 * 2.5))
            .collect()
    }

    #[test]
    fn time_series_is_tomorrow_hourly() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 15, 30, 12).unwrap();
        let times = time_series_after(now).unwrap();

        assert_eq!(times.len(), 24);
        assert_eq!(times[0], Local.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap());
        assert_eq!(times[23], Local.with_ymd_and_hms(2024, 5, 2, 23, 0, 0).unwrap());
        for pair in times.windows(2) {
            assert_eq!(pair[1] - pair[0], TimeDelta::hours(1));
        }
    }

    #[test]
    fn time_series_rolls_over_month_end() {
        let now = Local.with_ymd_and_hms(2024, 5, 31, 23, 59, 0).unwrap();
        let times = time_series_after(now).unwrap();

        assert_eq!(times[0], Local.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert!(ensure_single_day(&times).is_ok());
    }

    #[test]
    fn time_series_keeps_wall_clock_hours_on_clock_changes() {
        // EU and US daylight saving transition days, both directions
        for (y, m, d) in [(2024, 3, 31), (2024, 10, 27), (2024, 3, 10), (2024, 11, 3)] {
            let day = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            let now = local_hour(day.pred_opt().unwrap(), 12).unwrap();
            let times = time_series_after(now).unwrap();

            assert_eq!(times.len(), 24);
            assert_eq!((times[0].date_naive(), times[0].hour()), (day, 0));
            assert_eq!((times[23].date_naive(), times[23].hour()), (day, 23));
            assert!(ensure_single_day(&times).is_ok());
            assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }

    #[test]
    fn every_day_of_a_year_is_a_single_day_series() {
        let mut day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        while day.year() == 2024 {
            let times = time_series_after(local_hour(day, 12).unwrap()).unwrap();
            let tomorrow = day.succ_opt().unwrap();

            assert_eq!(times.len(), 24);
            assert!(times.iter().all(|t| t.date_naive() == tomorrow));
            assert_eq!(times[23].hour(), 23);
            assert!(ensure_single_day(&times).is_ok());
            day = tomorrow;
        }
    }

    #[test]
    fn current_time_series_has_24_hours() {
        assert_eq!(create_time_series().unwrap().len(), 24);
    }

    #[test]
    fn two_day_range_is_a_validation_error() {
        let start = Local.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let times: Vec<DateTime<Local>> = (0..24).map(|h| start.add(TimeDelta::hours(h))).collect();

        assert!(matches!(ensure_single_day(&times), Err(ProdError::Validation(_))));
        assert!(ensure_single_day(&[]).is_ok());
    }

    #[actix_web::test]
    async fn unknown_mount_type_is_rejected_before_fetching() {
        let config = parse_config(MINIMAL).unwrap();
        let result = Pipeline::new(&config).estimate(42.0, 21.43, "invalid", "with_forecast").await;

        assert!(matches!(result, Err(ProdError::InvalidArgument(_))));
    }

    #[actix_web::test]
    async fn unknown_product_version_is_rejected_before_fetching() {
        let config = parse_config(MINIMAL).unwrap();
        let result = Pipeline::new(&config).estimate(42.0, 21.43, "fixed", "bogus").await;

        assert!(matches!(result, Err(ProdError::InvalidArgument(_))));
    }

    #[test]
    fn fixed_mount_ignores_the_sun() {
        let positions = quarter_hours();
        let orientation = tracker_orientation(MountType::Fixed, &positions, &TrackerConfig::default());

        assert_eq!(orientation.len(), positions.len());
        assert!(orientation.iter().all(|o| o.surface_tilt == 30.0 && o.surface_azimuth == 180.0));
    }

    #[test]
    fn dual_axis_tilt_never_exceeds_limit() {
        let positions = quarter_hours();
        let orientation = tracker_orientation(MountType::DualAxis, &positions, &TrackerConfig::default());

        assert_eq!(orientation.len(), positions.len());
        assert!(orientation.iter().all(|o| o.surface_tilt <= 30.0));
        assert!(orientation.iter().any(|o| o.surface_tilt < 30.0));
    }

    #[test]
    fn dual_axis_holds_first_sample_of_each_hour() {
        let positions = quarter_hours();
        let orientation = tracker_orientation(MountType::DualAxis, &positions, &TrackerConfig::default());

        for hour in orientation.chunks(4) {
            assert!(hour.iter().all(|o| o.surface_azimuth == hour[0].surface_azimuth));
            assert!(hour.iter().all(|o| o.surface_tilt == hour[0].surface_tilt));
        }
        assert_eq!(orientation[5].surface_azimuth, positions[4].azimuth);
        assert_eq!(orientation[5].time, positions[5].time);
        assert_ne!(orientation[4].surface_azimuth, orientation[8].surface_azimuth);
    }

    #[test]
    fn hold_starts_a_new_hour_mid_hour() {
        let start = Local.with_ymd_and_hms(2024, 6, 21, 10, 20, 0).unwrap();
        let positions: Vec<SolarPosition> = (0..4)
            .map(|i| position(start.add(TimeDelta::minutes(20 * i)), 30.0 + i as f64, 150.0 + i as f64))
            .collect();
        let held = hold_hourly(&positions);

        assert_eq!(held[1].azimuth, 150.0);
        assert_eq!(held[2].azimuth, 152.0);
        assert_eq!(held[3].azimuth, 152.0);
    }

    #[test]
    fn hourly_input_passes_through_hold() {
        let start = Local.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        let positions: Vec<SolarPosition> = (0..24)
            .map(|h| position(start.add(TimeDelta::hours(h)), 20.0 + h as f64, 90.0 + h as f64 * 7.5))
            .collect();

        assert_eq!(hold_hourly(&positions), positions);
    }

    #[test]
    fn fixed_orientation_for_skopje_tomorrow() {
        let site = GeoRef { lat: 42.0, long: 21.43, elevation: 279.0 };
        let times = time_series_after(Local.with_ymd_and_hms(2024, 6, 20, 9, 0, 0).unwrap()).unwrap();
        let positions = solar_positions(&site, &times).unwrap();
        let orientation = tracker_orientation(MountType::Fixed, &mask_night(&positions), &TrackerConfig::default());

        assert_eq!(orientation.len(), 24);
        assert!(orientation.iter().all(|o| o.surface_tilt == 30.0 && o.surface_azimuth == 180.0));
    }

    #[test]
    fn dual_axis_parks_flat_at_night() {
        let site = GeoRef { lat: 42.0, long: 21.43, elevation: 279.0 };
        let times = time_series_after(Local.with_ymd_and_hms(2024, 12, 20, 9, 0, 0).unwrap()).unwrap();
        let positions = solar_positions(&site, &times).unwrap();
        let masked = mask_night(&positions);
        let orientation = tracker_orientation(MountType::DualAxis, &masked, &TrackerConfig::default());

        for (o, p) in orientation.iter().zip(positions.iter()) {
            if p.apparent_elevation < 0.0 {
                assert_eq!((o.surface_tilt, o.surface_azimuth), (0.0, 0.0));
            } else {
                assert!(o.surface_tilt <= 30.0);
            }
        }
    }

    #[test]
    fn clear_sky_day_produces_power_around_noon_only() {
        let site = GeoRef { lat: 42.0, long: 21.43, elevation: 279.0 };
        let times = time_series_after(Local.with_ymd_and_hms(2024, 6, 20, 9, 0, 0).unwrap()).unwrap();
        let positions = solar_positions(&site, &times).unwrap();
        let orientation = tracker_orientation(MountType::DualAxis, &mask_night(&positions), &TrackerConfig::default());
        let irradiance = clear_sky(&positions, site.elevation, 3.0);
        let poa = plane_of_array(&orientation, &positions, &irradiance, 0.25).unwrap();

        for (p, s) in poa.iter().zip(positions.iter()) {
            if s.apparent_elevation < 0.0 {
                assert_eq!(p.poa_global, 0.0);
            }
        }
        assert!(poa.iter().any(|p| p.poa_global > 600.0));
    }
}
