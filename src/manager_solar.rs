use std::f64::consts::PI;
use chrono::{DateTime, Datelike, Local};
use spa_sra::errors::SpaError;
use spa_sra::spa::{Function, Input, SpaData};
use crate::initialization::GeoRef;
use crate::models::{Irradiance, SolarPosition};

const SOLAR_CONSTANT: f64 = 1366.1;

/// Returns the apparent sun position for each of the given points in time
///
/// # Arguments
///
/// * 'site' - position and elevation of the site
/// * 'times' - points in time to calculate for
pub fn solar_positions(site: &GeoRef, times: &[DateTime<Local>]) -> Result<Vec<SolarPosition>, SpaError> {
    let Some(&first) = times.first() else {
        return Ok(Vec::new());
    };

    let mut input = Input::from_date_time(first);
    input.latitude = site.lat;
    input.longitude = site.long;
    input.pressure = 1013.25;
    input.temperature = 12.0;
    input.elevation = site.elevation;
    input.slope = 0.0;
    input.azm_rotation = 0.0;
    input.function = Function::SpaZaInc;

    let mut spa = SpaData::new(input);
    let mut result: Vec<SolarPosition> = Vec::with_capacity(times.len());

    for &time in times {
        spa.input.date_time(time);
        spa.spa_calculate()?;

        result.push(SolarPosition {
            time,
            apparent_zenith: spa.spa_za.zenith,
            azimuth: spa.spa_za.azimuth,
            apparent_elevation: spa.spa_za.e,
        });
    }

    Ok(result)
}

/// Returns a copy where every position with the sun below the horizon has all angles set to zero
///
/// # Arguments
///
/// * 'positions' - sun positions to mask
pub fn mask_night(positions: &[SolarPosition]) -> Vec<SolarPosition> {
    positions.iter()
        .map(|p| if p.apparent_elevation < 0.0 {
            SolarPosition { time: p.time, apparent_zenith: 0.0, azimuth: 0.0, apparent_elevation: 0.0 }
        } else {
            *p
        })
        .collect()
}

/// Ineichen-Perez clear sky irradiance for each sun position
///
/// # Arguments
///
/// * 'positions' - unmasked sun positions
/// * 'altitude' - site altitude in meters
/// * 'linke_turbidity' - Linke turbidity factor, around 3 for a clean rural atmosphere
pub fn clear_sky(positions: &[SolarPosition], altitude: f64, linke_turbidity: f64) -> Vec<Irradiance> {
    positions.iter()
        .map(|p| {
            let (ghi, dni, dhi) = ineichen(p.apparent_zenith, p.time.ordinal(), altitude, linke_turbidity);
            Irradiance { time: p.time, ghi, dni, dhi }
        })
        .collect()
}

/// Returns (ghi, dni, dhi) for one sun position
fn ineichen(apparent_zenith: f64, day_of_year: u32, altitude: f64, tl: f64) -> (f64, f64, f64) {
    if !apparent_zenith.is_finite() || apparent_zenith >= 90.0 {
        return (0.0, 0.0, 0.0);
    }

    let cos_zenith = apparent_zenith.to_radians().cos().max(0.0);
    let airmass = relative_airmass(apparent_zenith) * altitude_to_pressure(altitude) / 101325.0;
    let dni_extra = extra_radiation(day_of_year);

    let fh1 = (-altitude / 8000.0).exp();
    let fh2 = (-altitude / 1250.0).exp();
    let cg1 = 5.09e-5 * altitude + 0.868;
    let cg2 = 3.92e-5 * altitude + 0.0387;

    let ghi = (cg1 * dni_extra * cos_zenith * (-cg2 * airmass * (fh1 + fh2 * (tl - 1.0))).exp()).max(0.0);

    let b = 0.664 + 0.163 / fh1;
    let bnci = dni_extra * (b * (-0.09 * airmass * (tl - 1.0)).exp()).max(0.0);
    let bnci_2 = ghi * ((1.0 - (0.1 - 0.2 * (-tl).exp()) / (0.1 + 0.882 / fh1)) / cos_zenith).clamp(0.0, 1e20);

    let dni = bnci.min(bnci_2);
    let dhi = ghi - dni * cos_zenith;

    (ghi, dni, dhi)
}

/// Kasten-Young relative air mass
fn relative_airmass(zenith: f64) -> f64 {
    1.0 / (zenith.to_radians().cos() + 0.50572 * (96.07995 - zenith).powf(-1.6364))
}

/// Standard atmosphere pressure in Pa at the given altitude
fn altitude_to_pressure(altitude: f64) -> f64 {
    100.0 * ((44331.514 - altitude) / 11880.516).powf(1.0 / 0.1902632)
}

/// Spencer's extraterrestrial normal irradiance
fn extra_radiation(day_of_year: u32) -> f64 {
    let b = 2.0 * PI * day_of_year as f64 / 365.0;

    SOLAR_CONSTANT * (1.00011 + 0.034221 * b.cos() + 0.00128 * b.sin()
        + 0.000719 * (2.0 * b).cos() + 0.000077 * (2.0 * b).sin())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use super::*;

    fn skopje() -> GeoRef {
        GeoRef { lat: 42.0, long: 21.43, elevation: 240.0 }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap().with_timezone(&Local)
    }

    #[test]
    fn sun_is_high_and_south_at_summer_noon() {
        let positions = solar_positions(&skopje(), &[at(2024, 6, 21, 10, 36)]).unwrap();

        assert!((positions[0].apparent_zenith - 18.6).abs() < 1.0);
        assert!(positions[0].azimuth > 170.0 && positions[0].azimuth < 190.0);
        assert!((positions[0].apparent_elevation + positions[0].apparent_zenith - 90.0).abs() < 1e-6);
    }

    #[test]
    fn sun_is_down_at_midnight() {
        let positions = solar_positions(&skopje(), &[at(2024, 6, 21, 22, 36)]).unwrap();

        assert!(positions[0].apparent_elevation < 0.0);
    }

    #[test]
    fn one_position_per_time() {
        let times: Vec<DateTime<Local>> = (0..24).map(|h| at(2024, 3, 1, h, 0)).collect();

        assert_eq!(solar_positions(&skopje(), &times).unwrap().len(), 24);
        assert!(solar_positions(&skopje(), &[]).unwrap().is_empty());
    }

    #[test]
    fn night_positions_are_zeroed() {
        let time = at(2024, 6, 21, 0, 0);
        let positions = [
            SolarPosition { time, apparent_zenith: 110.0, azimuth: 10.0, apparent_elevation: -20.0 },
            SolarPosition { time, apparent_zenith: 40.0, azimuth: 150.0, apparent_elevation: 50.0 },
        ];
        let masked = mask_night(&positions);

        assert_eq!(masked[0], SolarPosition { time, apparent_zenith: 0.0, azimuth: 0.0, apparent_elevation: 0.0 });
        assert_eq!(masked[1], positions[1]);
    }

    #[test]
    fn clear_sky_is_dark_below_horizon() {
        assert_eq!(ineichen(95.0, 172, 0.0, 3.0), (0.0, 0.0, 0.0));
        assert_eq!(ineichen(f64::NAN, 172, 0.0, 3.0), (0.0, 0.0, 0.0));
    }

    #[test]
    fn clear_sky_components_are_consistent() {
        let (ghi, dni, dhi) = ineichen(30.0, 172, 0.0, 3.0);

        assert!(ghi > 800.0 && ghi < 1000.0);
        assert!(dni > dhi && dhi > 0.0);
        assert!((dni * 30f64.to_radians().cos() + dhi - ghi).abs() < 1e-9);
    }

    #[test]
    fn clear_sky_grows_as_sun_rises() {
        let (low, _, _) = ineichen(70.0, 172, 0.0, 3.0);
        let (high, _, _) = ineichen(20.0, 172, 0.0, 3.0);

        assert!(high > low);
    }

    #[test]
    fn extraterrestrial_irradiance_peaks_in_january() {
        assert!(extra_radiation(3) > extra_radiation(185));
        assert!((extra_radiation(3) - 1412.0).abs() < 10.0);
    }
}
