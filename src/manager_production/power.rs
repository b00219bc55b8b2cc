use crate::initialization::{PvSystemConfig, ThermalConfig};
use crate::manager_production::errors::ProdError;
use crate::models::{Irradiance, PoaIrradiance, PowerSample, SolarPosition, TrackerOrientation, WeatherSample};

/// Irradiance at standard test conditions, W/m²
const E0: f64 = 1000.0;

/// Cell temperature at standard test conditions, °C
const T_REF: f64 = 25.0;

/// Calculates plane of array irradiance for every hour using the isotropic sky model
///
/// # Arguments
///
/// * 'orientation' - panel orientation per hour
/// * 'positions' - unmasked sun positions per hour
/// * 'irradiance' - horizontal irradiance components per hour
/// * 'albedo' - ground reflectance
pub fn plane_of_array(
    orientation: &[TrackerOrientation],
    positions: &[SolarPosition],
    irradiance: &[Irradiance],
    albedo: f64,
) -> Result<Vec<PoaIrradiance>, ProdError> {
    if orientation.len() != positions.len() || orientation.len() != irradiance.len() {
        return Err(ProdError::Validation(format!(
            "series lengths differ: orientation {}, positions {}, irradiance {}",
            orientation.len(), positions.len(), irradiance.len())));
    }

    Ok(orientation.iter()
        .zip(positions.iter())
        .zip(irradiance.iter())
        .map(|((o, p), i)| poa_isotropic(o, p, i, albedo))
        .collect())
}

/// Calculates DC and AC power for every hour
///
/// # Arguments
///
/// * 'poa' - plane of array irradiance per hour
/// * 'weather' - ambient temperature and wind speed per hour
/// * 'params' - PV system parameters
pub fn pv_generation(poa: &[PoaIrradiance], weather: &[WeatherSample], params: &PvSystemConfig) -> Result<Vec<PowerSample>, ProdError> {
    if poa.len() != weather.len() {
        return Err(ProdError::Validation(format!(
            "series lengths differ: poa {}, weather {}", poa.len(), weather.len())));
    }

    Ok(poa.iter()
        .zip(weather.iter())
        .map(|(p, w)| {
            let t_cell = sapm_cell_temperature(p.poa_global, w.temperature, w.wind_speed, &params.thermal);
            let dc = pvwatts_dc(p.poa_global, t_cell, params.pdc0, params.gamma_pdc);
            let ac = pvwatts_ac(dc, params.inverter_pdc0, params.eta_inv_nom, params.eta_inv_ref);

            PowerSample { time: p.time, dc, ac }
        })
        .collect())
}

/// Isotropic sky transposition of horizontal irradiance onto the panel plane
///
/// # Arguments
///
/// * 'orientation' - panel tilt and azimuth
/// * 'position' - sun zenith and azimuth
/// * 'irradiance' - ghi, dni and dhi
/// * 'albedo' - ground reflectance
pub fn poa_isotropic(orientation: &TrackerOrientation, position: &SolarPosition, irradiance: &Irradiance, albedo: f64) -> PoaIrradiance {
    let cos_tilt = orientation.surface_tilt.to_radians().cos();

    let projection = aoi_projection(
        orientation.surface_tilt, orientation.surface_azimuth, position.apparent_zenith, position.azimuth);
    let poa_direct = (irradiance.dni * projection).max(0.0);

    let sky_diffuse = irradiance.dhi * (1.0 + cos_tilt) * 0.5;
    let ground_diffuse = irradiance.ghi * albedo * (1.0 - cos_tilt) * 0.5;
    let poa_diffuse = sky_diffuse + ground_diffuse;

    PoaIrradiance {
        time: orientation.time,
        poa_global: poa_direct + poa_diffuse,
        poa_direct,
        poa_diffuse,
    }
}

/// Cosine of the angle between the sun and the panel normal
fn aoi_projection(surface_tilt: f64, surface_azimuth: f64, solar_zenith: f64, solar_azimuth: f64) -> f64 {
    let (st, sz) = (surface_tilt.to_radians(), solar_zenith.to_radians());
    let projection = st.cos() * sz.cos() + st.sin() * sz.sin() * (solar_azimuth - surface_azimuth).to_radians().cos();

    projection.clamp(-1.0, 1.0)
}

/// Sandia cell temperature model
///
/// # Arguments
///
/// * 'poa_global' - plane of array irradiance in W/m²
/// * 'temp_air' - ambient temperature in °C
/// * 'wind_speed' - wind speed in m/s
/// * 'thermal' - model parameters a, b and delta_t
pub fn sapm_cell_temperature(poa_global: f64, temp_air: f64, wind_speed: f64, thermal: &ThermalConfig) -> f64 {
    let module_temperature = poa_global * (thermal.a + thermal.b * wind_speed).exp() + temp_air;

    module_temperature + poa_global / E0 * thermal.delta_t
}

/// PVWatts DC power in W
///
/// # Arguments
///
/// * 'poa_global' - plane of array irradiance in W/m²
/// * 'temp_cell' - cell temperature in °C
/// * 'pdc0' - nameplate capacity in W
/// * 'gamma_pdc' - temperature coefficient in 1/°C
pub fn pvwatts_dc(poa_global: f64, temp_cell: f64, pdc0: f64, gamma_pdc: f64) -> f64 {
    poa_global / E0 * pdc0 * (1.0 + gamma_pdc * (temp_cell - T_REF))
}

/// PVWatts inverter model, AC power in W clipped to the inverter rating
///
/// # Arguments
///
/// * 'pdc' - DC input power in W
/// * 'pdc0' - inverter DC input rating in W
/// * 'eta_inv_nom' - nominal inverter efficiency
/// * 'eta_inv_ref' - reference efficiency of the efficiency curve
pub fn pvwatts_ac(pdc: f64, pdc0: f64, eta_inv_nom: f64, eta_inv_ref: f64) -> f64 {
    if pdc <= 0.0 {
        return 0.0;
    }

    let pac0 = eta_inv_nom * pdc0;
    let zeta = pdc / pdc0;
    let eta = eta_inv_nom / eta_inv_ref * (-0.0162 * zeta - 0.0059 / zeta + 0.9858);

    (eta * pdc).min(pac0).max(0.0)
}
