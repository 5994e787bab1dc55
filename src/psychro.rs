//! Water vapour in air.

const KELVIN: f64 = 273.16;

/// Molar mass of water over the gas constant [kg K / J]
const WATER_GAS_FACTOR: f64 = 0.0021668;

/// Saturated vapour density [kg/m3] over water at `temperature` (°C).
pub fn saturation_vapor_density(temperature: f64) -> f64 {
    let t = temperature + KELVIN;
    // Saturation vapour pressure in kPa
    let pressure = (52.57633 - 6790.4985 / t - 5.02808 * t.ln()).exp();
    WATER_GAS_FACTOR * pressure * 1000.0 / t
}

/// Relative humidity [%] of air at `temperature` holding the vapour of saturated air at
/// `dew_point`. Capped at 100.
pub fn relative_humidity(temperature: f64, dew_point: f64) -> f64 {
    let humidity = 100.0 * saturation_vapor_density(dew_point) / saturation_vapor_density(temperature);
    humidity.min(100.0)
}
