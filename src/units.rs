use serde::Deserialize;

/// Inches to metres
pub const INCHES_TO_M: f64 = 0.0254;

/// Miles per hour to metres per second
pub const MPH_TO_MPS: f64 = 0.447;

/// Millimetres to metres
pub const MM_TO_M: f64 = 0.001;

/// Unit system of the wind and precipitation columns of a weather file.
///
/// Temperatures (°C) and solar radiation (W/m²) are the same in both systems.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementSystem {
    /// Wind run in miles (daily files) or mph (hourly files), precipitation in inches
    #[serde(rename(deserialize = "english"))]
    English,
    /// Wind in m/s, precipitation in mm
    #[serde(rename(deserialize = "si"))]
    Si,
}

impl MeasurementSystem {
    /// Precipitation depth in metres of water.
    pub fn precipitation_to_m(self, value: f64) -> f64 {
        match self {
            MeasurementSystem::English => value * INCHES_TO_M,
            MeasurementSystem::Si => value * MM_TO_M,
        }
    }

    /// Hourly wind speed in m/s.
    pub fn wind_to_mps(self, value: f64) -> f64 {
        match self {
            MeasurementSystem::English => value * MPH_TO_MPS,
            MeasurementSystem::Si => value,
        }
    }

    /// A daily wind run turned into an hourly rate in the same system: miles per day becomes mph.
    /// SI wind is already a speed.
    pub fn daily_wind_run_to_hourly(self, value: f64) -> f64 {
        match self {
            MeasurementSystem::English => value / 24.0,
            MeasurementSystem::Si => value,
        }
    }
}
