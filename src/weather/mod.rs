pub mod disagg;
pub mod source;

pub use disagg::{Disaggregator, disaggregate_day};
pub use source::{DailyWeatherSource, HourlyWeatherSource};

use crate::clock::{DayOfYear, Timestamp};
use crate::readers::utils::{day_fields, stamp_fields};
use crate::readers::{RowParser, require_columns};

/// One day of weather summaries: `day year tmax tmin tdew wind precip solar`.
///
/// Wind is a daily wind run (miles, English files) or a mean speed (m/s, SI files);
/// precipitation is inches or mm.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyWeatherRecord {
    pub day: DayOfYear,
    pub max_temp: f64,
    pub min_temp: f64,
    pub dew_point: f64,
    pub wind: f64,
    pub precipitation: f64,
    pub solar: f64,
}

impl DailyWeatherRecord {
    pub const COLUMNS: usize = 8;

    pub fn from_row(row: &[f64]) -> Result<Self, String> {
        require_columns(row, Self::COLUMNS)?;
        Ok(DailyWeatherRecord {
            day: day_fields(row[0], row[1])?,
            max_temp: row[2],
            min_temp: row[3],
            dew_point: row[4],
            wind: row[5],
            precipitation: row[6],
            solar: row[7],
        })
    }

    pub fn parser() -> RowParser<Self> {
        Box::new(Self::from_row)
    }
}

/// One sub-daily weather record: `day hour year temp wind humidity precip snow_density solar`.
///
/// Humidity is in %, wind in mph or m/s, precipitation in inches or mm for the step ending at
/// `hour`.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyWeatherRecord {
    pub stamp: Timestamp,
    pub temperature: f64,
    pub wind: f64,
    pub humidity: f64,
    pub precipitation: f64,
    pub snow_density: f64,
    pub solar: f64,
}

impl HourlyWeatherRecord {
    pub const COLUMNS: usize = 9;

    pub fn from_row(row: &[f64]) -> Result<Self, String> {
        require_columns(row, Self::COLUMNS)?;
        Ok(HourlyWeatherRecord {
            stamp: stamp_fields(row[0], row[1], row[2])?,
            temperature: row[3],
            wind: row[4],
            humidity: row[5],
            precipitation: row[6],
            snow_density: row[7],
            solar: row[8],
        })
    }

    pub fn parser() -> RowParser<Self> {
        Box::new(Self::from_row)
    }
}
