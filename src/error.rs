use std::fmt;

use crate::clock::{DayOfYear, Timestamp};
use crate::config::ConfigError;
use crate::readers::{FileError, ReadError};

/// Conditions that stop a run.
#[derive(Debug)]
pub enum ForcingError {
    Config(ConfigError),
    Read(ReadError),
    /// No weather record for the first simulated day
    MissingStartWeather { day: DayOfYear },
    /// The weather file ended before `day` could be read
    WeatherExhausted { day: DayOfYear },
    WeatherOutOfSequence { expected: DayOfYear, found: DayOfYear },
    HourlyWeatherOutOfSequence { expected: Timestamp, found: Timestamp },
    /// An observation is dated before the one read ahead of it
    NonChronological {
        stream: String,
        previous: Timestamp,
        found: Timestamp,
    },
    /// No observation on or before the start of the run
    InitialConditions { stream: String, start: Timestamp },
    LayerCount {
        stream: String,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for ForcingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForcingError::Config(e) => write!(f, "configuration error: {}", e),
            ForcingError::Read(e) => write!(f, "input error: {}", e),
            ForcingError::MissingStartWeather { day } => {
                write!(f, "cannot find weather data for beginning {}", day)
            }
            ForcingError::WeatherExhausted { day } => {
                write!(f, "weather data ran out before {}", day)
            }
            ForcingError::WeatherOutOfSequence { expected, found } => write!(
                f,
                "weather data out of sequence: expected {}, found {}",
                expected, found
            ),
            ForcingError::HourlyWeatherOutOfSequence { expected, found } => write!(
                f,
                "hourly weather data out of sequence: expected {}, found {}",
                expected, found
            ),
            ForcingError::NonChronological {
                stream,
                previous,
                found,
            } => write!(
                f,
                "{} data not in chronological order: {} follows {}",
                stream, found, previous
            ),
            ForcingError::InitialConditions { stream, start } => write!(
                f,
                "initial conditions for {} at {} cannot be interpolated from the data",
                stream, start
            ),
            ForcingError::LayerCount {
                stream,
                expected,
                found,
            } => write!(
                f,
                "{} record has {} soil layers, expected {}",
                stream, found, expected
            ),
        }
    }
}

impl std::error::Error for ForcingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ForcingError::Config(e) => Some(e),
            ForcingError::Read(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for ForcingError {
    fn from(err: ConfigError) -> ForcingError {
        ForcingError::Config(err)
    }
}

impl From<ReadError> for ForcingError {
    fn from(err: ReadError) -> ForcingError {
        ForcingError::Read(err)
    }
}

impl From<FileError> for ForcingError {
    fn from(err: FileError) -> ForcingError {
        ForcingError::Read(ReadError::File(err))
    }
}
