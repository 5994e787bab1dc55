use crate::config::time_step::TimeStepParseError;
use crate::readers::FileError;

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    DateOrder,
    TimeStep(TimeStepParseError),
    Latitude(f64),
    SolarNoon(f64),
    MissingInput(String),
    SoilLayers,
    Input(FileError),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DateOrder => write!(f, "end_date cannot be earlier than start_date"),
            ConfigError::TimeStep(e) => write!(f, "{}", e),
            ConfigError::Latitude(lat) => {
                write!(f, "Latitude must be between -90 and 90, got {}", lat)
            }
            ConfigError::SolarNoon(hour) => {
                write!(f, "solar_noon must be a clock hour within 0..24, got {}", hour)
            }
            ConfigError::MissingInput(what) => write!(f, "No input file given for {}", what),
            ConfigError::SoilLayers => {
                write!(f, "soil_layers must be at least 1 when soil inputs are used")
            }
            ConfigError::Input(e) => write!(f, "{}", e),
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<TimeStepParseError> for ConfigError {
    fn from(err: TimeStepParseError) -> ConfigError {
        ConfigError::TimeStep(err)
    }
}

impl From<FileError> for ConfigError {
    fn from(err: FileError) -> ConfigError {
        ConfigError::Input(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}
