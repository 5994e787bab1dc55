use chrono::{Datelike, NaiveDate};

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::clock::DayOfYear;
use crate::readers::resolve_input;
use crate::streams::{PlantLayout, PlantState, ResidueState, leaf_area_index};
use crate::units::MeasurementSystem;

pub mod error;
pub use error::ConfigError;

pub mod time_step;
pub use time_step::{TimeStep, WeatherCadence};

/// Layout and units of the input files.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum InputFormat {
    /// Version-2 files: English weather units, plant records without clumping
    #[serde(rename(deserialize = "legacy"))]
    Legacy,
    #[serde(rename(deserialize = "current"))]
    Current { units: MeasurementSystem },
}

impl InputFormat {
    pub fn units(self) -> MeasurementSystem {
        match self {
            InputFormat::Legacy => MeasurementSystem::English,
            InputFormat::Current { units } => units,
        }
    }

    pub fn plant_layout(self) -> PlantLayout {
        match self {
            InputFormat::Legacy => PlantLayout::Legacy,
            InputFormat::Current { .. } => PlantLayout::Current,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    latitude: f64,   // [deg]
    solar_noon: f64, // Clock hour
}

impl Site {
    pub fn new(latitude: f64, solar_noon: f64) -> Result<Self, ConfigError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ConfigError::Latitude(latitude));
        }
        if !(0.0..24.0).contains(&solar_noon) {
            return Err(ConfigError::SolarNoon(solar_noon));
        }
        Ok(Site {
            latitude,
            solar_noon,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn latitude_radians(&self) -> f64 {
        self.latitude.to_radians()
    }

    pub fn solar_noon(&self) -> f64 {
        self.solar_noon
    }
}

fn full_clumping() -> f64 {
    1.0
}

/// A plant species with constant canopy values and a seasonal LAI window. When plant growth is
/// time-varying the values come from `growth_file` instead.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PlantConfig {
    pub name: String,
    pub leaf_on: u32,
    pub leaf_off: u32,
    pub full_lai: f64,
    pub height: f64,         // [m]
    pub leaf_dimension: f64, // [m]
    #[serde(default = "full_clumping")]
    pub clumping: f64,
    pub dry_weight: f64,     // [kg/m2]
    pub root_depth: f64,     // [m]
    #[serde(default)]
    pub growth_file: Option<String>,
}

impl PlantConfig {
    pub fn state_on(&self, julian: u32) -> PlantState {
        PlantState {
            height: self.height,
            leaf_dimension: self.leaf_dimension,
            clumping: self.clumping,
            dry_weight: self.dry_weight,
            leaf_area_index: leaf_area_index(julian, self.leaf_on, self.leaf_off, self.full_lai),
            root_depth: self.root_depth,
        }
    }
}

/// Which periodic inputs are read from files instead of held constant.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeVarying {
    #[serde(default)]
    pub plant_growth: bool,
    #[serde(default)]
    pub residue: bool,
    #[serde(default)]
    pub water_extraction: bool,
}

fn current_directory() -> String {
    ".".to_string()
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InputFiles {
    pub weather: String,
    #[serde(default)]
    pub residue: Option<String>,
    #[serde(default)]
    pub water_extraction: Option<String>,
    #[serde(default)]
    pub lower_boundary_temperature: Option<String>,
    #[serde(default)]
    pub lower_boundary_moisture: Option<String>,
    #[serde(default = "current_directory")]
    pub base_directory: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_hour: u8,
    time_step: TimeStep,
    weather_cadence: WeatherCadence,
    format: InputFormat,
    site: Site,
    plants: Vec<PlantConfig>,
    residue: Option<ResidueState>,
    time_varying: TimeVarying,
    soil_layers: usize,
    inputs: InputFiles,
}

// Deserializes a Config, checking the dates are in order, the step divides the day, the start
// hour falls on a step and every time-varying input names a file.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            start_date: String,
            end_date: String,
            #[serde(default)]
            start_hour: u8,
            hours_per_step: u8,
            weather_cadence: WeatherCadence,
            format: InputFormat,
            site: SiteHelper,
            #[serde(default)]
            plants: Vec<PlantConfig>,
            #[serde(default)]
            residue: Option<ResidueState>,
            #[serde(default)]
            time_varying: TimeVarying,
            #[serde(default)]
            soil_layers: usize,
            inputs: InputFiles,
        }

        #[derive(Deserialize)]
        struct SiteHelper {
            latitude: f64,
            solar_noon: f64,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let start_date = NaiveDate::parse_from_str(&helper.start_date, "%Y-%m-%d")
            .map_err(|e| D::Error::custom(format!("Invalid start_date format: {}", e)))?;

        let end_date = NaiveDate::parse_from_str(&helper.end_date, "%Y-%m-%d")
            .map_err(|e| D::Error::custom(format!("Invalid end_date format: {}", e)))?;

        if start_date > end_date {
            return Err(D::Error::custom(ConfigError::DateOrder));
        }

        let time_step = TimeStep::new(helper.hours_per_step)
            .map_err(|e| D::Error::custom(ConfigError::from(e)))?;
        time_step
            .check_start_hour(helper.start_hour)
            .map_err(|e| D::Error::custom(ConfigError::from(e)))?;

        let site = Site::new(helper.site.latitude, helper.site.solar_noon)
            .map_err(D::Error::custom)?;

        let time_varying = helper.time_varying;
        if time_varying.plant_growth
            && let Some(plant) = helper.plants.iter().find(|p| p.growth_file.is_none())
        {
            return Err(D::Error::custom(ConfigError::MissingInput(format!(
                "growth of plant {}",
                plant.name
            ))));
        }
        if time_varying.residue && helper.inputs.residue.is_none() {
            return Err(D::Error::custom(ConfigError::MissingInput(
                "residue".to_string(),
            )));
        }
        if time_varying.water_extraction && helper.inputs.water_extraction.is_none() {
            return Err(D::Error::custom(ConfigError::MissingInput(
                "water extraction".to_string(),
            )));
        }

        let uses_layers = time_varying.water_extraction
            || helper.inputs.lower_boundary_temperature.is_some()
            || helper.inputs.lower_boundary_moisture.is_some();
        if uses_layers && helper.soil_layers == 0 {
            return Err(D::Error::custom(ConfigError::SoilLayers));
        }

        Ok(Config {
            start_date,
            end_date,
            start_hour: helper.start_hour,
            time_step,
            weather_cadence: helper.weather_cadence,
            format: helper.format,
            site,
            plants: helper.plants,
            residue: helper.residue,
            time_varying,
            soil_layers: helper.soil_layers,
            inputs: helper.inputs,
        })
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn start_day(&self) -> DayOfYear {
        to_day(self.start_date)
    }

    pub fn end_day(&self) -> DayOfYear {
        to_day(self.end_date)
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn hours_per_step(&self) -> u8 {
        self.time_step.hours()
    }

    pub fn weather_cadence(&self) -> WeatherCadence {
        self.weather_cadence
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn plants(&self) -> &[PlantConfig] {
        &self.plants
    }

    pub fn residue(&self) -> Option<&ResidueState> {
        self.residue.as_ref()
    }

    pub fn time_varying(&self) -> TimeVarying {
        self.time_varying
    }

    pub fn soil_layers(&self) -> usize {
        self.soil_layers
    }

    pub fn inputs(&self) -> &InputFiles {
        &self.inputs
    }

    /// Path of an input file, searched for below `base_directory` when not found directly.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ConfigError> {
        Ok(resolve_input(Path::new(&self.inputs.base_directory), name)?)
    }
}

fn to_day(date: NaiveDate) -> DayOfYear {
    DayOfYear::new(date.ordinal() as i64, date.year())
}
