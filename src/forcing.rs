use std::ops::{Index, IndexMut};

use crate::clock::{DayOfYear, HourOfDay};
use crate::streams::plant::PlantState;
use crate::streams::residue::ResidueState;

/// One value per hour of a day, addressed by [`HourOfDay`] (1..=24, hour 24 being the midnight
/// that closes the day).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlySeries([f64; 24]);

impl HourlySeries {
    pub fn zeros() -> Self {
        HourlySeries([0.0; 24])
    }

    pub fn filled(value: f64) -> Self {
        HourlySeries([value; 24])
    }

    pub fn from_fn<F: FnMut(HourOfDay) -> f64>(mut f: F) -> Self {
        let mut series = HourlySeries::zeros();
        for hour in HourOfDay::all() {
            series[hour] = f(hour);
        }
        series
    }

    /// Value at a 1-based hour. Panics outside 1..=24.
    pub fn at(&self, hour: u8) -> f64 {
        self[HourOfDay::new(hour).expect("hour of day must be within 1..=24")]
    }

    pub fn values(&self) -> &[f64; 24] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (HourOfDay, f64)> + '_ {
        HourOfDay::all().map(move |hour| (hour, self[hour]))
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        self.sum() / 24.0
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn map_in_place<F: FnMut(f64) -> f64>(&mut self, mut f: F) {
        for value in self.0.iter_mut() {
            *value = f(*value);
        }
    }
}

impl Default for HourlySeries {
    fn default() -> Self {
        HourlySeries::zeros()
    }
}

impl Index<HourOfDay> for HourlySeries {
    type Output = f64;

    fn index(&self, hour: HourOfDay) -> &f64 {
        &self.0[hour.index()]
    }
}

impl IndexMut<HourOfDay> for HourlySeries {
    fn index_mut(&mut self, hour: HourOfDay) -> &mut f64 {
        &mut self.0[hour.index()]
    }
}

/// Hourly weather forcing for one simulated day.
///
/// After the assembler has run: temperature in °C, humidity as a fraction, wind in m/s, solar in
/// W/m², precipitation in m of water per hour (or per step at step-end hours) and snow density in
/// kg/m³ (0 when the precipitation is rain).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyForcing {
    pub temperature: HourlySeries,
    pub humidity: HourlySeries,
    pub wind_speed: HourlySeries,
    pub solar: HourlySeries,
    pub precipitation: HourlySeries,
    pub snow_density: HourlySeries,
}

/// Soil values imposed at the deepest modelled layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LowerBoundary {
    pub temperature: Option<HourlySeries>,
    pub water_content: Option<HourlySeries>,
}

/// Everything the solver needs for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForcing {
    pub day: DayOfYear,
    /// Hours at which a simulation step ends on this day
    pub step_ends: Vec<HourOfDay>,
    pub weather: HourlyForcing,
    pub plants: Vec<PlantState>,
    pub residue: Option<ResidueState>,
    /// Sink rate per soil layer (per second), filled at step-end hours.
    pub water_extraction: Option<Vec<HourlySeries>>,
    pub lower_boundary: LowerBoundary,
}

impl DailyForcing {
    /// Precipitation over the simulated steps of the day [m].
    pub fn total_precipitation(&self) -> f64 {
        self.step_ends
            .iter()
            .map(|&hour| self.weather.precipitation[hour])
            .sum()
    }
}
