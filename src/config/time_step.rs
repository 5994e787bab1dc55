use serde::Deserialize;
use std::fmt;

use crate::clock::HOURS_PER_DAY;

/// How often the weather file has a record.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCadence {
    /// One record per day, spread over the hours by disaggregation
    #[serde(rename(deserialize = "daily"))]
    Daily,
    /// One record per hour, averaged up to the simulation step
    #[serde(rename(deserialize = "sub_daily"))]
    SubDaily,
    /// One record per simulation step
    #[serde(rename(deserialize = "matches_step"))]
    MatchesStep,
}

/// Length of a simulation step; always divides the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeStep {
    hours: u8,
}

impl TimeStep {
    pub fn new(hours: u8) -> Result<Self, TimeStepParseError> {
        if hours == 0 || HOURS_PER_DAY % hours != 0 {
            return Err(TimeStepParseError::HoursPerStep(hours));
        }
        Ok(TimeStep { hours })
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    /// The run may only start at midnight or at the end of a step.
    pub fn check_start_hour(&self, start_hour: u8) -> Result<(), TimeStepParseError> {
        if start_hour >= HOURS_PER_DAY || start_hour % self.hours != 0 {
            return Err(TimeStepParseError::StartHour {
                start_hour,
                hours_per_step: self.hours,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeStepParseError {
    HoursPerStep(u8),
    StartHour { start_hour: u8, hours_per_step: u8 },
}

impl fmt::Display for TimeStepParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimeStepParseError::HoursPerStep(hours) => {
                write!(f, "hours_per_step must divide 24, got {}", hours)
            }
            TimeStepParseError::StartHour {
                start_hour,
                hours_per_step,
            } => write!(
                f,
                "start_hour {} is not 0 or a multiple of hours_per_step {}",
                start_hour, hours_per_step
            ),
        }
    }
}

impl std::error::Error for TimeStepParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_must_divide_day() {
        for hours in [1, 2, 3, 4, 6, 8, 12, 24] {
            assert!(TimeStep::new(hours).is_ok(), "{} hours", hours);
        }
        assert_eq!(
            TimeStep::new(5).unwrap_err(),
            TimeStepParseError::HoursPerStep(5)
        );
        assert!(TimeStep::new(0).is_err());
        assert!(TimeStep::new(48).is_err());
        assert_eq!(TimeStep::new(6).unwrap().hours(), 6);
    }

    #[test]
    fn test_start_hour() {
        let step = TimeStep::new(6).unwrap();
        assert!(step.check_start_hour(0).is_ok());
        assert!(step.check_start_hour(12).is_ok());
        assert!(step.check_start_hour(3).is_err());
        assert!(step.check_start_hour(24).is_err());
    }

    #[test]
    fn test_cadence() {
        let cadence: WeatherCadence = serde_json::from_str("\"sub_daily\"").unwrap();
        assert_eq!(cadence, WeatherCadence::SubDaily);
        assert!(serde_json::from_str::<WeatherCadence>("\"hourly\"").is_err());
        let cadence: WeatherCadence = serde_json::from_str("\"matches_step\"").unwrap();
        assert_eq!(cadence, WeatherCadence::MatchesStep);
    }
}
