use crate::clock::{DayOfYear, HourOfDay, SimulationClock, Timestamp};
use crate::config::Config;

/// The days of a run and the step-end hours simulated on each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationSchedule {
    start: DayOfYear,
    end: DayOfYear,
    start_hour: u8,
    hours_per_step: u8,
}

impl SimulationSchedule {
    pub fn new(start: DayOfYear, end: DayOfYear, start_hour: u8, hours_per_step: u8) -> Self {
        Self {
            start,
            end,
            start_hour,
            hours_per_step,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.start_day(),
            config.end_day(),
            config.start_hour(),
            config.hours_per_step(),
        )
    }

    pub fn start_day(&self) -> DayOfYear {
        self.start
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn hours_per_step(&self) -> u8 {
        self.hours_per_step
    }

    /// The instant the run starts from.
    pub fn start(&self) -> Timestamp {
        Timestamp::new(self.start.julian() as i64, self.start_hour, self.start.year())
    }

    /// The instant the run ends: midnight closing the last day.
    pub fn end(&self) -> Timestamp {
        Timestamp::at(self.end, HourOfDay::MIDNIGHT)
    }

    /// A clock standing at the start of the run.
    pub fn clock(&self) -> SimulationClock {
        SimulationClock::new(self.start(), self.hours_per_step)
    }

    /// Step-end hours of `day`. The first day only has those after the start hour.
    pub fn step_ends(&self, day: DayOfYear) -> Vec<HourOfDay> {
        let first_day = day == self.start;
        HourOfDay::step_ends(self.hours_per_step)
            .filter(|hour| !first_day || hour.get() > self.start_hour)
            .collect()
    }
}
