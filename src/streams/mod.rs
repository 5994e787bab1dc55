//! Forward-only streams of dated observations, interpolated onto the simulation clock.
//!
//! A stream is seeked once to the start of the run, keeping the last observation on or before
//! the start and the first one after it. From then on each query moves the pair forward until
//! it brackets the query time and blends the two. When the data run out the last value is held
//! and a single warning names the day it happened.

pub mod boundary;
pub mod extraction;
pub mod plant;
pub mod residue;

pub use boundary::BoundaryStream;
pub use extraction::ExtractionStream;
pub use plant::{PlantLayout, PlantState, leaf_area_index};
pub use residue::ResidueState;

use log::{debug, warn};

use crate::clock::{DayOfYear, Timestamp};
use crate::error::ForcingError;
use crate::readers::RecordSource;

/// A value observed at a point on the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicObservation<T> {
    pub stamp: Timestamp,
    pub value: T,
}

impl<T> PeriodicObservation<T> {
    pub fn new(stamp: Timestamp, value: T) -> Self {
        PeriodicObservation { stamp, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Uninitialized,
    Seeking,
    Interpolating,
    Exhausted,
}

/// Linear blending between two observations.
pub trait Interpolate: Clone {
    /// `self` at `fraction` 0, `next` at `fraction` 1.
    fn interpolate(&self, next: &Self, fraction: f64) -> Self;
}

pub fn lerp(a: f64, b: f64, fraction: f64) -> f64 {
    a + (b - a) * fraction
}

impl Interpolate for f64 {
    fn interpolate(&self, next: &Self, fraction: f64) -> Self {
        lerp(*self, *next, fraction)
    }
}

impl Interpolate for Vec<f64> {
    fn interpolate(&self, next: &Self, fraction: f64) -> Self {
        self.iter()
            .zip(next)
            .map(|(a, b)| lerp(*a, *b, fraction))
            .collect()
    }
}

/// Reads observations in order, rejecting any dated before its predecessor.
pub struct StreamCursor<T> {
    name: String,
    records: Box<dyn RecordSource<PeriodicObservation<T>>>,
    last_read: Option<Timestamp>,
    exhausted_on: Option<DayOfYear>,
}

impl<T> StreamCursor<T> {
    pub fn new(name: impl Into<String>, records: Box<dyn RecordSource<PeriodicObservation<T>>>) -> Self {
        StreamCursor {
            name: name.into(),
            records,
            last_read: None,
            exhausted_on: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn read(&mut self) -> Result<Option<PeriodicObservation<T>>, ForcingError> {
        let Some(observation) = self.records.next_record()? else {
            return Ok(None);
        };
        if let Some(previous) = self.last_read
            && observation.stamp < previous
        {
            return Err(ForcingError::NonChronological {
                stream: self.name.clone(),
                previous,
                found: observation.stamp,
            });
        }
        self.last_read = Some(observation.stamp);
        Ok(Some(observation))
    }

    /// Logs the simulated time at which the data ran out, once per stream.
    pub fn warn_exhausted(&mut self, at: Timestamp) {
        if self.exhausted_on.is_none() {
            warn!("*** Data for {} ran out on {} ***", self.name, at.day());
            self.exhausted_on = Some(at.day());
        }
    }

    /// Simulated day on which the data ran out.
    pub fn exhausted_on(&self) -> Option<DayOfYear> {
        self.exhausted_on
    }

    pub fn initial_conditions_error(&self, start: Timestamp) -> ForcingError {
        ForcingError::InitialConditions {
            stream: self.name.clone(),
            start,
        }
    }
}

/// A stream of observations interpolated linearly in time.
pub struct PeriodicStream<T> {
    cursor: StreamCursor<T>,
    state: StreamState,
    last: Option<PeriodicObservation<T>>,
    next: Option<PeriodicObservation<T>>,
}

impl<T: Interpolate> PeriodicStream<T> {
    pub fn new(name: impl Into<String>, records: Box<dyn RecordSource<PeriodicObservation<T>>>) -> Self {
        PeriodicStream {
            cursor: StreamCursor::new(name, records),
            state: StreamState::Uninitialized,
            last: None,
            next: None,
        }
    }

    pub fn name(&self) -> &str {
        self.cursor.name()
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn exhausted_on(&self) -> Option<DayOfYear> {
        self.cursor.exhausted_on()
    }

    /// Positions the stream around `start`.
    pub fn initialize(&mut self, start: Timestamp) -> Result<(), ForcingError> {
        self.state = StreamState::Seeking;

        let first = self
            .cursor
            .read()?
            .ok_or_else(|| self.cursor.initial_conditions_error(start))?;
        if first.stamp > start {
            return Err(self.cursor.initial_conditions_error(start));
        }
        let mut last = first;

        loop {
            match self.cursor.read()? {
                Some(observation) if observation.stamp <= start => last = observation,
                Some(observation) => {
                    debug!(
                        "{} starts between {} and {}",
                        self.cursor.name(),
                        last.stamp,
                        observation.stamp
                    );
                    self.last = Some(last);
                    self.next = Some(observation);
                    self.state = StreamState::Interpolating;
                    return Ok(());
                }
                None if last.stamp == start => {
                    self.cursor.warn_exhausted(start);
                    self.last = Some(last);
                    self.state = StreamState::Exhausted;
                    return Ok(());
                }
                None => return Err(self.cursor.initial_conditions_error(start)),
            }
        }
    }

    /// The stream's value at `stamp`. Times before the current observation get its value.
    pub fn value_at(&mut self, stamp: Timestamp) -> Result<T, ForcingError> {
        if self.state == StreamState::Uninitialized {
            self.initialize(stamp)?;
        }

        while self.state == StreamState::Interpolating {
            let (Some(last), Some(next)) = (&self.last, &self.next) else {
                break;
            };
            if next.stamp > stamp {
                let span = last.stamp.hours_until(next.stamp) as f64;
                let elapsed = last.stamp.hours_until(stamp) as f64;
                let fraction = (elapsed / span).clamp(0.0, 1.0);
                return Ok(last.value.interpolate(&next.value, fraction));
            }

            self.last = self.next.take();
            match self.cursor.read()? {
                Some(observation) => self.next = Some(observation),
                None => {
                    self.cursor.warn_exhausted(stamp);
                    self.state = StreamState::Exhausted;
                }
            }
        }

        self.last
            .as_ref()
            .map(|last| last.value.clone())
            .ok_or_else(|| self.cursor.initial_conditions_error(stamp))
    }
}
