use super::{PeriodicObservation, StreamCursor, StreamState};
use crate::clock::{DayOfYear, HourOfDay, Timestamp};
use crate::error::ForcingError;
use crate::forcing::HourlySeries;
use crate::readers::utils::stamp_fields;
use crate::readers::{RecordSource, RowParser};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Parses `day hour year amount_1 .. amount_n`: the water removed from each soil layer over
/// the interval ending at the record's time.
pub fn parse_extraction_row(row: &[f64]) -> Result<PeriodicObservation<Vec<f64>>, String> {
    if row.len() < 4 {
        return Err(format!(
            "expected day, hour, year and at least one layer, found {} columns",
            row.len()
        ));
    }
    Ok(PeriodicObservation::new(
        stamp_fields(row[0], row[1], row[2])?,
        row[3..].to_vec(),
    ))
}

pub fn extraction_parser() -> RowParser<PeriodicObservation<Vec<f64>>> {
    Box::new(parse_extraction_row)
}

/// Soil water sink rates per layer, piecewise constant between records.
///
/// Each record's amounts are spread evenly over the time since the record before it, or since
/// the start of the run for the first record used.
pub struct ExtractionStream {
    cursor: StreamCursor<Vec<f64>>,
    layers: usize,
    state: StreamState,
    last_read: Option<Timestamp>,
    rates: Vec<f64>,
}

impl ExtractionStream {
    pub fn new(
        name: impl Into<String>,
        records: Box<dyn RecordSource<PeriodicObservation<Vec<f64>>>>,
        layers: usize,
    ) -> Self {
        ExtractionStream {
            cursor: StreamCursor::new(name, records),
            layers,
            state: StreamState::Uninitialized,
            last_read: None,
            rates: vec![0.0; layers],
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn exhausted_on(&self) -> Option<DayOfYear> {
        self.cursor.exhausted_on()
    }

    /// Current sink rate per layer [per second].
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Skips records up to `start` and takes the first one after it.
    pub fn initialize(&mut self, start: Timestamp) -> Result<(), ForcingError> {
        self.state = StreamState::Seeking;
        let mut since = start;
        while let Some(observation) = self.cursor.read()? {
            if observation.stamp <= start {
                since = observation.stamp;
                continue;
            }
            self.take(since, observation)?;
            self.state = StreamState::Interpolating;
            return Ok(());
        }
        Err(self.cursor.initial_conditions_error(start))
    }

    /// Rates per layer at the step-end `hours` of `day`; other hours are zero.
    pub fn day_rates(
        &mut self,
        day: DayOfYear,
        hours: &[HourOfDay],
    ) -> Result<Vec<HourlySeries>, ForcingError> {
        let mut series = vec![HourlySeries::zeros(); self.layers];

        if self.state == StreamState::Uninitialized {
            self.initialize(Timestamp::start_of(day))?;
        }

        for &hour in hours {
            self.advance_to(Timestamp::at(day, hour))?;
            for (layer, rate) in series.iter_mut().zip(&self.rates) {
                layer[hour] = *rate;
            }
        }

        Ok(series)
    }

    /// Reads records until the last one read is at or after `stamp`.
    fn advance_to(&mut self, stamp: Timestamp) -> Result<(), ForcingError> {
        while self.state == StreamState::Interpolating {
            let Some(last) = self.last_read else {
                break;
            };
            if stamp <= last {
                break;
            }
            match self.cursor.read()? {
                Some(observation) => self.take(last, observation)?,
                None => {
                    self.cursor.warn_exhausted(stamp);
                    self.state = StreamState::Exhausted;
                }
            }
        }
        Ok(())
    }

    fn take(
        &mut self,
        since: Timestamp,
        observation: PeriodicObservation<Vec<f64>>,
    ) -> Result<(), ForcingError> {
        if observation.value.len() < self.layers {
            return Err(ForcingError::LayerCount {
                stream: self.cursor.name().to_string(),
                expected: self.layers,
                found: observation.value.len(),
            });
        }

        let seconds = since.hours_until(observation.stamp) as f64 * SECONDS_PER_HOUR;
        // A record repeating the previous time adds no interval to spread over
        if seconds > 0.0 {
            self.rates = observation.value[..self.layers]
                .iter()
                .map(|amount| amount / seconds)
                .collect();
        }
        self.last_read = Some(observation.stamp);
        Ok(())
    }
}
