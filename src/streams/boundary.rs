use super::{PeriodicObservation, PeriodicStream};
use crate::clock::{DayOfYear, HourOfDay, Timestamp};
use crate::error::ForcingError;
use crate::forcing::HourlySeries;
use crate::readers::utils::stamp_fields;
use crate::readers::{RecordSource, RowParser, require_columns};

/// Parses `day hour year value_1 .. value_layers` and keeps the deepest layer's value.
pub fn boundary_parser(layers: usize) -> RowParser<PeriodicObservation<f64>> {
    Box::new(move |row| {
        let layers = layers.max(1);
        require_columns(row, 3 + layers)?;
        Ok(PeriodicObservation::new(
            stamp_fields(row[0], row[1], row[2])?,
            row[2 + layers],
        ))
    })
}

/// A soil measurement imposed at the bottom of the profile, interpolated hour by hour.
pub struct BoundaryStream {
    stream: PeriodicStream<f64>,
}

impl BoundaryStream {
    pub fn new(
        name: impl Into<String>,
        records: Box<dyn RecordSource<PeriodicObservation<f64>>>,
    ) -> Self {
        BoundaryStream {
            stream: PeriodicStream::new(name, records),
        }
    }

    pub fn initialize(&mut self, start: Timestamp) -> Result<(), ForcingError> {
        self.stream.initialize(start)
    }

    /// Hourly values of `day`, or with `step` > 1 the mean of each step stored at its end.
    pub fn day_values(&mut self, day: DayOfYear, step: u8) -> Result<HourlySeries, ForcingError> {
        let mut hourly = HourlySeries::zeros();
        for hour in HourOfDay::all() {
            hourly[hour] = self.stream.value_at(Timestamp::at(day, hour))?;
        }
        if step <= 1 {
            return Ok(hourly);
        }

        let mut averaged = HourlySeries::zeros();
        for end in HourOfDay::step_ends(step) {
            let first = end.get() + 1 - step;
            let sum: f64 = (first..=end.get()).map(|h| hourly.at(h)).sum();
            averaged[end] = sum / step as f64;
        }
        Ok(averaged)
    }
}
