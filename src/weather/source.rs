use log::debug;

use super::{DailyWeatherRecord, HourlyWeatherRecord};
use crate::clock::{DayOfYear, HourOfDay, Timestamp};
use crate::error::ForcingError;
use crate::forcing::HourlyForcing;
use crate::readers::RecordSource;

/// Daily weather records, read strictly forward one day at a time.
pub struct DailyWeatherSource {
    records: Box<dyn RecordSource<DailyWeatherRecord>>,
}

impl DailyWeatherSource {
    pub fn new(records: Box<dyn RecordSource<DailyWeatherRecord>>) -> Self {
        DailyWeatherSource { records }
    }

    /// Skips records dated before `start` and returns the one for `start`.
    pub fn seek(&mut self, start: DayOfYear) -> Result<DailyWeatherRecord, ForcingError> {
        while let Some(record) = self.records.next_record()? {
            if record.day < start {
                continue;
            }
            if record.day > start {
                break;
            }
            debug!("Daily weather starts at {}", record.day);
            return Ok(record);
        }
        Err(ForcingError::MissingStartWeather { day: start })
    }

    /// Reads the record for `expected`, which must be the next one in the file.
    pub fn next_day(&mut self, expected: DayOfYear) -> Result<DailyWeatherRecord, ForcingError> {
        self.try_next_day(expected)?
            .ok_or(ForcingError::WeatherExhausted { day: expected })
    }

    /// As [`next_day`](Self::next_day), with the end of the file reported as `None`.
    pub fn try_next_day(
        &mut self,
        expected: DayOfYear,
    ) -> Result<Option<DailyWeatherRecord>, ForcingError> {
        let Some(record) = self.records.next_record()? else {
            return Ok(None);
        };
        if record.day != expected {
            return Err(ForcingError::WeatherOutOfSequence {
                expected,
                found: record.day,
            });
        }
        Ok(Some(record))
    }
}

/// Weather records given at every step end (hourly, or already at the simulation step).
pub struct HourlyWeatherSource {
    records: Box<dyn RecordSource<HourlyWeatherRecord>>,
    started: bool,
}

impl HourlyWeatherSource {
    pub fn new(records: Box<dyn RecordSource<HourlyWeatherRecord>>) -> Self {
        HourlyWeatherSource {
            records,
            started: false,
        }
    }

    /// Reads the records of `day` into the step-end hours `step, 2*step, ..., 24`. Values stay
    /// in the file's units; hours between step ends are left at zero.
    ///
    /// On the first call records are skipped until the one for hour `step` of `day`. After that
    /// every record must fall on the next step end. The record closing the day may be written as
    /// hour 24 of the day or hour 0 of the next.
    pub fn read_day(&mut self, day: DayOfYear, step: u8) -> Result<HourlyForcing, ForcingError> {
        let mut weather = HourlyForcing::default();
        let mut hours = HourOfDay::step_ends(step);

        if !self.started {
            let Some(first_hour) = hours.next() else {
                return Ok(weather);
            };
            let target = Timestamp::at(day, first_hour);
            let record = self.seek(target, day)?;
            store(&mut weather, first_hour, &record);
            self.started = true;
        }

        for hour in hours {
            let expected = Timestamp::at(day, hour);
            let record = self
                .records
                .next_record()?
                .ok_or(ForcingError::WeatherExhausted { day })?;
            if record.stamp != expected {
                return Err(ForcingError::HourlyWeatherOutOfSequence {
                    expected,
                    found: record.stamp,
                });
            }
            store(&mut weather, hour, &record);
        }

        Ok(weather)
    }

    fn seek(
        &mut self,
        target: Timestamp,
        day: DayOfYear,
    ) -> Result<HourlyWeatherRecord, ForcingError> {
        while let Some(record) = self.records.next_record()? {
            if record.stamp < target {
                continue;
            }
            if record.stamp > target {
                break;
            }
            debug!("Sub-daily weather starts at {}", record.stamp);
            return Ok(record);
        }
        Err(ForcingError::MissingStartWeather { day })
    }
}

fn store(weather: &mut HourlyForcing, hour: HourOfDay, record: &HourlyWeatherRecord) {
    weather.temperature[hour] = record.temperature;
    weather.wind_speed[hour] = record.wind;
    weather.humidity[hour] = record.humidity;
    weather.precipitation[hour] = record.precipitation;
    weather.snow_density[hour] = record.snow_density;
    weather.solar[hour] = record.solar;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::VecSource;

    fn daily(julian: i64, year: i32) -> DailyWeatherRecord {
        DailyWeatherRecord {
            day: DayOfYear::new(julian, year),
            max_temp: 20.0,
            min_temp: 5.0,
            dew_point: 2.0,
            wind: 100.0,
            precipitation: 0.0,
            solar: 200.0,
        }
    }

    fn hourly(julian: i64, hour: u8, year: i32, temperature: f64) -> HourlyWeatherRecord {
        HourlyWeatherRecord {
            stamp: Timestamp::new(julian, hour, year),
            temperature,
            wind: 2.0,
            humidity: 70.0,
            precipitation: 0.0,
            snow_density: 0.0,
            solar: 0.0,
        }
    }

    fn daily_source(records: Vec<DailyWeatherRecord>) -> DailyWeatherSource {
        DailyWeatherSource::new(Box::new(VecSource::new(records)))
    }

    #[test]
    fn test_daily_seek_and_sequence() {
        let mut source = daily_source(vec![daily(1, 2023), daily(2, 2023), daily(3, 2023)]);
        let first = source.seek(DayOfYear::new(2, 2023)).unwrap();
        assert_eq!(first.day, DayOfYear::new(2, 2023));
        let next = source.next_day(DayOfYear::new(3, 2023)).unwrap();
        assert_eq!(next.day, DayOfYear::new(3, 2023));
        assert!(matches!(
            source.next_day(DayOfYear::new(4, 2023)),
            Err(ForcingError::WeatherExhausted { .. })
        ));
    }

    #[test]
    fn test_daily_end_of_file_is_none() {
        let mut source = daily_source(vec![daily(1, 2023), daily(2, 2023)]);
        source.seek(DayOfYear::new(1, 2023)).unwrap();
        assert!(source.try_next_day(DayOfYear::new(2, 2023)).unwrap().is_some());
        assert!(source.try_next_day(DayOfYear::new(3, 2023)).unwrap().is_none());
    }

    #[test]
    fn test_daily_seek_missing_start() {
        let mut source = daily_source(vec![daily(5, 2023), daily(6, 2023)]);
        assert!(matches!(
            source.seek(DayOfYear::new(3, 2023)),
            Err(ForcingError::MissingStartWeather { .. })
        ));
    }

    #[test]
    fn test_daily_gap_is_out_of_sequence() {
        let mut source = daily_source(vec![daily(1, 2023), daily(3, 2023)]);
        source.seek(DayOfYear::new(1, 2023)).unwrap();
        assert!(matches!(
            source.next_day(DayOfYear::new(2, 2023)),
            Err(ForcingError::WeatherOutOfSequence { .. })
        ));
    }

    #[test]
    fn test_hourly_read_day_with_midnight_as_hour_zero() {
        let mut records = vec![hourly(1, 23, 2023, -1.0), hourly(1, 24, 2023, -2.0)];
        for hour in 1..=23 {
            records.push(hourly(2, hour, 2023, hour as f64));
        }
        // Day 2 closed by hour 0 of day 3
        records.push(hourly(3, 0, 2023, 24.0));
        let mut source = HourlyWeatherSource::new(Box::new(VecSource::new(records)));

        let weather = source.read_day(DayOfYear::new(2, 2023), 1).unwrap();
        assert_eq!(weather.temperature.at(1), 1.0);
        assert_eq!(weather.temperature.at(24), 24.0);
    }

    #[test]
    fn test_hourly_step_records_across_year_end() {
        let records = vec![
            hourly(366, 6, 2024, 6.0),
            hourly(366, 12, 2024, 12.0),
            hourly(366, 18, 2024, 18.0),
            hourly(1, 0, 2025, 24.0),
            hourly(1, 6, 2025, 30.0),
        ];
        let mut source = HourlyWeatherSource::new(Box::new(VecSource::new(records)));

        let weather = source.read_day(DayOfYear::new(366, 2024), 6).unwrap();
        assert_eq!(weather.temperature.at(6), 6.0);
        assert_eq!(weather.temperature.at(24), 24.0);
        assert_eq!(weather.temperature.at(7), 0.0);

        let err = source.read_day(DayOfYear::new(1, 2025), 6).unwrap_err();
        assert!(matches!(err, ForcingError::WeatherExhausted { .. }));
    }

    #[test]
    fn test_hourly_missing_hour_is_out_of_sequence() {
        let records = vec![hourly(1, 1, 2023, 0.0), hourly(1, 3, 2023, 0.0)];
        let mut source = HourlyWeatherSource::new(Box::new(VecSource::new(records)));
        assert!(matches!(
            source.read_day(DayOfYear::new(1, 2023), 1),
            Err(ForcingError::HourlyWeatherOutOfSequence { .. })
        ));
    }
}
