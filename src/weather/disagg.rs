//! Daily weather summaries to 24 hourly values.

use std::f64::consts::PI;

use log::info;

use super::{DailyWeatherRecord, DailyWeatherSource};
use crate::clock::{DayOfYear, HourOfDay};
use crate::error::ForcingError;
use crate::forcing::{HourlyForcing, HourlySeries};
use crate::psychro::relative_humidity;
use crate::solar::SolarGeometry;

/// Hours from sunrise to the daily minimum temperature
const MIN_TEMP_OFFSET: f64 = -0.8;

/// Hours from sunset to dusk, where the nighttime temperature decline starts
const DUSK_OFFSET: f64 = 1.7;

/// Wind at its afternoon peak relative to the daily mean
const NOON_WIND_FACTOR: f64 = 1.25;

/// Hours from sunrise until the wind starts to pick up, and from sunset until it settles
const WIND_LAG: f64 = 1.0;

/// Spreads one day of weather over 24 hours.
///
/// # Arguments
/// * `geometry` - Solar geometry of the day
/// * `yesterday` - Previous day's (max, min) temperature, used for the early morning decline
/// * `today` - The day's record
/// * `tomorrow_min` - Next day's minimum temperature, approached after dusk
///
/// Wind and precipitation keep the record's units.
pub fn disaggregate_day(
    geometry: &SolarGeometry,
    yesterday: (f64, f64),
    today: &DailyWeatherRecord,
    tomorrow_min: f64,
) -> HourlyForcing {
    let temperature = hourly_temperature(geometry, yesterday, today, tomorrow_min);
    let humidity =
        HourlySeries::from_fn(|hour| relative_humidity(temperature[hour], today.dew_point));

    HourlyForcing {
        temperature,
        humidity,
        wind_speed: hourly_wind(geometry, today.wind),
        solar: hourly_solar(geometry, today.solar),
        precipitation: hourly_precipitation(geometry, today.precipitation),
        snow_density: HourlySeries::zeros(),
    }
}

fn hourly_solar(geometry: &SolarGeometry, observed: f64) -> HourlySeries {
    let mut solar = if geometry.day_length > 0.0 {
        // Transmissivity is undefined without extraterrestrial radiation
        let transmissivity = if geometry.max_daily_solar > 0.0 {
            observed / geometry.max_daily_solar
        } else {
            1.0
        };
        let curve = geometry.clear_sky_curve();
        HourlySeries::from_fn(|hour| transmissivity * curve[hour.index()])
    } else {
        HourlySeries::filled(observed)
    };

    let mean = solar.mean();
    if mean > 0.0 {
        solar.map_in_place(|value| observed * value / mean);
    }
    solar
}

fn hourly_temperature(
    geometry: &SolarGeometry,
    (yesterday_max, yesterday_min): (f64, f64),
    today: &DailyWeatherRecord,
    tomorrow_min: f64,
) -> HourlySeries {
    let time_of_min = geometry.sunrise + MIN_TEMP_OFFSET;
    let time_of_max = (geometry.sunset + geometry.solar_noon) / 2.0;
    let warming = time_of_max - time_of_min;
    let dusk = geometry.sunset + DUSK_OFFSET;
    let night = time_of_min + 24.0 - dusk;

    let cosine = |max: f64, min: f64, t: f64| {
        0.5 * (max + min + (max - min) * (PI / warming * (t - time_of_max)).cos())
    };
    let yesterday_dusk = cosine(yesterday_max, yesterday_min, dusk);
    let today_dusk = cosine(today.max_temp, today.min_temp, dusk);

    HourlySeries::from_fn(|hour| {
        let t = hour.get() as f64;
        if t < time_of_min {
            yesterday_dusk - (yesterday_dusk - today.min_temp) * (24.0 + t - dusk) / night
        } else if t > time_of_max && t >= dusk {
            today_dusk - (today_dusk - tomorrow_min) * (t - dusk) / night
        } else {
            cosine(today.max_temp, today.min_temp, t)
        }
    })
}

fn hourly_wind(geometry: &SolarGeometry, wind: f64) -> HourlySeries {
    let day_length = geometry.day_length;
    // Keeps the daily mean equal to the input
    let night_factor = (24.0 - NOON_WIND_FACTOR * 2.0 * day_length / PI)
        / (24.0 - 2.0 * day_length / PI);
    let rise = geometry.sunrise + WIND_LAG;
    let settle = geometry.sunset + WIND_LAG;

    HourlySeries::from_fn(|hour| {
        let t = hour.get() as f64;
        if t < rise || t >= settle {
            night_factor * wind
        } else {
            let angle = (t - rise) * PI / day_length;
            wind * (night_factor + (NOON_WIND_FACTOR - night_factor) * angle.sin())
        }
    })
}

/// Hour at which the day's precipitation falls: midway between the minimum temperature and
/// early afternoon.
pub fn precipitation_hour(geometry: &SolarGeometry) -> HourOfDay {
    let time_of_min = geometry.sunrise + MIN_TEMP_OFFSET;
    nearest_hour((time_of_min + geometry.solar_noon + 1.8) / 2.0)
}

/// Rounds half-way times to the even hour.
fn nearest_hour(time: f64) -> HourOfDay {
    let hour = time.round_ties_even().clamp(1.0, 24.0) as u8;
    HourOfDay::new(hour).unwrap_or(HourOfDay::MIDNIGHT)
}

fn hourly_precipitation(geometry: &SolarGeometry, amount: f64) -> HourlySeries {
    let mut precipitation = HourlySeries::zeros();
    precipitation[precipitation_hour(geometry)] = amount;
    precipitation
}

struct CarriedDay {
    yesterday: (f64, f64),
    today: DailyWeatherRecord,
}

/// Stateful daily-to-hourly conversion over a weather file.
///
/// Each day also reads the record of the day after. When the file ends on the last day, that
/// day's own minimum stands in for the next morning.
pub struct Disaggregator {
    source: DailyWeatherSource,
    latitude: f64,
    solar_noon: f64,
    carried: Option<CarriedDay>,
    drained: bool,
}

impl Disaggregator {
    /// `latitude` in radians, `solar_noon` as a clock hour.
    pub fn new(source: DailyWeatherSource, latitude: f64, solar_noon: f64) -> Self {
        Disaggregator {
            source,
            latitude,
            solar_noon,
            carried: None,
            drained: false,
        }
    }

    /// Hourly weather for `day`. Days must be requested one after another.
    pub fn next_day(&mut self, day: DayOfYear) -> Result<HourlyForcing, ForcingError> {
        if self.drained {
            return Err(ForcingError::WeatherExhausted { day });
        }

        let carried = match self.carried.take() {
            Some(carried) => carried,
            None => {
                let today = self.source.seek(day)?;
                info!(
                    "No weather before {}: using the day's own max/min temperature for the previous night",
                    day
                );
                CarriedDay {
                    yesterday: (today.max_temp, today.min_temp),
                    today,
                }
            }
        };

        if carried.today.day != day {
            return Err(ForcingError::WeatherOutOfSequence {
                expected: carried.today.day,
                found: day,
            });
        }

        let tomorrow = match self.source.try_next_day(day.next())? {
            Some(record) => record,
            None => {
                info!(
                    "Weather ends on {}: its minimum temperature carries into the next morning",
                    day
                );
                self.drained = true;
                carried.today.clone()
            }
        };

        let geometry = SolarGeometry::calculate(day.julian(), self.latitude, self.solar_noon);
        let weather = disaggregate_day(&geometry, carried.yesterday, &carried.today, tomorrow.min_temp);

        if !self.drained {
            self.carried = Some(CarriedDay {
                yesterday: (carried.today.max_temp, carried.today.min_temp),
                today: tomorrow,
            });
        }
        Ok(weather)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::VecSource;
    use approx::assert_relative_eq;

    fn record(julian: i64, max_temp: f64, min_temp: f64) -> DailyWeatherRecord {
        DailyWeatherRecord {
            day: DayOfYear::new(julian, 2023),
            max_temp,
            min_temp,
            dew_point: 2.0,
            wind: 10.0,
            precipitation: 0.4,
            solar: 250.0,
        }
    }

    fn geometry(julian: u32) -> SolarGeometry {
        SolarGeometry::calculate(julian, 43.0_f64.to_radians(), 12.0)
    }

    #[test]
    fn test_solar_mean_matches_daily_value() {
        for julian in [20, 100, 172, 300] {
            let weather = disaggregate_day(&geometry(julian), (20.0, 5.0), &record(julian as i64, 20.0, 5.0), 5.0);
            assert_relative_eq!(weather.solar.mean(), 250.0, epsilon = 1e-9);
            assert_eq!(weather.solar.at(1), 0.0);
        }
    }

    #[test]
    fn test_solar_spread_evenly_without_daylight() {
        let polar = SolarGeometry::calculate(355, 80.0_f64.to_radians(), 12.0);
        let today = DailyWeatherRecord {
            solar: 3.0,
            ..record(355, -20.0, -30.0)
        };
        let weather = disaggregate_day(&polar, (-20.0, -30.0), &today, -30.0);
        assert_eq!(weather.solar, HourlySeries::filled(3.0));
    }

    #[test]
    fn test_precipitation_single_hour() {
        let weather = disaggregate_day(&geometry(172), (20.0, 5.0), &record(172, 20.0, 5.0), 5.0);
        let wet: Vec<_> = weather
            .precipitation
            .iter()
            .filter(|(_, value)| *value > 0.0)
            .collect();
        assert_eq!(wet.len(), 1);
        assert_relative_eq!(weather.precipitation.sum(), 0.4, max_relative = 1e-9);
        assert_eq!(weather.snow_density, HourlySeries::zeros());
    }

    #[test]
    fn test_nearest_hour_rounds_half_to_even() {
        assert_eq!(nearest_hour(9.5).get(), 10);
        assert_eq!(nearest_hour(10.5).get(), 10);
        assert_eq!(nearest_hour(10.51).get(), 11);
        assert_eq!(nearest_hour(0.2).get(), 1);
        assert_eq!(nearest_hour(30.0).get(), 24);
    }

    #[test]
    fn test_precipitation_falls_mid_morning() {
        // Equinox: sunrise at 6, so (6 - 0.8 + 12 + 1.8) / 2 is just under 9.5
        let equinox = SolarGeometry::calculate(80, 0.0, 12.0);
        assert_eq!(precipitation_hour(&equinox).get(), 9);
    }

    #[test]
    fn test_temperature_stays_between_extremes() {
        let weather = disaggregate_day(&geometry(172), (20.0, 5.0), &record(172, 20.0, 5.0), 5.0);
        let max = weather.temperature.max();
        let min = weather.temperature.min();
        assert!(max <= 20.0 + 1e-9 && max > 19.0, "max = {}", max);
        assert!(min >= 5.0 - 1e-9 && min < 6.5, "min = {}", min);
        // Warmest in the afternoon
        let warmest = weather
            .temperature
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .unwrap()
            .0;
        assert!((13..=17).contains(&warmest.get()));
    }

    #[test]
    fn test_humidity_capped_at_saturation() {
        let today = DailyWeatherRecord {
            dew_point: 10.0,
            ..record(172, 20.0, 5.0)
        };
        let weather = disaggregate_day(&geometry(172), (20.0, 5.0), &today, 5.0);
        assert!(weather.humidity.max() <= 100.0);
        // Saturated in the early morning when the air is below the dew point
        assert_eq!(weather.humidity.at(5), 100.0);
        assert!(weather.humidity.at(15) < 60.0);
    }

    #[test]
    fn test_wind_keeps_daily_mean() {
        let weather = disaggregate_day(&geometry(172), (20.0, 5.0), &record(172, 20.0, 5.0), 5.0);
        assert_relative_eq!(weather.wind_speed.mean(), 10.0, epsilon = 0.5);
        assert!(weather.wind_speed.at(15) > weather.wind_speed.at(3));
    }

    #[test]
    fn test_disaggregator_carries_previous_day() {
        let records = vec![
            record(100, 20.0, 5.0),
            record(101, 30.0, 10.0),
            record(102, 25.0, 8.0),
        ];
        let source = DailyWeatherSource::new(Box::new(VecSource::new(records)));
        let mut disaggregator = Disaggregator::new(source, 43.0_f64.to_radians(), 12.0);

        let first = disaggregator.next_day(DayOfYear::new(100, 2023)).unwrap();
        let second = disaggregator.next_day(DayOfYear::new(101, 2023)).unwrap();

        // The first night has no real previous day, so it falls from the day's own dusk
        let expected_first = disaggregate_day(&geometry(100), (20.0, 5.0), &record(100, 20.0, 5.0), 10.0);
        assert_eq!(first, expected_first);
        let expected_second = disaggregate_day(&geometry(101), (20.0, 5.0), &record(101, 30.0, 10.0), 8.0);
        assert_eq!(second, expected_second);

        // The file ends on day 102, which borrows its own minimum for the next morning
        let last = disaggregator.next_day(DayOfYear::new(102, 2023)).unwrap();
        let expected_last = disaggregate_day(&geometry(102), (30.0, 10.0), &record(102, 25.0, 8.0), 8.0);
        assert_eq!(last, expected_last);

        assert!(matches!(
            disaggregator.next_day(DayOfYear::new(103, 2023)),
            Err(ForcingError::WeatherExhausted { .. })
        ));
    }

    #[test]
    fn test_disaggregator_weather_ending_on_last_day() {
        let records = vec![record(100, 20.0, 5.0), record(101, 22.0, 6.0)];
        let source = DailyWeatherSource::new(Box::new(VecSource::new(records)));
        let mut disaggregator = Disaggregator::new(source, 43.0_f64.to_radians(), 12.0);

        assert!(disaggregator.next_day(DayOfYear::new(100, 2023)).is_ok());
        assert!(disaggregator.next_day(DayOfYear::new(101, 2023)).is_ok());
        assert!(matches!(
            disaggregator.next_day(DayOfYear::new(102, 2023)),
            Err(ForcingError::WeatherExhausted { .. })
        ));
    }

    #[test]
    fn test_disaggregator_rejects_skipped_day() {
        let records = vec![record(100, 20.0, 5.0), record(101, 20.0, 5.0), record(102, 20.0, 5.0)];
        let source = DailyWeatherSource::new(Box::new(VecSource::new(records)));
        let mut disaggregator = Disaggregator::new(source, 0.7, 12.0);
        disaggregator.next_day(DayOfYear::new(100, 2023)).unwrap();
        assert!(matches!(
            disaggregator.next_day(DayOfYear::new(102, 2023)),
            Err(ForcingError::WeatherOutOfSequence { .. })
        ));
    }
}
