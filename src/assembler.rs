//! Builds the complete hourly forcing for each simulated day.

use log::{debug, info};

use crate::clock::{DayOfYear, HourOfDay, Timestamp};
use crate::config::{Config, PlantConfig, TimeStep, WeatherCadence};
use crate::date_gen::SimulationSchedule;
use crate::error::ForcingError;
use crate::forcing::{DailyForcing, HourlyForcing, HourlySeries, LowerBoundary};
use crate::readers::open_records;
use crate::streams::boundary::boundary_parser;
use crate::streams::extraction::extraction_parser;
use crate::streams::{BoundaryStream, ExtractionStream, PeriodicStream, PlantState, ResidueState};
use crate::units::MeasurementSystem;
use crate::weather::{
    DailyWeatherRecord, DailyWeatherSource, Disaggregator, HourlyWeatherRecord,
    HourlyWeatherSource,
};

/// Lowest wind speed handed to the solver [m/s]
pub const MIN_WIND_SPEED: f64 = 0.5;

/// Precipitation below this [m] carries no snow density
const TRACE_PRECIPITATION: f64 = 0.0001;

/// Where the day's weather comes from.
pub enum WeatherInput {
    Daily(Disaggregator),
    /// Hourly records, or records already at the simulation step
    SubDaily {
        source: HourlyWeatherSource,
        cadence: WeatherCadence,
    },
}

impl WeatherInput {
    fn cadence(&self) -> WeatherCadence {
        match self {
            WeatherInput::Daily(_) => WeatherCadence::Daily,
            WeatherInput::SubDaily { cadence, .. } => *cadence,
        }
    }
}

struct PlantSlot {
    config: PlantConfig,
    growth: Option<PeriodicStream<PlantState>>,
}

enum ResidueInput {
    Constant(ResidueState),
    Varying(PeriodicStream<ResidueState>),
}

pub struct ForcingAssembler {
    schedule: SimulationSchedule,
    step: TimeStep,
    units: MeasurementSystem,
    weather: WeatherInput,
    plants: Vec<PlantSlot>,
    residue: Option<ResidueInput>,
    extraction: Option<ExtractionStream>,
    boundary_temperature: Option<BoundaryStream>,
    boundary_moisture: Option<BoundaryStream>,
    initialized: bool,
}

impl ForcingAssembler {
    /// Checks the step divides the day and the start hour falls on a step before anything is
    /// read.
    pub fn new(
        schedule: SimulationSchedule,
        units: MeasurementSystem,
        weather: WeatherInput,
    ) -> Result<Self, ForcingError> {
        let step = TimeStep::new(schedule.hours_per_step())
            .map_err(|e| ForcingError::Config(e.into()))?;
        step.check_start_hour(schedule.start_hour())
            .map_err(|e| ForcingError::Config(e.into()))?;

        info!(
            "Forcing from {} at hour {}, {}-hour steps, {:?} weather in {:?} units",
            schedule.start_day(),
            schedule.start_hour(),
            step.hours(),
            weather.cadence(),
            units
        );

        Ok(ForcingAssembler {
            schedule,
            step,
            units,
            weather,
            plants: Vec::new(),
            residue: None,
            extraction: None,
            boundary_temperature: None,
            boundary_moisture: None,
            initialized: false,
        })
    }

    /// A plant whose canopy follows its configured LAI window.
    pub fn with_plant(mut self, config: PlantConfig) -> Self {
        self.plants.push(PlantSlot {
            config,
            growth: None,
        });
        self
    }

    /// A plant whose canopy is read from a growth stream.
    pub fn with_plant_growth(mut self, config: PlantConfig, growth: PeriodicStream<PlantState>) -> Self {
        self.plants.push(PlantSlot {
            config,
            growth: Some(growth),
        });
        self
    }

    pub fn with_residue(mut self, residue: ResidueState) -> Self {
        self.residue = Some(ResidueInput::Constant(residue));
        self
    }

    pub fn with_residue_stream(mut self, stream: PeriodicStream<ResidueState>) -> Self {
        self.residue = Some(ResidueInput::Varying(stream));
        self
    }

    pub fn with_water_extraction(mut self, stream: ExtractionStream) -> Self {
        self.extraction = Some(stream);
        self
    }

    pub fn with_lower_boundary_temperature(mut self, stream: BoundaryStream) -> Self {
        self.boundary_temperature = Some(stream);
        self
    }

    pub fn with_lower_boundary_moisture(mut self, stream: BoundaryStream) -> Self {
        self.boundary_moisture = Some(stream);
        self
    }

    /// Opens every input the configuration names.
    pub fn from_config(config: &Config) -> Result<Self, ForcingError> {
        let schedule = SimulationSchedule::from_config(config);
        let site = config.site();

        let weather_path = config.resolve(&config.inputs().weather)?;
        let weather = match config.weather_cadence() {
            WeatherCadence::Daily => {
                let records = open_records(&weather_path, DailyWeatherRecord::parser())?;
                WeatherInput::Daily(Disaggregator::new(
                    DailyWeatherSource::new(records),
                    site.latitude_radians(),
                    site.solar_noon(),
                ))
            }
            cadence => {
                let records = open_records(&weather_path, HourlyWeatherRecord::parser())?;
                WeatherInput::SubDaily {
                    source: HourlyWeatherSource::new(records),
                    cadence,
                }
            }
        };

        let mut assembler = ForcingAssembler::new(schedule, config.format().units(), weather)?;
        let time_varying = config.time_varying();
        let layout = config.format().plant_layout();

        for plant in config.plants() {
            match (&plant.growth_file, time_varying.plant_growth) {
                (Some(file), true) => {
                    let records = open_records(&config.resolve(file)?, PlantState::parser(layout))?;
                    let stream = PeriodicStream::new(format!("growth of plant {}", plant.name), records);
                    assembler = assembler.with_plant_growth(plant.clone(), stream);
                }
                _ => assembler = assembler.with_plant(plant.clone()),
            }
        }

        if time_varying.residue
            && let Some(file) = &config.inputs().residue
        {
            let records = open_records(&config.resolve(file)?, ResidueState::parser())?;
            assembler = assembler.with_residue_stream(PeriodicStream::new("residue cover", records));
        } else if let Some(residue) = config.residue() {
            assembler = assembler.with_residue(residue.clone());
        }

        if time_varying.water_extraction
            && let Some(file) = &config.inputs().water_extraction
        {
            let records = open_records(&config.resolve(file)?, extraction_parser())?;
            assembler = assembler.with_water_extraction(ExtractionStream::new(
                "water extraction",
                records,
                config.soil_layers(),
            ));
        }

        if let Some(file) = &config.inputs().lower_boundary_temperature {
            let records = open_records(&config.resolve(file)?, boundary_parser(config.soil_layers()))?;
            assembler = assembler.with_lower_boundary_temperature(BoundaryStream::new(
                "lower boundary temperature",
                records,
            ));
        }

        if let Some(file) = &config.inputs().lower_boundary_moisture {
            let records = open_records(&config.resolve(file)?, boundary_parser(config.soil_layers()))?;
            assembler = assembler.with_lower_boundary_moisture(BoundaryStream::new(
                "lower boundary moisture",
                records,
            ));
        }

        Ok(assembler)
    }

    pub fn schedule(&self) -> &SimulationSchedule {
        &self.schedule
    }

    fn initialize(&mut self) -> Result<(), ForcingError> {
        let start = self.schedule.start();
        let start_of_day = Timestamp::start_of(self.schedule.start_day());

        for plant in &mut self.plants {
            if let Some(growth) = &mut plant.growth {
                growth.initialize(start_of_day)?;
            }
        }
        if let Some(ResidueInput::Varying(stream)) = &mut self.residue {
            stream.initialize(start_of_day)?;
        }
        if let Some(stream) = &mut self.extraction {
            stream.initialize(start)?;
        }
        for stream in [&mut self.boundary_temperature, &mut self.boundary_moisture]
            .into_iter()
            .flatten()
        {
            stream.initialize(start)?;
        }

        self.initialized = true;
        debug!("Periodic inputs positioned at {}", start);
        Ok(())
    }

    /// Everything the solver needs for `day`. Days must be requested in order, starting with
    /// the schedule's first day.
    pub fn assemble(&mut self, day: DayOfYear) -> Result<DailyForcing, ForcingError> {
        if !self.initialized {
            self.initialize()?;
        }

        let weather = self.day_weather(day)?;

        let today = Timestamp::start_of(day);
        let mut plants = Vec::with_capacity(self.plants.len());
        for plant in &mut self.plants {
            let state = match &mut plant.growth {
                Some(growth) => growth.value_at(today)?,
                None => plant.config.state_on(day.julian()),
            };
            plants.push(state);
        }

        let residue = match &mut self.residue {
            Some(ResidueInput::Constant(residue)) => Some(residue.clone()),
            Some(ResidueInput::Varying(stream)) => Some(stream.value_at(today)?),
            None => None,
        };

        let step_ends = self.schedule.step_ends(day);
        let water_extraction = match &mut self.extraction {
            Some(stream) => Some(stream.day_rates(day, &step_ends)?),
            None => None,
        };

        let step = self.step.hours();
        let lower_boundary = LowerBoundary {
            temperature: match &mut self.boundary_temperature {
                Some(stream) => Some(stream.day_values(day, step)?),
                None => None,
            },
            water_content: match &mut self.boundary_moisture {
                Some(stream) => Some(stream.day_values(day, step)?),
                None => None,
            },
        };

        Ok(DailyForcing {
            day,
            step_ends,
            weather,
            plants,
            residue,
            water_extraction,
            lower_boundary,
        })
    }

    fn day_weather(&mut self, day: DayOfYear) -> Result<HourlyForcing, ForcingError> {
        let units = self.units;
        let step = self.step.hours();
        let (mut weather, record_step) = match &mut self.weather {
            WeatherInput::Daily(disaggregator) => {
                let mut weather = disaggregator.next_day(day)?;
                weather
                    .wind_speed
                    .map_in_place(|wind| units.daily_wind_run_to_hourly(wind));
                (weather, 1)
            }
            WeatherInput::SubDaily { source, cadence } => {
                let record_step = match cadence {
                    WeatherCadence::MatchesStep => step,
                    _ => 1,
                };
                (source.read_day(day, record_step)?, record_step)
            }
        };

        for hour in HourOfDay::step_ends(record_step) {
            weather.humidity[hour] /= 100.0;
            weather.precipitation[hour] = units.precipitation_to_m(weather.precipitation[hour]);
            weather.wind_speed[hour] = units
                .wind_to_mps(weather.wind_speed[hour])
                .max(MIN_WIND_SPEED);
        }

        if step > 1 && record_step == 1 {
            block_average(&mut weather, step);
        }
        Ok(weather)
    }
}

/// Folds hourly weather into steps of `step` hours, stored at each step's last hour.
/// Temperature, humidity, wind and solar are averaged and precipitation summed. Snow density is
/// the precipitation-weighted mean over the hours that had snow, or zero if none did.
pub fn block_average(weather: &mut HourlyForcing, step: u8) {
    let n = step as f64;
    for end in HourOfDay::step_ends(step) {
        let hours: Vec<HourOfDay> = (end.get() + 1 - step..=end.get())
            .filter_map(HourOfDay::new)
            .collect();

        let mean = |series: &HourlySeries| hours.iter().map(|&h| series[h]).sum::<f64>() / n;
        let temperature = mean(&weather.temperature);
        let humidity = mean(&weather.humidity);
        let wind = mean(&weather.wind_speed);
        let solar = mean(&weather.solar);
        let precipitation: f64 = hours.iter().map(|&h| weather.precipitation[h]).sum();

        let (snow_water, snow_mass) = hours
            .iter()
            .map(|&h| (weather.precipitation[h], weather.snow_density[h]))
            .filter(|(precip, density)| precip * density > 0.0)
            .fold((0.0, 0.0), |(water, mass), (precip, density)| {
                (water + precip, mass + precip * density)
            });
        let snow_density = if snow_water > 0.0 && precipitation >= TRACE_PRECIPITATION {
            snow_mass / snow_water
        } else {
            0.0
        };

        weather.temperature[end] = temperature;
        weather.humidity[end] = humidity;
        weather.wind_speed[end] = wind;
        weather.solar[end] = solar;
        weather.precipitation[end] = precipitation;
        weather.snow_density[end] = snow_density;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::VecSource;
    use crate::solar::SolarGeometry;
    use crate::streams::PeriodicObservation;
    use crate::weather::disaggregate_day;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn daily_record(julian: i64, wind: f64, precipitation: f64) -> DailyWeatherRecord {
        DailyWeatherRecord {
            day: DayOfYear::new(julian, 2023),
            max_temp: 25.0,
            min_temp: 10.0,
            dew_point: 5.0,
            wind,
            precipitation,
            solar: 220.0,
        }
    }

    fn daily_weather(records: Vec<DailyWeatherRecord>) -> WeatherInput {
        WeatherInput::Daily(Disaggregator::new(
            DailyWeatherSource::new(Box::new(VecSource::new(records))),
            40.0_f64.to_radians(),
            12.0,
        ))
    }

    fn schedule(step: u8, start_hour: u8) -> SimulationSchedule {
        SimulationSchedule::new(DayOfYear::new(150, 2023), DayOfYear::new(152, 2023), start_hour, step)
    }

    fn plant() -> PlantConfig {
        PlantConfig {
            name: "grass".to_string(),
            leaf_on: 100,
            leaf_off: 280,
            full_lai: 2.0,
            height: 0.3,
            leaf_dimension: 0.01,
            clumping: 1.0,
            dry_weight: 0.2,
            root_depth: 0.4,
            growth_file: None,
        }
    }

    #[test]
    fn test_rejects_step_not_dividing_day() {
        let weather = daily_weather(vec![daily_record(150, 10.0, 0.0)]);
        let result = ForcingAssembler::new(schedule(5, 0), MeasurementSystem::English, weather);
        assert!(matches!(result, Err(ForcingError::Config(_))));
    }

    #[test]
    fn test_rejects_start_hour_off_step() {
        let weather = daily_weather(vec![daily_record(150, 10.0, 0.0)]);
        let result = ForcingAssembler::new(schedule(6, 3), MeasurementSystem::English, weather);
        assert!(matches!(result, Err(ForcingError::Config(_))));
    }

    #[test]
    fn test_english_wind_run_is_floored() {
        let weather = daily_weather(vec![daily_record(150, 10.0, 0.0), daily_record(151, 10.0, 0.0)]);
        let mut assembler =
            ForcingAssembler::new(schedule(1, 0), MeasurementSystem::English, weather).unwrap();
        let forcing = assembler.assemble(DayOfYear::new(150, 2023)).unwrap();

        // 10 miles/day averages 0.186 m/s before the floor
        let today = daily_record(150, 10.0, 0.0);
        let geometry = SolarGeometry::calculate(150, 40.0_f64.to_radians(), 12.0);
        let mut unfloored = disaggregate_day(&geometry, (25.0, 10.0), &today, 10.0).wind_speed;
        let units = MeasurementSystem::English;
        unfloored.map_in_place(|wind| units.wind_to_mps(units.daily_wind_run_to_hourly(wind)));
        assert_abs_diff_eq!(unfloored.mean(), 0.186, epsilon = 0.01);
        assert!(unfloored.max() < MIN_WIND_SPEED);

        for (_, wind) in forcing.weather.wind_speed.iter() {
            assert!(wind >= MIN_WIND_SPEED);
        }
        assert_eq!(forcing.weather.wind_speed, HourlySeries::filled(MIN_WIND_SPEED));
    }

    #[test]
    fn test_units_converted() {
        let weather = daily_weather(vec![daily_record(150, 240.0, 1.0), daily_record(151, 240.0, 0.0)]);
        let mut assembler =
            ForcingAssembler::new(schedule(1, 0), MeasurementSystem::English, weather).unwrap();
        let forcing = assembler.assemble(DayOfYear::new(150, 2023)).unwrap();

        // 240 miles/day is 10 mph, 4.47 m/s
        assert_abs_diff_eq!(forcing.weather.wind_speed.mean(), 4.47, epsilon = 0.05);
        assert_relative_eq!(forcing.weather.precipitation.sum(), 0.0254, max_relative = 1e-9);
        assert!(forcing.weather.humidity.max() <= 1.0);
        assert!(forcing.weather.humidity.min() > 0.0);
    }

    #[test]
    fn test_step_average_keeps_totals() {
        let hourly_weather = daily_weather(vec![daily_record(150, 5.0, 8.0), daily_record(151, 5.0, 0.0)]);
        let mut hourly =
            ForcingAssembler::new(schedule(1, 0), MeasurementSystem::Si, hourly_weather).unwrap();
        let hourly = hourly.assemble(DayOfYear::new(150, 2023)).unwrap().weather;

        let stepped_weather = daily_weather(vec![daily_record(150, 5.0, 8.0), daily_record(151, 5.0, 0.0)]);
        let mut stepped =
            ForcingAssembler::new(schedule(6, 0), MeasurementSystem::Si, stepped_weather).unwrap();
        let stepped = stepped.assemble(DayOfYear::new(150, 2023)).unwrap().weather;

        let step_total: f64 = [6, 12, 18, 24].iter().map(|&h| stepped.precipitation.at(h)).sum();
        assert_relative_eq!(step_total, 0.008, max_relative = 1e-9);
        let step_solar: f64 = [6, 12, 18, 24].iter().map(|&h| stepped.solar.at(h)).sum::<f64>() / 4.0;
        assert_relative_eq!(step_solar, hourly.solar.mean(), epsilon = 1e-9);
        let first_step_temp = (1..=6).map(|h| hourly.temperature.at(h)).sum::<f64>() / 6.0;
        assert_relative_eq!(stepped.temperature.at(6), first_step_temp, epsilon = 1e-12);
    }

    #[test]
    fn test_block_average_snow_density() {
        let mut weather = HourlyForcing::default();
        weather.precipitation = HourlySeries::from_fn(|h| match h.get() {
            1 => 0.002,
            2 => 0.001,
            3 => 0.003,
            _ => 0.0,
        });
        weather.snow_density = HourlySeries::from_fn(|h| match h.get() {
            1 => 100.0,
            3 => 200.0,
            5 => 300.0, // no precipitation, not snow
            _ => 0.0,
        });

        block_average(&mut weather, 6);

        assert_relative_eq!(weather.precipitation.at(6), 0.006, epsilon = 1e-12);
        // Weighted over the snowy hours only: (0.002*100 + 0.003*200) / 0.005
        assert_relative_eq!(weather.snow_density.at(6), 160.0, epsilon = 1e-9);
        assert_eq!(weather.snow_density.at(12), 0.0);
    }

    #[test]
    fn test_plants_and_residue() {
        let weather = daily_weather(vec![
            daily_record(150, 100.0, 0.0),
            daily_record(151, 100.0, 0.0),
            daily_record(152, 100.0, 0.0),
        ]);
        let growth = PeriodicStream::new(
            "growth of plant corn",
            Box::new(VecSource::new(vec![
                PeriodicObservation::new(
                    Timestamp::start_of(DayOfYear::new(140, 2023)),
                    PlantState {
                        height: 0.0,
                        leaf_dimension: 0.05,
                        clumping: 1.0,
                        dry_weight: 0.0,
                        leaf_area_index: 0.0,
                        root_depth: 0.1,
                    },
                ),
                PeriodicObservation::new(
                    Timestamp::start_of(DayOfYear::new(160, 2023)),
                    PlantState {
                        height: 2.0,
                        leaf_dimension: 0.05,
                        clumping: 1.0,
                        dry_weight: 1.0,
                        leaf_area_index: 4.0,
                        root_depth: 0.5,
                    },
                ),
            ])),
        );
        let residue = ResidueState {
            thickness: 0.02,
            load: 0.5,
            cover: 0.9,
            albedo: 0.3,
            vapor_resistance: 4000.0,
            convection: 0.007,
        };

        let mut assembler = ForcingAssembler::new(schedule(1, 0), MeasurementSystem::English, weather)
            .unwrap()
            .with_plant(plant())
            .with_plant_growth(PlantConfig { name: "corn".to_string(), ..plant() }, growth)
            .with_residue(residue.clone());

        let forcing = assembler.assemble(DayOfYear::new(150, 2023)).unwrap();
        assert_eq!(forcing.plants.len(), 2);
        // Constant plant is in full leaf between its ramps
        assert_eq!(forcing.plants[0].leaf_area_index, 2.0);
        // Growth stream overrides the configured values, LAI included
        assert_relative_eq!(forcing.plants[1].leaf_area_index, 2.0, epsilon = 1e-12);
        assert_relative_eq!(forcing.plants[1].height, 1.0, epsilon = 1e-12);
        assert_eq!(forcing.residue, Some(residue));
        assert!(forcing.water_extraction.is_none());
        assert_eq!(forcing.lower_boundary, LowerBoundary::default());

        let forcing = assembler.assemble(DayOfYear::new(151, 2023)).unwrap();
        assert_relative_eq!(forcing.plants[1].leaf_area_index, 2.2, epsilon = 1e-12);
    }

    #[test]
    fn test_matches_step_weather() {
        let mut records = Vec::new();
        for julian in [150, 151] {
            for hour in [6u8, 12, 18, 24] {
                records.push(HourlyWeatherRecord {
                    stamp: Timestamp::new(julian, hour, 2023),
                    temperature: hour as f64,
                    wind: 0.0,
                    humidity: 50.0,
                    precipitation: 2.0,
                    snow_density: 0.0,
                    solar: 100.0,
                });
            }
        }
        let weather = WeatherInput::SubDaily {
            source: HourlyWeatherSource::new(Box::new(VecSource::new(records))),
            cadence: WeatherCadence::MatchesStep,
        };
        let mut assembler = ForcingAssembler::new(schedule(6, 0), MeasurementSystem::Si, weather).unwrap();
        let forcing = assembler.assemble(DayOfYear::new(150, 2023)).unwrap();

        assert_eq!(forcing.weather.temperature.at(12), 12.0);
        assert_relative_eq!(forcing.weather.humidity.at(12), 0.5, max_relative = 1e-9);
        assert_relative_eq!(forcing.weather.precipitation.at(18), 0.002, max_relative = 1e-9);
        assert_eq!(forcing.weather.wind_speed.at(24), MIN_WIND_SPEED);
        // Records are already per step; no averaging
        assert_eq!(forcing.weather.temperature.at(11), 0.0);
    }

    #[test]
    fn test_weather_ending_on_last_day() {
        let weather = daily_weather(vec![daily_record(150, 100.0, 0.0), daily_record(151, 100.0, 0.0)]);
        let schedule =
            SimulationSchedule::new(DayOfYear::new(150, 2023), DayOfYear::new(151, 2023), 0, 1);
        let mut assembler = ForcingAssembler::new(schedule, MeasurementSystem::English, weather).unwrap();

        for julian in [150, 151] {
            let day = DayOfYear::new(julian, 2023);
            assert!(assembler.assemble(day).is_ok(), "{} failed", day);
        }
        assert!(matches!(
            assembler.assemble(DayOfYear::new(152, 2023)),
            Err(ForcingError::WeatherExhausted { .. })
        ));
    }

    #[test]
    fn test_hourly_weather_averaged_into_steps() {
        let mut records = Vec::new();
        for hour in 1..=24u8 {
            records.push(HourlyWeatherRecord {
                stamp: Timestamp::new(150, hour, 2023),
                temperature: hour as f64,
                wind: 3.0,
                humidity: 50.0,
                precipitation: 1.0,
                snow_density: 0.0,
                solar: 10.0 * hour as f64,
            });
        }
        let weather = WeatherInput::SubDaily {
            source: HourlyWeatherSource::new(Box::new(VecSource::new(records))),
            cadence: WeatherCadence::SubDaily,
        };
        let mut assembler = ForcingAssembler::new(schedule(6, 0), MeasurementSystem::Si, weather).unwrap();
        let forcing = assembler.assemble(DayOfYear::new(150, 2023)).unwrap();

        assert_relative_eq!(forcing.weather.temperature.at(6), 3.5, epsilon = 1e-12);
        assert_relative_eq!(forcing.weather.temperature.at(24), 21.5, epsilon = 1e-12);
        assert_relative_eq!(forcing.weather.solar.at(12), 95.0, epsilon = 1e-9);
        assert_relative_eq!(forcing.weather.humidity.at(18), 0.5, epsilon = 1e-12);
        assert_relative_eq!(forcing.weather.wind_speed.at(18), 3.0, epsilon = 1e-12);
        // 1 mm every hour, summed over the step
        assert_relative_eq!(forcing.weather.precipitation.at(12), 0.006, epsilon = 1e-12);
        assert_relative_eq!(forcing.total_precipitation(), 0.024, epsilon = 1e-12);
    }

    #[test]
    fn test_water_extraction_and_lower_boundary() {
        let weather = daily_weather(vec![daily_record(150, 100.0, 0.0), daily_record(151, 100.0, 0.0)]);
        let extraction = ExtractionStream::new(
            "water extraction",
            Box::new(VecSource::new(vec![PeriodicObservation::new(
                Timestamp::new(151, 0, 2023),
                vec![0.864, 0.0],
            )])),
            2,
        );
        let boundary = BoundaryStream::new(
            "lower boundary temperature",
            Box::new(VecSource::new(vec![
                PeriodicObservation::new(Timestamp::new(150, 0, 2023), 4.0),
                PeriodicObservation::new(Timestamp::new(151, 0, 2023), 6.4),
            ])),
        );

        let mut assembler = ForcingAssembler::new(schedule(12, 0), MeasurementSystem::Si, weather)
            .unwrap()
            .with_water_extraction(extraction)
            .with_lower_boundary_temperature(boundary);
        let forcing = assembler.assemble(DayOfYear::new(150, 2023)).unwrap();

        let extraction = forcing.water_extraction.unwrap();
        assert_eq!(extraction.len(), 2);
        assert_relative_eq!(extraction[0].at(12), 1e-5, epsilon = 1e-15);
        assert_relative_eq!(extraction[0].at(24), 1e-5, epsilon = 1e-15);
        assert_eq!(extraction[1].at(12), 0.0);

        let temperature = forcing.lower_boundary.temperature.unwrap();
        // Mean of hours 1..=12 at 0.1 per hour from 4.0
        assert_relative_eq!(temperature.at(12), 4.65, epsilon = 1e-9);
        assert!(forcing.lower_boundary.water_content.is_none());
    }
}
