use log::{debug, error, info};

use soilforce::config::Config;
use soilforce::logging::init_logging;
use soilforce::{DailyForcing, ForcingAssembler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .unwrap_or_else(|| "./data/config/forcing.json".to_string());
    let level = args.next();
    init_logging(level.as_deref());

    info!("Reading configuration from {}", config_path);
    let config = Config::from_file(&config_path)?;

    let mut assembler = ForcingAssembler::from_config(&config)?;
    let schedule = *assembler.schedule();
    let mut clock = schedule.clock();
    let mut days = 0usize;
    while clock.now() < schedule.end() {
        let day = clock.day();
        debug!(
            "Julian day {} of {} ({} days), first step ends at hour {}",
            clock.julian(),
            clock.year(),
            clock.days_in_year(),
            clock.hour()
        );
        match assembler.assemble(day) {
            Ok(forcing) => {
                summarize(&forcing);
                for _ in &forcing.step_ends {
                    clock.advance();
                }
                days += 1;
            }
            Err(e) => {
                error!("Stopping at {}: {}", day, e);
                return Err(e.into());
            }
        }
    }

    info!("Assembled forcing for {} days", days);
    Ok(())
}

fn summarize(forcing: &DailyForcing) {
    let weather = &forcing.weather;
    let lai: f64 = forcing.plants.iter().map(|p| p.leaf_area_index).sum();
    info!(
        "{}: T {:6.1}..{:6.1} C  solar {:6.1} W/m2  wind {:4.1} m/s  precip {:7.4} m  LAI {:4.2}",
        forcing.day,
        weather.temperature.min(),
        weather.temperature.max(),
        weather.solar.mean(),
        weather.wind_speed.mean(),
        forcing.total_precipitation(),
        lai
    );
}
