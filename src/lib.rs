pub mod assembler;
pub mod clock;
pub mod config;
pub mod date_gen;
pub mod error;
pub mod forcing;
pub mod logging;
pub mod psychro;
pub mod readers;
pub mod solar;
pub mod streams;
pub mod units;
pub mod weather;

pub use assembler::ForcingAssembler;
pub use config::Config;
pub use error::ForcingError;
pub use forcing::{DailyForcing, HourlyForcing, HourlySeries};
