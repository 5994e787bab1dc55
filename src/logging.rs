use chrono::Local;
use log::LevelFilter;
use std::io::Write;

/// Installs the global logger. The level comes from `level`, then `RUST_LOG`, then `info`.
pub fn init_logging(level: Option<&str>) {
    let log_level = resolve_level(level, std::env::var("RUST_LOG").ok().as_deref());
    env_logger::Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
    log::info!("Logger initialized (level: {})", log_level);
}

fn resolve_level(level: Option<&str>, env: Option<&str>) -> LevelFilter {
    level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| env.and_then(|v| v.parse().ok()))
        .unwrap_or(LevelFilter::Info)
}
