use std::str::FromStr;
use std::time::SystemTime;

use log::LevelFilter;

use crate::config::LoggingConfig;

/// sets up the global logger to write to stdout. Calling this more than once keeps the first logger
pub fn init_logging(config: &LoggingConfig) {
    let level = LevelFilter::from_str(&config.level).unwrap_or_else(|_| {
        eprintln!(
            "Unknown log level {}, defaulting to info",
            config.level.as_str()
        );
        LevelFilter::Info
    });
    let res = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // rocket's own request logging is very chatty at info
        .level_for("rocket", LevelFilter::Warn)
        .level_for("_", LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply();
    if let Err(e) = res {
        log::warn!("Logger was already initialized: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::init_logging;
    use crate::config::LoggingConfig;

    #[test]
    fn init_logging_twice_does_not_panic() {
        let config = LoggingConfig {
            level: "not_a_level".to_string(),
        };
        init_logging(&config);
        init_logging(&config);
        log::info!("still logging");
    }
}
