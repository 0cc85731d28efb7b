use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{self, ConfigBuilder};

/// Dependency modules whose records are dropped unless the level is Trace.
const QUIET_MODULES: &[&str] = &[
    "sqlx", "sea_orm", "tower", "tracing", "hyper", "axum", "reqwest", "rustls",
];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger at the configured level.
    ///
    /// Dependency chatter (database driver, HTTP stack) is only shown at Trace.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        let level = config.log_level_filter;
        simplelog::TermLogger::init(
            level,
            Self::build_log_config(level),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
    }

    fn build_log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if level != LevelFilter::Trace {
            for module in QUIET_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_modules_cover_the_http_and_database_stack() {
        for module in ["sea_orm", "sqlx", "hyper", "reqwest", "axum"] {
            assert!(QUIET_MODULES.contains(&module), "{module} should be quiet");
        }
    }

    #[test]
    fn log_config_builds_for_every_level() {
        for level in [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Info,
            LevelFilter::Trace,
        ] {
            let _config = Logger::build_log_config(level);
        }
    }
}
