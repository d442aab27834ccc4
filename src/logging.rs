use std::{env, sync::OnceLock};

use clap::ValueEnum;
use log::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[default]
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "ERROR")]
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

/// Whether `RUST_LOG` drove the installed backend.
static LOGGER: OnceLock<bool> = OnceLock::new();

/// Installs the stderr logger on first use. Later calls only move the level, so the
/// backend is never installed twice.
pub fn init_logging(level: LogLevel) {
    let env_driven = *LOGGER.get_or_init(|| {
        let env_driven = env::var("RUST_LOG").is_ok();
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if !env_driven {
            builder.filter_module("project_parser", LevelFilter::Trace);
        }
        let _ = builder
            .format_timestamp_millis()
            .target(env_logger::Target::Stderr)
            .try_init();
        env_driven
    });
    if !env_driven {
        log::set_max_level(level.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_to_filters() {
        assert_eq!(LevelFilter::from(LogLevel::Debug), LevelFilter::Debug);
        assert_eq!(LevelFilter::from(LogLevel::Warning), LevelFilter::Warn);
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn repeated_initialisation_is_harmless() {
        init_logging(LogLevel::Info);
        init_logging(LogLevel::Error);
        if env::var("RUST_LOG").is_err() {
            assert_eq!(log::max_level(), LevelFilter::Error);
        }
    }
}
