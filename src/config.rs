use std::{ops::RangeInclusive, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// Adjustable range of the target temperature slider, in degF.
pub const TARGET_TEMPERATURE_RANGE: RangeInclusive<u16> = 150..=600;

/// Adjustable range of the section time slider, in seconds.
pub const SECTION_TIME_RANGE: RangeInclusive<u32> = 0..=720;

/// Fan speed steps the appliance accepts.
pub const FAN_SPEED_RANGE: RangeInclusive<u8> = 1..=9;

pub const POLL_PERIOD_VAR: &str = "ROAST_POLL_PERIOD_MS";
pub const DISPLAY_PERIOD_VAR: &str = "ROAST_DISPLAY_PERIOD_MS";
pub const SIMULATION_PERIOD_VAR: &str = "ROAST_SIMULATION_PERIOD_MS";
pub const LOG_LEVEL_VAR: &str = "ROAST_LOG_LEVEL";

/// Runtime cadences of the control panel tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoastConfig {
    /// Sleep between two telemetry ticks, measured from the end of a tick.
    pub poll_period: Duration,

    /// How often the display task redraws from the latest snapshot.
    pub display_period: Duration,

    /// Step of the simulated roaster.
    pub simulation_period: Duration,

    pub log_level: LevelFilter,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive number of milliseconds, got '{value}'")]
    InvalidPeriod { var: &'static str, value: String },

    #[error("ROAST_LOG_LEVEL is not a log level, got '{0}'")]
    InvalidLogLevel(String),
}

impl Default for RoastConfig {
    fn default() -> Self {
        Self {
            poll_period: Duration::from_secs(1),
            display_period: Duration::from_secs(1),
            simulation_period: Duration::from_secs(1),
            log_level: LevelFilter::INFO,
        }
    }
}

impl RoastConfig {
    /// Defaults overridden by any `ROAST_*` environment variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(POLL_PERIOD_VAR) {
            config.poll_period = parse_period(POLL_PERIOD_VAR, &value)?;
        }
        if let Some(value) = lookup(DISPLAY_PERIOD_VAR) {
            config.display_period = parse_period(DISPLAY_PERIOD_VAR, &value)?;
        }
        if let Some(value) = lookup(SIMULATION_PERIOD_VAR) {
            config.simulation_period = parse_period(SIMULATION_PERIOD_VAR, &value)?;
        }
        if let Some(value) = lookup(LOG_LEVEL_VAR) {
            config.log_level = LevelFilter::from_str(value.trim())
                .map_err(|_| ConfigError::InvalidLogLevel(value.clone()))?;
        }

        Ok(config)
    }
}

fn parse_period(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(millis) if millis > 0 => Ok(Duration::from_millis(millis)),
        _ => Err(ConfigError::InvalidPeriod {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_to_one_second_cadence() {
        let config = RoastConfig::from_lookup(lookup_from(&[])).expect("Failed to build config");
        assert_eq!(config, RoastConfig::default());
        assert_eq!(config.poll_period, Duration::from_secs(1));
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = RoastConfig::from_lookup(lookup_from(&[
            (POLL_PERIOD_VAR, "250"),
            (DISPLAY_PERIOD_VAR, " 500 "),
            (LOG_LEVEL_VAR, "debug"),
        ]))
        .expect("Failed to build config");

        assert_eq!(config.poll_period, Duration::from_millis(250));
        assert_eq!(config.display_period, Duration::from_millis(500));
        assert_eq!(config.simulation_period, Duration::from_secs(1));
        assert_eq!(config.log_level, LevelFilter::DEBUG);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            RoastConfig::from_lookup(lookup_from(&[(POLL_PERIOD_VAR, "0")])),
            Err(ConfigError::InvalidPeriod {
                var: POLL_PERIOD_VAR,
                value: "0".into()
            })
        );
        assert!(RoastConfig::from_lookup(lookup_from(&[(SIMULATION_PERIOD_VAR, "fast")])).is_err());
        assert!(RoastConfig::from_lookup(lookup_from(&[(LOG_LEVEL_VAR, "loud")])).is_err());
    }
}
