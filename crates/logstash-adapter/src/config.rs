// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;

use crate::adapter::{ADAPTER_NAME, MAX_LINES_OPTION};
use crate::errors::ConfigError;
use crate::route::Route;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration for the forwarder process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwarderConfig {
    /// Logstash endpoint, `host:port`
    pub address: String,
    /// Adapter name with optional transport suffix, e.g. `logstash+tcp`
    pub adapter: String,
    /// Per-container line cap, passed to the adapter as a route option
    pub max_lines: Option<String>,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
    /// Capacity of the channel between the record reader and the adapter
    pub channel_capacity: usize,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            adapter: ADAPTER_NAME.to_string(),
            max_lines: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ForwarderConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let address = env::var("LOGSTASH_ADDRESS").unwrap_or_default();
        let adapter = env::var("LOGSTASH_ADAPTER")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| ADAPTER_NAME.to_string());
        let max_lines = env::var("LOGSTASH_MAX_LINES").ok();
        let log_level = env::var("LOGSTASH_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        let channel_capacity = match env::var("LOGSTASH_CHANNEL_CAPACITY") {
            Ok(val) => val.parse::<usize>().map_err(|_| {
                ConfigError::Invalid(format!(
                    "LOGSTASH_CHANNEL_CAPACITY must be a positive integer, got '{val}'"
                ))
            })?,
            Err(_) => DEFAULT_CHANNEL_CAPACITY,
        };

        let config = Self {
            address,
            adapter,
            max_lines,
            log_level,
            channel_capacity,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "LOGSTASH_ADDRESS must be set".to_string(),
            ));
        }

        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "LOGSTASH_CHANNEL_CAPACITY must be greater than 0".to_string(),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    /// The route the adapter is built from.
    #[must_use]
    pub fn route(&self) -> Route {
        let route = Route::new(self.adapter.clone(), self.address.clone());
        match &self.max_lines {
            Some(max_lines) => route.with_option(MAX_LINES_OPTION, max_lines.clone()),
            None => route,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn valid() -> ForwarderConfig {
        ForwarderConfig {
            address: "127.0.0.1:5000".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_missing_address() {
        assert!(ForwarderConfig::default().validate().is_err());

        let config = ForwarderConfig {
            address: "  ".to_string(),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_channel_capacity() {
        let config = ForwarderConfig {
            channel_capacity: 0,
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_log_levels() {
        for level in VALID_LOG_LEVELS {
            let config = ForwarderConfig {
                log_level: level.to_string(),
                ..valid()
            };
            assert!(
                config.validate().is_ok(),
                "Log level '{}' should be valid",
                level
            );
        }

        let config = ForwarderConfig {
            log_level: "verbose".to_string(),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_route() {
        let route = valid().route();
        assert_eq!(route.adapter, "logstash");
        assert_eq!(route.address, "127.0.0.1:5000");
        assert!(route.options.is_empty());

        let config = ForwarderConfig {
            adapter: "logstash+tcp".to_string(),
            max_lines: Some("200".to_string()),
            ..valid()
        };
        let route = config.route();
        assert_eq!(route.adapter_transport("udp"), "tcp");
        assert_eq!(
            route.options.get(MAX_LINES_OPTION).map(String::as_str),
            Some("200")
        );
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var("LOGSTASH_ADDRESS", "logstash.internal:5000");
        env::set_var("LOGSTASH_ADAPTER", "logstash+tcp");
        env::set_var("LOGSTASH_LOG_LEVEL", "DEBUG");
        env::remove_var("LOGSTASH_MAX_LINES");
        env::remove_var("LOGSTASH_CHANNEL_CAPACITY");

        let config = ForwarderConfig::from_env();

        env::remove_var("LOGSTASH_ADDRESS");
        env::remove_var("LOGSTASH_ADAPTER");
        env::remove_var("LOGSTASH_LOG_LEVEL");

        let config = config.expect("config should load");
        assert_eq!(config.address, "logstash.internal:5000");
        assert_eq!(config.adapter, "logstash+tcp");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_lines, None);
        assert_eq!(config.channel_capacity, 1024);
    }

    #[test]
    #[serial]
    fn test_from_env_bad_capacity() {
        env::set_var("LOGSTASH_ADDRESS", "logstash.internal:5000");
        env::set_var("LOGSTASH_CHANNEL_CAPACITY", "lots");

        let result = ForwarderConfig::from_env();

        env::remove_var("LOGSTASH_ADDRESS");
        env::remove_var("LOGSTASH_CHANNEL_CAPACITY");

        assert!(result.is_err());
    }
}
