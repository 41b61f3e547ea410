use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StationConfig {
    /// `-` for stdin, `tcp://host:port`, or a device / capture file path.
    #[serde(default = "defaults::source")]
    pub source: String,
    #[serde(default = "defaults::listen_addr")]
    pub listen_addr: String,
    #[serde(default = "defaults::tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Per-subscriber outbound queue depth, in ticks.
    #[serde(default = "defaults::queue_depth")]
    pub queue_depth: usize,
    #[serde(default = "defaults::shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
    #[serde(default = "defaults::read_chunk_bytes")]
    pub read_chunk_bytes: usize,
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

mod defaults {
    pub fn source() -> String {
        "-".into()
    }

    pub fn listen_addr() -> String {
        "0.0.0.0:8080".into()
    }

    pub fn tick_interval_ms() -> u64 {
        50 // 20 Hz
    }

    pub fn queue_depth() -> usize {
        16
    }

    pub fn shutdown_grace_ms() -> u64 {
        5_000
    }

    pub fn read_chunk_bytes() -> usize {
        256
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            source: defaults::source(),
            listen_addr: defaults::listen_addr(),
            tick_interval_ms: defaults::tick_interval_ms(),
            queue_depth: defaults::queue_depth(),
            shutdown_grace_ms: defaults::shutdown_grace_ms(),
            read_chunk_bytes: defaults::read_chunk_bytes(),
            log_level: defaults::log_level(),
        }
    }
}

impl StationConfig {
    pub fn load(path: impl AsRef<Path> + ToString) -> Result<Self, ConfigError> {
        let toml_to_str = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&toml_to_str)
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: StationConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be > 0"));
        }
        if self.queue_depth == 0 {
            return Err(ConfigError::Invalid("queue_depth must be > 0"));
        }
        if self.read_chunk_bytes == 0 {
            return Err(ConfigError::Invalid("read_chunk_bytes must be > 0"));
        }
        if self.source.trim().is_empty() {
            return Err(ConfigError::Invalid("source must not be empty"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let c = StationConfig::from_toml("").unwrap();
        assert_eq!(c, StationConfig::default());
        assert_eq!(c.tick_interval(), Duration::from_millis(50));
        assert_eq!(c.queue_depth, 16);
        assert_eq!(c.shutdown_grace(), Duration::from_secs(5));
        assert_eq!(c.source, "-");
    }

    #[test]
    fn overrides_are_applied() {
        let c = StationConfig::from_toml(
            r#"
            source = "tcp://127.0.0.1:5760"
            listen_addr = "127.0.0.1:9000"
            tick_interval_ms = 100
            queue_depth = 4
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(c.source, "tcp://127.0.0.1:5760");
        assert_eq!(c.listen_addr, "127.0.0.1:9000");
        assert_eq!(c.tick_interval_ms, 100);
        assert_eq!(c.queue_depth, 4);
        assert_eq!(c.read_chunk_bytes, 256);
        assert_eq!(c.log_level, "debug");
    }

    #[test]
    fn zero_values_are_rejected() {
        for bad in [
            "tick_interval_ms = 0",
            "queue_depth = 0",
            "read_chunk_bytes = 0",
            "source = \"\"",
        ] {
            assert!(
                matches!(StationConfig::from_toml(bad), Err(ConfigError::Invalid(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn unknown_keys_fail_to_parse() {
        assert!(matches!(
            StationConfig::from_toml("baud = 115200"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = StationConfig::load("/nonexistent/station.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/station.toml"));
    }
}
