//! Logging configuration.
//!
//! Sources, lowest precedence first:
//! - `RUST_LOG` filter directives
//! - `TI_LOG` level and `TI_LOG_FORMAT`
//! - The integration's `--verbose` flag

use serde::{Deserialize, Serialize};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" | "structured" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    /// Standard operational info (default).
    #[default]
    Info,
    Warn,
    Error,
    /// Completely silent.
    Off,
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

/// Environment variable holding a plain level (`debug`, `warn`, ...).
pub const LEVEL_ENV: &str = "TI_LOG";
/// Environment variable holding `tracing` filter directives.
pub const FILTER_ENV: &str = "RUST_LOG";
/// Environment variable selecting `human` or `jsonl` output.
pub const FORMAT_ENV: &str = "TI_LOG_FORMAT";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Level applied to every target when `directives` is unset.
    pub level: LogLevel,
    /// Raw `RUST_LOG`-style directives, e.g. `ti_cache=debug,info`.
    pub directives: Option<String>,
    /// Whether to include timestamps in human output.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Info,
            directives: None,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Resolve from the process environment, then apply CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::resolve(|name| std::env::var(name).ok(), cli_level, cli_format)
    }

    /// Precedence, lowest first: defaults, `RUST_LOG`, `TI_LOG`, CLI.
    ///
    /// `RUST_LOG` is kept verbatim as filter directives; its bare global
    /// level (a directive without `=`) also becomes `level`. `TI_LOG` and a
    /// CLI level drop any directives so the chosen level applies everywhere.
    /// Unparseable values are ignored.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        if let Some(directives) = lookup(FILTER_ENV).filter(|d| !d.trim().is_empty()) {
            if let Some(level) = global_level(&directives) {
                config.level = level;
            }
            config.directives = Some(directives);
        }

        if let Some(level) = lookup(LEVEL_ENV).and_then(|v| v.parse::<LogLevel>().ok()) {
            config = config.with_level(level);
        }

        if let Some(format) = lookup(FORMAT_ENV).and_then(|v| v.parse::<LogFormat>().ok()) {
            config.format = format;
        }

        if let Some(level) = cli_level {
            config = config.with_level(level);
        }
        if let Some(format) = cli_format {
            config.format = format;
        }

        config
    }

    /// Filter string handed to `EnvFilter`.
    pub fn filter(&self) -> String {
        match &self.directives {
            Some(directives) => directives.clone(),
            None => self.level.to_string(),
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self.directives = None;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }
}

/// Last directive without a target, e.g. `warn` in `ti_cache=debug,warn`.
fn global_level(directives: &str) -> Option<LogLevel> {
    directives
        .split(',')
        .map(str::trim)
        .filter(|d| !d.contains('='))
        .filter_map(|d| d.parse::<LogLevel>().ok())
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert_eq!("jsonl".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("quiet".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Off.to_string(), "off");
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::default()
            .with_format(LogFormat::Jsonl)
            .with_level(LogLevel::Warn)
            .with_timestamps(false);

        assert_eq!(config.format, LogFormat::Jsonl);
        assert_eq!(config.level, LogLevel::Warn);
        assert!(!config.timestamps);
    }

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_resolve_defaults_without_env() {
        assert_eq!(LogConfig::resolve(env(&[]), None, None), LogConfig::default());
    }

    #[test]
    fn test_ti_log_beats_rust_log() {
        let config = LogConfig::resolve(
            env(&[("RUST_LOG", "ti_cache=trace,warn"), ("TI_LOG", "error")]),
            None,
            None,
        );
        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.directives, None);
        assert_eq!(config.filter(), "error");
    }

    #[test]
    fn test_rust_log_kept_as_directives() {
        let config = LogConfig::resolve(env(&[("RUST_LOG", "ti_cache=debug,warn")]), None, None);
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.filter(), "ti_cache=debug,warn");
    }

    #[test]
    fn test_verbose_overrides_environment() {
        let config = LogConfig::resolve(
            env(&[("TI_LOG", "error"), ("RUST_LOG", "off"), ("TI_LOG_FORMAT", "json")]),
            Some(LogLevel::Debug),
            None,
        );
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.filter(), "debug");
        assert_eq!(config.format, LogFormat::Jsonl);
    }

    #[test]
    fn test_cli_format_overrides_environment() {
        let config = LogConfig::resolve(
            env(&[("TI_LOG_FORMAT", "jsonl")]),
            None,
            Some(LogFormat::Human),
        );
        assert_eq!(config.format, LogFormat::Human);
    }

    #[test]
    fn test_unparseable_values_ignored() {
        let config = LogConfig::resolve(
            env(&[("TI_LOG", "loud"), ("TI_LOG_FORMAT", "xml")]),
            None,
            None,
        );
        assert_eq!(config, LogConfig::default());
    }
}
