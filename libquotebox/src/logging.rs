//! Logging setup shared by the quote-* binaries
//!
//! All output goes to stderr so stdout stays clean for quotes and JSON.
//!
//! ```no_run
//! use libquotebox::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::new(LogFormat::Json, "debug").init();
//!
//! // Or honour QUOTEBOX_LOG_FORMAT / QUOTEBOX_LOG_LEVEL
//! libquotebox::logging::LoggingConfig::from_env(false).init();
//! ```

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain text, no target
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Multi-line with colors
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: impl Into<String>) -> Self {
        Self {
            format,
            level: level.into(),
        }
    }

    /// Read `QUOTEBOX_LOG_FORMAT` and `QUOTEBOX_LOG_LEVEL`.
    ///
    /// `verbose` forces the level to debug. Without either, binaries only
    /// report warnings so their stdout output stays readable.
    pub fn from_env(verbose: bool) -> Self {
        let format = std::env::var("QUOTEBOX_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        let level = if verbose {
            "debug".to_string()
        } else {
            std::env::var("QUOTEBOX_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string())
        };

        Self::new(format, level)
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber.
    ///
    /// A second call is ignored, which keeps tests that share a process from
    /// panicking.
    pub fn init(&self) {
        let filter = self.filter();

        let result = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .flatten_event(true)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_file(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init(),
        };

        if let Err(e) = result {
            tracing::debug!("Logging already initialized: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn test_log_format_from_str_invalid() {
        let result = "xml".parse::<LogFormat>();
        assert!(result.unwrap_err().contains("Invalid log format: 'xml'"));
    }

    #[test]
    fn test_log_format_display_round_trip() {
        for format in [LogFormat::Text, LogFormat::Json, LogFormat::Pretty] {
            assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var("QUOTEBOX_LOG_FORMAT");
        std::env::remove_var("QUOTEBOX_LOG_LEVEL");

        let config = LoggingConfig::from_env(false);
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.level, "warn");
    }

    #[test]
    #[serial]
    fn test_from_env_reads_variables() {
        std::env::set_var("QUOTEBOX_LOG_FORMAT", "json");
        std::env::set_var("QUOTEBOX_LOG_LEVEL", "libquotebox=trace");

        let config = LoggingConfig::from_env(false);
        std::env::remove_var("QUOTEBOX_LOG_FORMAT");
        std::env::remove_var("QUOTEBOX_LOG_LEVEL");

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "libquotebox=trace");
    }

    #[test]
    #[serial]
    fn test_verbose_overrides_level() {
        std::env::set_var("QUOTEBOX_LOG_LEVEL", "error");
        let config = LoggingConfig::from_env(true);
        std::env::remove_var("QUOTEBOX_LOG_LEVEL");

        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        let config = LoggingConfig::new(LogFormat::Text, "warn");
        config.init();
        config.init();
    }
}
