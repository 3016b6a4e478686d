//! Structured logging for liftplan
//!
//! Console output in pretty, JSON or compact form, plus an optional JSON file log with daily
//! rotation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: LogLevel,

    /// Output format (pretty, json, compact)
    pub format: LogFormat,

    /// Log file path (None for console only)
    pub file_path: Option<PathBuf>,

    /// Rotate the log file daily
    pub rotation: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Pretty,
            file_path: None,
            rotation: true,
        }
    }
}

/// Log level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_tracing_level(&self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }

    pub fn to_filter(&self) -> String {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
        .to_string()
    }

    /// Level for a `-v` count, never quieter than `self`
    pub fn raised_by(self, verbosity: u8) -> Self {
        let requested = match verbosity {
            0 => return self,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };
        if requested.to_tracing_level() > self.to_tracing_level() {
            requested
        } else {
            self
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with colors
    Pretty,
    /// JSON lines
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Writer for the JSON log file; daily rotation keeps the file name as prefix
pub fn log_file_writer(path: &Path, rotation: bool) -> std::io::Result<BoxMakeWriter> {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(directory)?;

    if rotation {
        let prefix = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("liftplan.log");
        Ok(BoxMakeWriter::new(tracing_appender::rolling::daily(directory, prefix)))
    } else {
        let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        Ok(BoxMakeWriter::new(Mutex::new(file)))
    }
}

/// Initialize the logging system
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("liftplan={}", config.level.to_filter()))
    });

    // stdout is reserved for command output
    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let console_layer = match config.format {
        LogFormat::Pretty => console.boxed(),
        LogFormat::Json => console.json().boxed(),
        LogFormat::Compact => console.compact().boxed(),
    };

    let file_layer = match &config.file_path {
        Some(path) => Some(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(log_file_writer(path, config.rotation)?),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::debug!(
        level = ?config.level,
        format = ?config.format,
        file = ?config.file_path,
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn test_verbosity_raises_level() {
        assert_eq!(LogLevel::Warn.raised_by(0), LogLevel::Warn);
        assert_eq!(LogLevel::Warn.raised_by(1), LogLevel::Info);
        assert_eq!(LogLevel::Warn.raised_by(5), LogLevel::Trace);
        assert_eq!(LogLevel::Debug.raised_by(1), LogLevel::Debug);
    }

    #[test]
    fn test_plain_log_file_appends() {
        use std::io::Write;
        use tracing_subscriber::fmt::MakeWriter;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("liftplan.log");

        let writer = log_file_writer(&path, false).unwrap();
        writer.make_writer().write_all(b"first\n").unwrap();
        let writer = log_file_writer(&path, false).unwrap();
        writer.make_writer().write_all(b"second\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_rotating_log_file_uses_name_as_prefix() {
        use std::io::Write;
        use tracing_subscriber::fmt::MakeWriter;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("liftplan.log");

        let writer = log_file_writer(&path, true).unwrap();
        writer.make_writer().write_all(b"rotated\n").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("liftplan.log."));
    }
}
