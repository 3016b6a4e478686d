use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Load progression rules
    pub progression: ProgressionSettings,

    /// Body-composition constants
    pub body: BodySettings,

    /// Calendar export settings
    pub calendar: CalendarSettings,

    /// Static resources loaded once at startup
    pub resources: ResourceSettings,

    /// Where generated artifacts go
    pub output: OutputSettings,

    pub logging: LogConfig,
}

/// Progression rules used by the prescription engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionSettings {
    /// Every Nth week is a deload week
    pub deload_interval: u32,

    /// Added to the cumulative overload every second week (kg)
    pub overload_step_kg: f64,

    /// Weights are rounded to multiples of this (kg)
    pub round_increment_kg: f64,

    /// Derate applied below the table percentage
    pub safety_factor: f64,

    /// Also deload the very first week
    pub deload_first_week: bool,

    /// Fail instead of cueing by RPE when a primary lift was not tested
    pub require_maxima: bool,
}

/// Constants for the overview figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySettings {
    /// BMR activity multiplier
    pub activity_multiplier: f64,

    /// Protein grams per kg body weight
    pub protein_per_kg: f64,
}

/// Calendar event defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    pub subject: String,
    pub start_time: String,
    pub end_time: String,
    /// chrono format string for start/end dates
    pub date_format: String,
    pub all_day: bool,
    pub private: bool,
}

/// Optional replacements for the bundled resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSettings {
    /// `|`-delimited RPE table
    pub rpe_table: Option<PathBuf>,

    /// CSS embedded into the HTML report
    pub stylesheet: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        ProgressionSettings {
            deload_interval: 7,
            overload_step_kg: 2.5,
            round_increment_kg: 2.5,
            safety_factor: 0.95,
            deload_first_week: false,
            require_maxima: false,
        }
    }
}

impl Default for BodySettings {
    fn default() -> Self {
        BodySettings {
            activity_multiplier: 1.5,
            protein_per_kg: 1.6,
        }
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        CalendarSettings {
            subject: "Strength Training".to_string(),
            start_time: "8:00 PM".to_string(),
            end_time: "8:30 PM".to_string(),
            date_format: "%d/%m/%y".to_string(),
            all_day: false,
            private: true,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            directory: PathBuf::from("plans"),
        }
    }
}

impl ProgressionSettings {
    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.round_increment_kg.is_finite() && self.round_increment_kg > 0.0) {
            anyhow::bail!("progression.round_increment_kg must be positive");
        }
        if !(self.safety_factor.is_finite() && self.safety_factor > 0.0) {
            anyhow::bail!("progression.safety_factor must be positive");
        }
        if !(self.overload_step_kg.is_finite() && self.overload_step_kg >= 0.0) {
            anyhow::bail!("progression.overload_step_kg must not be negative");
        }
        Ok(())
    }
}

/// Configuration management implementation
impl PlanConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: PlanConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;

        config.progression.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        fs::write(&path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).with_context(|| "Failed to serialize configuration to TOML")
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".liftplan")
            .join("config.toml")
    }

    /// Load the given file, or the default location with fallback to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        let config_path = Self::default_config_path();
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(&config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = PlanConfig::default();
        let toml_str = config.to_toml().unwrap();
        let deserialized: PlanConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PlanConfig = toml::from_str(
            r#"
            [progression]
            deload_interval = 4

            [calendar]
            subject = "Eurotraining"
            "#,
        )
        .unwrap();

        assert_eq!(config.progression.deload_interval, 4);
        assert_eq!(config.progression.overload_step_kg, 2.5);
        assert_eq!(config.calendar.subject, "Eurotraining");
        assert_eq!(config.calendar.start_time, "8:00 PM");
        assert_eq!(config.output.directory, PathBuf::from("plans"));
    }

    #[test]
    fn test_invalid_progression_rejected() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "[progression]\nround_increment_kg = 0.0\n").unwrap();

        assert!(PlanConfig::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut saved = PlanConfig::default();
        saved.progression.deload_first_week = true;
        saved.resources.rpe_table = Some(PathBuf::from("utils/rpe_table.csv"));

        saved.save_to_file(&config_path).unwrap();
        let loaded = PlanConfig::load_or_default(Some(&config_path)).unwrap();

        assert_eq!(loaded, saved);
    }
}
