use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod csv;
pub mod html;
pub mod json;

/// Artifact formats the generator can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Html,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Paths written by one plan generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPaths {
    pub report: PathBuf,
    pub calendar: PathBuf,
    pub json: Option<PathBuf>,
}

/// `{name}_{date}[_{suffix}].{ext}` inside `directory`
pub fn output_path(directory: &Path, athlete: &str, date: NaiveDate, suffix: Option<&str>, format: ExportFormat) -> PathBuf {
    let stem: String = athlete
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    let file_name = match suffix {
        Some(suffix) => format!("{}_{}_{}.{}", stem, date.format("%Y-%m-%d"), suffix, format.extension()),
        None => format!("{}_{}.{}", stem, date.format("%Y-%m-%d"), format.extension()),
    };
    directory.join(file_name)
}
