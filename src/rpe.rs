//! RPE load table
//!
//! Maps a target RPE and a rep target to a fraction of 1RM. The table is a `|`-delimited file
//! whose first column holds the RPE and whose remaining headers are rep counts plus the
//! max-effort marker `X`. It is loaded once and only read afterwards.

use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::error::{PlanError, Result};
use crate::models::Reps;

/// Table shipped with the crate, used when no custom file is configured
pub const DEFAULT_RPE_TABLE: &str = include_str!("../data/rpe_table.csv");

const DELIMITER: u8 = b'|';

/// RPE values are keyed in tenths so they can be hashed exactly
fn rpe_key(rpe: f64) -> Option<u16> {
    if !rpe.is_finite() || rpe < 0.0 {
        return None;
    }
    let tenths = (rpe * 10.0).round();
    if (tenths / 10.0 - rpe).abs() > 1e-9 || tenths > u16::MAX as f64 {
        return None;
    }
    Some(tenths as u16)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RpeTable {
    rows: Vec<f64>,
    columns: Vec<Reps>,
    cells: HashMap<(u16, Reps), f64>,
}

impl RpeTable {
    /// The bundled table
    pub fn bundled() -> Result<Self> {
        Self::from_reader(DEFAULT_RPE_TABLE.as_bytes())
    }

    /// Load a table from a file, or the bundled one when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let file = std::fs::File::open(path)?;
                let table = Self::from_reader(file).map_err(|e| match e {
                    PlanError::MalformedTable { location, reason } => PlanError::MalformedTable {
                        location: format!("{}: {}", path.display(), location),
                        reason,
                    },
                    other => other,
                })?;
                info!(
                    path = %path.display(),
                    rows = table.rpe_values().len(),
                    columns = table.rep_columns().len(),
                    "Loaded RPE table"
                );
                Ok(table)
            }
            None => {
                let table = Self::bundled()?;
                info!(rows = table.rpe_values().len(), "Using bundled RPE table");
                Ok(table)
            }
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.len() < 2 {
            return Err(PlanError::MalformedTable {
                location: "header".to_string(),
                reason: "expected an RPE column followed by rep columns".to_string(),
            });
        }

        let columns = headers
            .iter()
            .skip(1)
            .map(|h| {
                h.parse::<Reps>().map_err(|_| PlanError::MalformedTable {
                    location: "header".to_string(),
                    reason: format!("'{}' is not a rep count or '{}'", h, Reps::MAX_EFFORT_MARKER),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut rows = Vec::new();
        let mut cells = HashMap::new();

        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let location = format!("row {}", line + 1);

            let raw_rpe = record.get(0).unwrap_or_default();
            let rpe = raw_rpe
                .parse::<f64>()
                .ok()
                .filter(|v| rpe_key(*v).is_some())
                .ok_or_else(|| PlanError::MalformedTable {
                    location: location.clone(),
                    reason: format!("invalid RPE '{}'", raw_rpe),
                })?;

            for (column, raw) in columns.iter().zip(record.iter().skip(1)) {
                if raw.is_empty() {
                    continue;
                }
                let fraction = raw.parse::<f64>().map_err(|_| PlanError::MalformedTable {
                    location: location.clone(),
                    reason: format!("invalid percentage '{}' in column {}", raw, column),
                })?;
                if let Some(key) = rpe_key(rpe) {
                    cells.insert((key, *column), fraction);
                }
            }
            rows.push(rpe);
        }

        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Fraction of 1RM for `rpe` at `reps`
    pub fn percentage(&self, rpe: f64, reps: Reps) -> Result<f64> {
        rpe_key(rpe)
            .and_then(|key| self.cells.get(&(key, reps)))
            .copied()
            .ok_or_else(|| PlanError::MissingRpeEntry {
                rpe,
                reps: reps.to_string(),
            })
    }

    /// RPE rows in file order
    pub fn rpe_values(&self) -> &[f64] {
        &self.rows
    }

    pub fn rep_columns(&self) -> &[Reps] {
        &self.columns
    }
}
