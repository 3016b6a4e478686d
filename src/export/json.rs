use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Export any serializable data structure to pretty-printed JSON
pub fn export_json<T, P>(data: &T, output_path: P) -> Result<()>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let json_data = serde_json::to_string_pretty(data)?;

    let mut file = std::fs::File::create(output_path)?;
    file.write_all(json_data.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Reps, TrainingCycle, WeekPlan};
    use crate::templates::DayCount;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_cycle_json() {
        let cycle = TrainingCycle {
            day_count: DayCount::Three,
            weeks: vec![WeekPlan {
                week: 1,
                cumulative_overload: 2.5,
                deload: false,
                days: Vec::new(),
            }],
        };

        let temp_file = NamedTempFile::new().unwrap();
        export_json(&cycle, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["day_count"], 3);
        assert_eq!(value["weeks"][0]["cumulative_overload"], 2.5);

        let back: TrainingCycle = serde_json::from_str(&content).unwrap();
        assert_eq!(back, cycle);
    }

    #[test]
    fn test_export_reps_marker() {
        let temp_file = NamedTempFile::new().unwrap();
        export_json(&vec![Reps::Count(10), Reps::MaxEffort], temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("\"X\""));
        assert!(content.contains("\"10\""));
    }
}
