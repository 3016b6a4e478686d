//! Plan generation
//!
//! One run takes the athlete, the test results and the split choice, and produces everything the
//! report and the calendar need. Inputs are validated before any estimate is computed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::calendar::{ensure_monday, schedule_events, CalendarEvent};
use crate::config::PlanConfig;
use crate::error::{PlanError, Result};
use crate::export::{self, ExportFormat, ExportPaths};
use crate::models::{AthleteProfile, ExerciseTest, TrainingCycle};
use crate::prescription::PrescriptionEngine;
use crate::report::{build_report, ReportDocument};
use crate::rpe::RpeTable;
use crate::scheduler::build_cycle;
use crate::strength::{BodyComposition, MaximaMap};
use crate::templates::DayCount;

/// Everything needed to generate one plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub profile: AthleteProfile,
    pub test: ExerciseTest,
    /// Training days per week, 2 to 4
    pub day_count: u8,
    pub weeks: u32,
    /// First training day, must be a Monday
    pub start: NaiveDate,
}

/// Result of one plan generation, read by the report and calendar writers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub profile: AthleteProfile,
    pub test: ExerciseTest,
    pub maxima: MaximaMap,
    pub body: BodyComposition,
    pub cycle: TrainingCycle,
    pub events: Vec<CalendarEvent>,
    /// Overload added every second week
    pub overload_step_kg: f64,
}

/// Primary lifts of `day_count` that have no tested maximum, in name order
pub fn untested_primaries(day_count: DayCount, maxima: &MaximaMap) -> Vec<&'static str> {
    day_count
        .template()
        .iter()
        .flat_map(|day| day.iter())
        .filter(|slot| !slot.accessory && maxima.get(slot.exercise).is_none())
        .map(|slot| slot.exercise)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Plan generator holding the startup resources
pub struct PlanGenerator<'a> {
    config: &'a PlanConfig,
    table: &'a RpeTable,
}

impl<'a> PlanGenerator<'a> {
    pub fn new(config: &'a PlanConfig, table: &'a RpeTable) -> Self {
        Self { config, table }
    }

    /// Estimate maxima, build the cycle and schedule it on the calendar
    pub fn generate(&self, request: &PlanRequest) -> Result<GeneratedPlan> {
        ensure_monday(request.start)?;
        let day_count = DayCount::try_from(request.day_count)?;
        if request.weeks == 0 {
            return Err(PlanError::invalid_input("weeks", "a plan needs at least one week"));
        }
        if request.test.is_empty() {
            return Err(PlanError::invalid_input("test", "at least one exercise test is required"));
        }

        let progression = &self.config.progression;
        progression
            .validate()
            .map_err(|e| PlanError::Configuration(e.to_string()))?;

        let maxima = MaximaMap::from_test(&request.test)?;

        let untested = untested_primaries(day_count, &maxima);
        if !untested.is_empty() && !progression.require_maxima {
            warn!(
                exercises = ?untested,
                "Primary lifts without a test are cued by RPE only"
            );
        }

        let engine = PrescriptionEngine::new(&maxima, self.table, progression);
        let cycle = build_cycle(&engine, day_count, request.weeks)?;
        let events = schedule_events(&cycle, request.start, &self.config.calendar)?;

        let body = BodyComposition::from_profile(
            &request.profile,
            self.config.body.activity_multiplier,
            self.config.body.protein_per_kg,
        );

        info!(
            athlete = %request.profile.name,
            split = %day_count,
            weeks = request.weeks,
            sessions = events.len(),
            "Generated training plan"
        );

        Ok(GeneratedPlan {
            profile: request.profile.clone(),
            test: request.test.clone(),
            maxima,
            body,
            cycle,
            events,
            overload_step_kg: progression.overload_step_kg,
        })
    }
}

impl GeneratedPlan {
    pub fn report(&self) -> ReportDocument {
        build_report(self)
    }

    /// Write the report, the calendar and optionally the JSON dump into the output directory
    pub fn save(
        &self,
        config: &PlanConfig,
        stylesheet: &str,
        generated_on: NaiveDate,
        with_json: bool,
    ) -> Result<ExportPaths> {
        let directory = config.output.directory.as_path();
        fs::create_dir_all(directory).map_err(|e| PlanError::ExportFailed {
            path: directory.to_path_buf(),
            reason: e.to_string(),
        })?;

        let name = &self.profile.name;
        let report = export::output_path(directory, name, generated_on, None, ExportFormat::Html);
        let calendar = export::output_path(directory, name, generated_on, Some("calendar"), ExportFormat::Csv);

        with_target(&report, || export::html::export_report(&self.report(), stylesheet, &report))?;
        with_target(&calendar, || {
            export::csv::export_calendar(&self.events, &config.calendar.date_format, &calendar)
        })?;

        let json = if with_json {
            let path = export::output_path(directory, name, generated_on, None, ExportFormat::Json);
            with_target(&path, || export::json::export_json(self, &path))?;
            Some(path)
        } else {
            None
        };

        info!(report = %report.display(), calendar = %calendar.display(), "Saved plan");

        Ok(ExportPaths {
            report,
            calendar,
            json,
        })
    }
}

/// Attach the target path to IO failures
fn with_target<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    write().map_err(|e| match e {
        PlanError::Io(io) => PlanError::ExportFailed {
            path: path.to_path_buf(),
            reason: io.to_string(),
        },
        other => other,
    })
}
