//! Load prescription engine
//!
//! Turns one template slot into a concrete prescription for a given week:
//!
//! - deload weeks halve the set count (ties to even);
//! - accessories are cued by RPE only;
//! - primary lifts get `increment * round(1RM * table% * safety / increment) + overload`,
//!   with the overload added after rounding.

use tracing::debug;

use crate::config::ProgressionSettings;
use crate::error::{PlanError, Result};
use crate::models::{Load, PrescriptionCell};
use crate::rpe::RpeTable;
use crate::strength::{round_to_increment, MaximaMap};
use crate::templates::ExerciseSlot;

pub struct PrescriptionEngine<'a> {
    maxima: &'a MaximaMap,
    table: &'a RpeTable,
    settings: &'a ProgressionSettings,
}

impl<'a> PrescriptionEngine<'a> {
    pub fn new(maxima: &'a MaximaMap, table: &'a RpeTable, settings: &'a ProgressionSettings) -> Self {
        Self {
            maxima,
            table,
            settings,
        }
    }

    pub fn settings(&self) -> &ProgressionSettings {
        self.settings
    }

    /// Whether `week` (1-based) is a reduced-volume week
    pub fn is_deload_week(&self, week: u32) -> bool {
        let interval = self.settings.deload_interval;
        (interval > 0 && week % interval == 0) || (self.settings.deload_first_week && week == 1)
    }

    /// Set count for a deload week
    pub fn deload_sets(base_sets: u32) -> u32 {
        (base_sets as f64 / 2.0).round_ties_even() as u32
    }

    /// Working weight for a primary lift, before overload
    pub fn working_weight(&self, one_rep_max: f64, fraction: f64) -> f64 {
        round_to_increment(
            one_rep_max * fraction * self.settings.safety_factor,
            self.settings.round_increment_kg,
        )
    }

    /// Prescribe `slot` for `week` with the week's cumulative overload
    pub fn prescribe(&self, slot: &ExerciseSlot, week: u32, cumulative_overload: f64) -> Result<PrescriptionCell> {
        let deload = self.is_deload_week(week);
        let sets = if deload {
            Self::deload_sets(slot.sets)
        } else {
            slot.sets
        };

        let load = if slot.accessory {
            Load::Rpe(slot.rpe)
        } else {
            let fraction = self.table.percentage(slot.rpe, slot.reps)?;
            match self.maxima.get(slot.exercise) {
                Some(max) => Load::Weight(self.working_weight(max, fraction) + cumulative_overload),
                None if self.settings.require_maxima => {
                    return Err(PlanError::MissingMaximum {
                        exercise: slot.exercise.to_string(),
                    })
                }
                None => {
                    debug!(exercise = slot.exercise, week, "No tested maximum, cueing by RPE");
                    Load::Rpe(slot.rpe)
                }
            }
        };

        Ok(PrescriptionCell {
            exercise: slot.exercise.to_string(),
            sets,
            reps: slot.reps,
            rpe: slot.rpe,
            load,
            accessory: slot.accessory,
            deload,
        })
    }
}
