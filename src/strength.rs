//! Strength and body-composition estimates
//!
//! Turns a submaximal test set into an estimated one-repetition maximum and derives the
//! athlete summary figures (BMI, BMR, protein target) shown on the report overview.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PlanError, Result};
use crate::models::{exercise_key, AthleteProfile, BmiCategory, ExerciseTest, Gender};

/// Maxima are reported in plate-friendly steps
pub const ONE_RM_INCREMENT_KG: f64 = 2.5;

/// Fixed derate applied to the blended estimate (2.275 %)
const ESTIMATE_DERATE: f64 = 0.97725;

/// Round `value` to the nearest multiple of `increment`, ties to even
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
    increment * (value / increment).round_ties_even()
}

/// Estimate a 1RM from `weight_kg` lifted for `reps` repetitions.
///
/// Averages an Epley, a Brzycki-style and an exponentially damped estimate, blends that
/// average 50/50 with Epley alone, derates it and rounds to the nearest 2.5 kg.
pub fn estimate_one_rep_max(weight_kg: f64, reps: u32) -> Result<f64> {
    if !(weight_kg.is_finite() && weight_kg > 0.0) {
        return Err(PlanError::invalid_input(
            "weight_kg",
            format!("test weight must be positive, got {}", weight_kg),
        ));
    }
    if reps == 0 {
        return Err(PlanError::invalid_input("reps", "test reps must be at least 1"));
    }

    let r = reps as f64;
    let brzycki_denominator = 101.3 - 2.6713 * r;
    if brzycki_denominator <= 0.0 {
        return Err(PlanError::invalid_input(
            "reps",
            format!("{} reps is outside the range the estimate supports", reps),
        ));
    }

    let epley = weight_kg * (1.0 + r / 30.0);
    let brzycki = 100.0 * weight_kg / brzycki_denominator;
    let damped = weight_kg * r.powf(0.10);
    let average = (epley + brzycki + damped) / 3.0;

    let estimate = (epley + average) / 2.0 * ESTIMATE_DERATE;
    Ok(round_to_increment(estimate, ONE_RM_INCREMENT_KG))
}

/// Estimated 1RM per tested exercise, in test order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaximaMap {
    entries: Vec<(String, f64)>,
}

impl MaximaMap {
    /// Estimate a maximum for every tested exercise
    pub fn from_test(test: &ExerciseTest) -> Result<Self> {
        let entries = test
            .iter()
            .map(|entry| {
                let max = estimate_one_rep_max(entry.weight_kg, entry.reps).map_err(|e| match e {
                    PlanError::InvalidInput { field, reason } => PlanError::InvalidInput {
                        field: format!("{} {}", entry.exercise, field),
                        reason,
                    },
                    other => other,
                })?;
                debug!(
                    exercise = %entry.exercise,
                    weight_kg = entry.weight_kg,
                    reps = entry.reps,
                    one_rep_max = max,
                    "Estimated 1RM"
                );
                Ok((entry.exercise.clone(), max))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    pub fn get(&self, exercise: &str) -> Option<f64> {
        let key = exercise_key(exercise);
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, max)| *max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, max)| (name.as_str(), *max))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum relative to body weight, rounded to 2 decimals
    pub fn bodyweight_ratio(&self, exercise: &str, body_weight_kg: f64) -> Result<Option<f64>> {
        if !(body_weight_kg.is_finite() && body_weight_kg > 0.0) {
            return Err(PlanError::invalid_input(
                "body_weight_kg",
                format!("must be a positive number, got {}", body_weight_kg),
            ));
        }
        Ok(self
            .get(exercise)
            .map(|max| (max / body_weight_kg * 100.0).round_ties_even() / 100.0))
    }
}

/// Summary figures derived from the athlete profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyComposition {
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    /// Daily energy need in kcal
    pub bmr_kcal: i64,
    /// Daily protein target in grams
    pub protein_g: i64,
}

impl BodyComposition {
    pub fn from_profile(profile: &AthleteProfile, activity_multiplier: f64, protein_per_kg: f64) -> Self {
        let bmi = body_mass_index(profile.weight_kg, profile.height_cm);
        Self {
            bmi,
            bmi_category: BmiCategory::from_bmi(bmi),
            bmr_kcal: basal_metabolic_rate(profile, activity_multiplier),
            protein_g: (profile.weight_kg * protein_per_kg).round_ties_even() as i64,
        }
    }
}

/// BMI rounded to 2 decimals
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    (weight_kg / (height_m * height_m) * 100.0).round_ties_even() / 100.0
}

/// Harris-Benedict style BMR scaled by an activity multiplier
pub fn basal_metabolic_rate(profile: &AthleteProfile, activity_multiplier: f64) -> i64 {
    let w = profile.weight_kg;
    let h = profile.height_cm;
    let a = profile.age_years as f64;

    let base = match profile.gender {
        Gender::Male => 66.0 + 6.2 * w + 12.7 * h - 6.76 * a,
        Gender::Female => 655.0 + 4.35 * w + 4.7 * h - 4.7 * a,
    };
    (base * activity_multiplier).round_ties_even() as i64
}
