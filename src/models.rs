use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PlanError, Result};
use crate::templates::DayCount;

/// Athlete gender, selects the BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            _ => Err(PlanError::invalid_input(
                "gender",
                format!("unknown value '{}' (expected m/male or f/female)", s),
            )),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Body metrics of the athlete the plan is generated for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Display name, also used for output file names
    pub name: String,

    pub gender: Gender,

    /// Height in centimeters
    pub height_cm: f64,

    /// Body weight in kilograms
    pub weight_kg: f64,

    /// Age in years
    pub age_years: u32,
}

impl AthleteProfile {
    /// Create a validated profile
    pub fn new(
        name: impl Into<String>,
        gender: Gender,
        height_cm: f64,
        weight_kg: f64,
        age_years: u32,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlanError::invalid_input("name", "must not be empty"));
        }
        if !(height_cm.is_finite() && height_cm > 0.0) {
            return Err(PlanError::invalid_input("height_cm", "must be a positive number"));
        }
        if !(weight_kg.is_finite() && weight_kg > 0.0) {
            return Err(PlanError::invalid_input("weight_kg", "must be a positive number"));
        }

        Ok(Self {
            name,
            gender,
            height_cm,
            weight_kg,
            age_years,
        })
    }
}

/// BMI banding, upper bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Ideal,
    Overweight,
    Obese,
    ExtremelyObese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.0 {
            BmiCategory::Underweight
        } else if bmi <= 24.0 {
            BmiCategory::Ideal
        } else if bmi <= 29.0 {
            BmiCategory::Overweight
        } else if bmi <= 39.0 {
            BmiCategory::Obese
        } else {
            BmiCategory::ExtremelyObese
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Ideal => "Ideal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
            BmiCategory::ExtremelyObese => "Extremely Obese",
        };
        f.write_str(label)
    }
}

/// One submaximal test set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestEntry {
    pub exercise: String,
    pub weight_kg: f64,
    pub reps: u32,
}

impl FromStr for TestEntry {
    type Err = PlanError;

    /// Parses `name=WEIGHTxREPS`, e.g. `benchpress=70x8`
    fn from_str(s: &str) -> Result<Self> {
        let (name, result) = s
            .split_once('=')
            .ok_or_else(|| PlanError::invalid_input("test", format!("expected NAME=WEIGHTxREPS, got '{}'", s)))?;
        let (weight, reps) = result
            .to_lowercase()
            .split_once('x')
            .map(|(w, r)| (w.trim().to_string(), r.trim().to_string()))
            .ok_or_else(|| PlanError::invalid_input("test", format!("expected WEIGHTxREPS, got '{}'", result)))?;

        let exercise = exercise_key(name);
        if exercise.is_empty() {
            return Err(PlanError::invalid_input("test", "exercise name must not be empty"));
        }
        let weight_kg = weight
            .parse::<f64>()
            .map_err(|_| PlanError::invalid_input("test", format!("invalid weight '{}'", weight)))?;
        let reps = reps
            .parse::<u32>()
            .map_err(|_| PlanError::invalid_input("test", format!("invalid reps '{}'", reps)))?;

        Ok(TestEntry {
            exercise,
            weight_kg,
            reps,
        })
    }
}

/// Exercise names are matched trimmed and lowercase, the way the templates spell them
pub fn exercise_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Submaximal test results keyed by exercise, in the order they were entered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TestEntry>", into = "Vec<TestEntry>")]
pub struct ExerciseTest {
    entries: Vec<TestEntry>,
}

impl ExerciseTest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a test, replacing an earlier result for the same exercise
    pub fn insert(&mut self, exercise: impl AsRef<str>, weight_kg: f64, reps: u32) {
        let exercise = exercise_key(exercise.as_ref());
        match self.entries.iter_mut().find(|e| e.exercise == exercise) {
            Some(existing) => {
                existing.weight_kg = weight_kg;
                existing.reps = reps;
            }
            None => self.entries.push(TestEntry {
                exercise,
                weight_kg,
                reps,
            }),
        }
    }

    pub fn with(mut self, exercise: impl AsRef<str>, weight_kg: f64, reps: u32) -> Self {
        self.insert(exercise, weight_kg, reps);
        self
    }

    pub fn get(&self, exercise: &str) -> Option<&TestEntry> {
        let key = exercise_key(exercise);
        self.entries.iter().find(|e| e.exercise == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TestEntry> for ExerciseTest {
    fn from_iter<I: IntoIterator<Item = TestEntry>>(iter: I) -> Self {
        let mut test = ExerciseTest::new();
        for entry in iter {
            test.insert(entry.exercise, entry.weight_kg, entry.reps);
        }
        test
    }
}

impl From<Vec<TestEntry>> for ExerciseTest {
    fn from(entries: Vec<TestEntry>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<ExerciseTest> for Vec<TestEntry> {
    fn from(test: ExerciseTest) -> Self {
        test.entries
    }
}

/// Rep target of a set: a fixed count or an AMRAP set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Reps {
    Count(u8),
    MaxEffort,
}

impl Reps {
    /// Marker used for max-effort sets in tables and text
    pub const MAX_EFFORT_MARKER: &'static str = "X";
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reps::Count(n) => write!(f, "{}", n),
            Reps::MaxEffort => f.write_str(Self::MAX_EFFORT_MARKER),
        }
    }
}

impl FromStr for Reps {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Self::MAX_EFFORT_MARKER) {
            return Ok(Reps::MaxEffort);
        }
        match s.parse::<u8>() {
            Ok(n) if n > 0 => Ok(Reps::Count(n)),
            _ => Err(PlanError::invalid_input(
                "reps",
                format!("expected a positive count or '{}', got '{}'", Self::MAX_EFFORT_MARKER, s),
            )),
        }
    }
}

impl TryFrom<String> for Reps {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Reps> for String {
    fn from(reps: Reps) -> Self {
        reps.to_string()
    }
}

/// What the athlete is told to load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Load {
    /// Absolute target weight in kilograms
    Weight(f64),
    /// Effort cue only
    Rpe(f64),
}

/// A single exercise prescription within a training day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionCell {
    pub exercise: String,
    pub sets: u32,
    pub reps: Reps,
    pub rpe: f64,
    pub load: Load,
    pub accessory: bool,
    /// Sets were reduced for a deload week
    pub deload: bool,
}

impl PrescriptionCell {
    pub fn target_weight(&self) -> Option<f64> {
        match self.load {
            Load::Weight(kg) => Some(kg),
            Load::Rpe(_) => None,
        }
    }
}

/// Ordered prescriptions for one training day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 0-based position within the split
    pub index: usize,
    pub cells: Vec<PrescriptionCell>,
}

/// All training days of one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    /// 1-based week number
    pub week: u32,
    /// Overload added to every weighted prescription this week (kg)
    pub cumulative_overload: f64,
    pub deload: bool,
    pub days: Vec<DayPlan>,
}

/// The full periodized cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingCycle {
    pub day_count: DayCount,
    pub weeks: Vec<WeekPlan>,
}

impl TrainingCycle {
    pub fn session_count(&self) -> usize {
        self.weeks.iter().map(|w| w.days.len()).sum()
    }
}
