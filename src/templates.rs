//! Weekly program templates
//!
//! The three splits are closed, declarative tables. Each day is an ordered list of
//! [`ExerciseSlot`]s and each split carries the rest gaps used to place sessions on the
//! calendar.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PlanError;
use crate::models::Reps;

/// Training days per week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DayCount {
    Two,
    Three,
    Four,
}

impl DayCount {
    pub const ALL: [DayCount; 3] = [DayCount::Two, DayCount::Three, DayCount::Four];

    pub fn days(self) -> usize {
        match self {
            DayCount::Two => 2,
            DayCount::Three => 3,
            DayCount::Four => 4,
        }
    }

    /// The day templates of this split, in session order
    pub fn template(self) -> &'static [&'static [ExerciseSlot]] {
        match self {
            DayCount::Two => &TWO_DAY,
            DayCount::Three => &THREE_DAY,
            DayCount::Four => &FOUR_DAY,
        }
    }

    /// Days to advance the calendar after each session of the week
    pub fn rest_gaps(self) -> &'static [i64] {
        match self {
            DayCount::Two => &[3, 4],
            DayCount::Three => &[2, 2, 3],
            DayCount::Four => &[1, 2, 1, 3],
        }
    }
}

impl TryFrom<u8> for DayCount {
    type Error = PlanError;

    fn try_from(days: u8) -> Result<Self, Self::Error> {
        match days {
            2 => Ok(DayCount::Two),
            3 => Ok(DayCount::Three),
            4 => Ok(DayCount::Four),
            other => Err(PlanError::UnsupportedDayCount(other)),
        }
    }
}

impl From<DayCount> for u8 {
    fn from(count: DayCount) -> Self {
        count.days() as u8
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-day", self.days())
    }
}

/// One line of a day template
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseSlot {
    pub exercise: &'static str,
    pub rpe: f64,
    pub sets: u32,
    pub reps: Reps,
    /// Accessories are cued by RPE only
    pub accessory: bool,
}

const fn primary(exercise: &'static str, rpe: f64, sets: u32, reps: u8) -> ExerciseSlot {
    ExerciseSlot {
        exercise,
        rpe,
        sets,
        reps: Reps::Count(reps),
        accessory: false,
    }
}

const fn accessory(exercise: &'static str, rpe: f64, sets: u32, reps: Reps) -> ExerciseSlot {
    ExerciseSlot {
        exercise,
        rpe,
        sets,
        reps,
        accessory: true,
    }
}

const FULL_BODY_A: [ExerciseSlot; 7] = [
    primary("benchpress", 7.0, 3, 10),
    accessory("chest press", 8.5, 2, Reps::Count(12)),
    primary("squat", 7.0, 4, 8),
    primary("lat pulldown", 7.0, 3, 5),
    accessory("leg curls", 7.0, 5, Reps::Count(10)),
    accessory("seated calve raises", 8.0, 5, Reps::Count(12)),
    accessory("back extension", 8.0, 5, Reps::Count(8)),
];

const FULL_BODY_B: [ExerciseSlot; 7] = [
    primary("squat", 7.0, 3, 8),
    accessory("legpress", 8.5, 2, Reps::Count(8)),
    primary("benchpress", 7.0, 3, 5),
    primary("lat pulldown", 8.0, 4, 10),
    accessory("seated calve raises", 5.0, 5, Reps::Count(12)),
    accessory("ab rollout", 8.0, 3, Reps::MaxEffort),
    accessory("upright row", 7.0, 5, Reps::Count(10)),
];

const FULL_BODY_C: [ExerciseSlot; 6] = [
    primary("lat pulldown", 8.5, 3, 10),
    accessory("seated row", 7.0, 2, Reps::Count(12)),
    primary("squat", 7.0, 3, 5),
    primary("benchpress", 8.0, 4, 10),
    accessory("leg curls", 8.0, 5, Reps::Count(8)),
    accessory("lateral raises", 8.0, 5, Reps::Count(12)),
];

static TWO_DAY: [&[ExerciseSlot]; 2] = [&FULL_BODY_A, &FULL_BODY_B];
static THREE_DAY: [&[ExerciseSlot]; 3] = [&FULL_BODY_A, &FULL_BODY_B, &FULL_BODY_C];
static FOUR_DAY: [&[ExerciseSlot]; 4] = [&FULL_BODY_C, &FULL_BODY_C, &FULL_BODY_C, &FULL_BODY_C];
