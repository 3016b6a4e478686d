//! Report document model
//!
//! The report is assembled as plain data: headings, tables and link lists whose cells are runs
//! of [`Segment`]s. Renderers (HTML, calendar descriptions) decide how emphasis and line breaks
//! are written, so no markup ever travels inside strings.

use serde::{Deserialize, Serialize};

use crate::models::{DayPlan, Load, PrescriptionCell, WeekPlan};
use crate::plan::GeneratedPlan;

/// Piece of a rich text run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Segment {
    Text(String),
    Emphasis(String),
    LineBreak,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    pub segments: Vec<Segment>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new().text(text)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Text(text.into()));
        self
    }

    pub fn emphasis(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Emphasis(text.into()));
        self
    }

    pub fn line_break(mut self) -> Self {
        self.segments.push(Segment::LineBreak);
        self
    }

    pub fn append(mut self, other: RichText) -> Self {
        self.segments.extend(other.segments);
        self
    }

    /// Text without emphasis, line breaks written as `line_break`
    pub fn to_plain(&self, line_break: &str) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) | Segment::Emphasis(text) => text.as_str(),
                Segment::LineBreak => line_break,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<RichText>,
    pub rows: Vec<Vec<RichText>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    Heading(String),
    Table(Table),
    Links(Vec<Link>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl ReportDocument {
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }
}

/// Exercise references linked at the end of the report
pub const EXERCISE_GLOSSARY: [(&str, &str); 15] = [
    ("Benchpress", "https://exrx.net/WeightExercises/PectoralSternal/BBBenchPress"),
    ("Cableflys", "https://exrx.net/WeightExercises/PectoralSternal/CBStandingFly"),
    ("Lat Pulldown", "https://exrx.net/WeightExercises/LatissimusDorsi/CBFrontPulldown"),
    ("Face Pulls", "https://exrx.net/WeightExercises/DeltoidPosterior/CBStandingRearDeltRowRope"),
    ("Triceps Extensions", "https://exrx.net/WeightExercises/Triceps/CBTriExt"),
    ("Overhead Press", "https://exrx.net/WeightExercises/DeltoidAnterior/BBMilitaryPress"),
    ("Cable Row", "https://exrx.net/WeightExercises/BackGeneral/CBStraightBackSeatedRow"),
    ("Skull Crusher", "https://exrx.net/WeightExercises/Triceps/BBLyingTriExtSC"),
    ("Squats", "https://exrx.net/WeightExercises/Quadriceps/BBSquat"),
    ("Hip Thrusts", "https://exrx.net/WeightExercises/GluteusMaximus/BBHipThrust"),
    ("Legpress", "https://exrx.net/WeightExercises/Quadriceps/LVSeatedLegPress"),
    ("Seated Calve Raise", "https://exrx.net/WeightExercises/Soleus/LVSeatedCalfRaise"),
    ("Back Extensions", "https://exrx.net/WeightExercises/ErectorSpinae/WtBackExtension"),
    ("Seated Leg Curls", "https://exrx.net/WeightExercises/Hamstrings/LVSeatedLegCurl"),
    ("Lever Chest Press", "https://exrx.net/WeightExercises/PectoralSternal/LVChestPressS"),
];

/// `lat pulldown` -> `Lat Pulldown`
pub fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Kilograms with at least one decimal and no trailing zeros beyond it: `55.0`, `53.75`
pub fn format_kg(kg: f64) -> String {
    let fixed = format!("{:.3}", kg);
    let trimmed = fixed.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// One prescription as displayed in a day cell
pub fn prescription_text(cell: &PrescriptionCell) -> RichText {
    let title = format!("{}:", title_case(&cell.exercise));
    let heading = if cell.accessory {
        RichText::plain(title)
    } else {
        RichText::new().emphasis(title)
    };

    let volume = match cell.load {
        Load::Weight(kg) => format!("{}x{}x{}", cell.sets, cell.reps, format_kg(kg)),
        Load::Rpe(rpe) => format!("{}x{} @{}", cell.sets, cell.reps, rpe),
    };

    heading.line_break().text(volume).line_break().line_break()
}

/// Every prescription of a training day
pub fn day_text(day: &DayPlan) -> RichText {
    day.cells
        .iter()
        .map(prescription_text)
        .fold(RichText::new(), RichText::append)
}

fn legend() -> RichText {
    RichText::plain("[Sets x")
        .line_break()
        .text("Reps x")
        .line_break()
        .text("Weight/RPE]")
}

fn week_table(week: &WeekPlan) -> Table {
    let mut title = format!("Week: {}", week.week);
    if week.deload {
        title.push_str(" (Deload)");
    }

    let header = std::iter::once(RichText::plain(title))
        .chain(week.days.iter().map(|day| RichText::plain(format!("Day {}", day.index + 1))))
        .collect();
    let row = std::iter::once(legend())
        .chain(week.days.iter().map(day_text))
        .collect();

    Table {
        header,
        rows: vec![row],
    }
}

fn overview_table(plan: &GeneratedPlan) -> Table {
    let profile = &plan.profile;
    let body = &plan.body;
    let header = [
        "Name",
        "Height [cm]",
        "Weight [Kg]",
        "Age",
        "BMR [KCal]",
        "Protein per day [g]",
        "BMI",
        "Bi-Weekly overload [Kg]",
    ]
    .into_iter()
    .map(RichText::plain)
    .collect();

    let row = vec![
        profile.name.clone(),
        profile.height_cm.to_string(),
        profile.weight_kg.to_string(),
        profile.age_years.to_string(),
        body.bmr_kcal.to_string(),
        body.protein_g.to_string(),
        format!("{} ({})", body.bmi, body.bmi_category),
        plan.overload_step_kg.to_string(),
    ]
    .into_iter()
    .map(RichText::plain)
    .collect();

    Table {
        header,
        rows: vec![row],
    }
}

fn test_table(plan: &GeneratedPlan) -> Table {
    let header = std::iter::once(RichText::new())
        .chain(plan.test.iter().map(|e| RichText::plain(title_case(&e.exercise))))
        .collect();

    let test_row = std::iter::once(RichText::plain("Test [Reps@Weight]"))
        .chain(plan.test.iter().map(|e| RichText::plain(format!("{}, {}", e.reps, e.weight_kg))))
        .collect();
    let max_row = std::iter::once(RichText::plain("1RM-estimate [Kg]"))
        .chain(plan.maxima.iter().map(|(_, max)| RichText::plain(format_kg(max))))
        .collect();
    let ratio_row = std::iter::once(RichText::plain("Bw%"))
        .chain(plan.maxima.iter().map(|(exercise, _)| {
            let ratio = plan
                .maxima
                .bodyweight_ratio(exercise, plan.profile.weight_kg)
                .ok()
                .flatten()
                .unwrap_or_default();
            RichText::plain(ratio.to_string())
        }))
        .collect();

    Table {
        header,
        rows: vec![test_row, max_row, ratio_row],
    }
}

/// Assemble the full report for a generated plan
pub fn build_report(plan: &GeneratedPlan) -> ReportDocument {
    let mut blocks = vec![
        Block::Heading("Overview".to_string()),
        Block::Table(overview_table(plan)),
        Block::Heading("Test".to_string()),
        Block::Table(test_table(plan)),
        Block::Heading("Plan".to_string()),
    ];
    blocks.extend(plan.cycle.weeks.iter().map(|week| Block::Table(week_table(week))));
    blocks.push(Block::Heading("Exercises (Links)".to_string()));
    blocks.push(Block::Links(
        EXERCISE_GLOSSARY
            .iter()
            .map(|(label, href)| Link {
                label: label.to_string(),
                href: href.to_string(),
            })
            .collect(),
    ));

    ReportDocument {
        title: format!("Training plan for {}", plan.profile.name),
        blocks,
    }
}
