use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use liftplan::config::PlanConfig;
use liftplan::export::html::DEFAULT_STYLESHEET;
use liftplan::logging::{init_logging, LogFormat};
use liftplan::models::{AthleteProfile, ExerciseTest, Gender, TestEntry};
use liftplan::report::format_kg;
use liftplan::plan::{untested_primaries, PlanGenerator, PlanRequest};
use liftplan::rpe::RpeTable;
use liftplan::strength::MaximaMap;
use liftplan::templates::DayCount;
use liftplan::PlanError;

/// liftplan - Periodized strength plan generator
///
/// Estimates 1RMs from submaximal test sets and turns them into a multi-week
/// plan with an HTML report and a calendar CSV.
#[derive(Parser)]
#[command(name = "liftplan")]
#[command(version = "0.1.0")]
#[command(about = "Periodized strength plan generator", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format (pretty, json, compact)
    #[arg(long, value_name = "FORMAT", global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the HTML report and the calendar CSV
    Generate {
        /// Athlete name, also used for the file names
        #[arg(short, long)]
        name: String,

        /// m/male or f/female
        #[arg(short, long)]
        gender: Gender,

        /// Height in cm
        #[arg(long)]
        height: f64,

        /// Body weight in kg
        #[arg(long)]
        weight: f64,

        #[arg(long)]
        age: u32,

        /// Test set as NAME=WEIGHTxREPS, e.g. benchpress=70x8 (repeatable)
        #[arg(short, long = "test", value_name = "TEST", required = true)]
        tests: Vec<TestEntry>,

        /// Training days per week (2, 3 or 4)
        #[arg(short, long, default_value = "3")]
        days: u8,

        /// Number of weeks
        #[arg(short, long, default_value = "12")]
        weeks: u32,

        /// First training day (YYYY-MM-DD, a Monday)
        #[arg(short, long)]
        start: NaiveDate,

        /// Output directory (overrides the configured one)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also write the generated plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate 1RMs from test sets
    Estimate {
        /// Test set as NAME=WEIGHTxREPS (repeatable)
        #[arg(short, long = "test", value_name = "TEST", required = true)]
        tests: Vec<TestEntry>,

        /// Body weight in kg, adds the bodyweight ratio column
        #[arg(short, long)]
        bodyweight: Option<f64>,

        /// Show which primary lifts of this split are still untested
        #[arg(short, long)]
        days: Option<u8>,
    },

    /// Show or initialize the configuration
    Config {
        /// Print the effective configuration
        #[arg(long)]
        show: bool,

        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Tabled)]
struct MaximumRow {
    #[tabled(rename = "Exercise")]
    exercise: String,
    #[tabled(rename = "Test")]
    test: String,
    #[tabled(rename = "1RM [Kg]")]
    one_rep_max: String,
    #[tabled(rename = "Bw%")]
    ratio: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PlanConfig::load_or_default(cli.config.as_deref())?;
    config.logging.level = config.logging.level.raised_by(cli.verbose);
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    init_logging(&config.logging)?;

    let outcome = match cli.command {
        Commands::Generate {
            name,
            gender,
            height,
            weight,
            age,
            tests,
            days,
            weeks,
            start,
            output_dir,
            json,
        } => {
            if let Some(dir) = output_dir {
                config.output.directory = dir;
            }
            AthleteProfile::new(name, gender, height, weight, age)
                .map_err(anyhow::Error::from)
                .and_then(|profile| {
                    let request = PlanRequest {
                        profile,
                        test: tests.into_iter().collect(),
                        day_count: days,
                        weeks,
                        start,
                    };
                    generate(&config, &request, json)
                })
        }

        Commands::Estimate {
            tests,
            bodyweight,
            days,
        } => estimate(tests.into_iter().collect(), bodyweight, days),

        Commands::Config { show, init } => manage_config(&config, cli.config.as_deref(), show, init),
    };

    if let Err(err) = &outcome {
        if let Some(plan_error) = err.downcast_ref::<PlanError>() {
            plan_error.log();
            if plan_error.is_user_error() {
                eprintln!("{} {}", "✗".red().bold(), plan_error.user_message());
                std::process::exit(2);
            }
        }
    }
    outcome
}

fn generate(config: &PlanConfig, request: &PlanRequest, json: bool) -> Result<()> {
    println!("{}", "Generating training plan...".green().bold());

    let table = RpeTable::load(config.resources.rpe_table.as_deref()).context("Failed to load RPE table")?;
    let stylesheet = match &config.resources.stylesheet {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stylesheet: {}", path.display()))?,
        None => DEFAULT_STYLESHEET.to_string(),
    };

    let plan = PlanGenerator::new(config, &table).generate(request)?;

    println!("  Athlete: {}", plan.profile.name);
    println!("  Split: {}, {} weeks", plan.cycle.day_count, plan.cycle.weeks.len());
    println!("  Sessions: {}", plan.events.len());

    let paths = plan
        .save(config, &stylesheet, chrono::Local::now().date_naive(), json)
        .context("Failed to write plan files")?;

    println!("  Report: {}", paths.report.display());
    println!("  Calendar: {}", paths.calendar.display());
    if let Some(json_path) = &paths.json {
        println!("  JSON: {}", json_path.display());
    }
    println!("{}", "✓ Plan generated successfully".green());
    Ok(())
}

fn estimate(test: ExerciseTest, bodyweight: Option<f64>, days: Option<u8>) -> Result<()> {
    let maxima = MaximaMap::from_test(&test)?;

    let rows = test
        .iter()
        .zip(maxima.iter())
        .map(|(entry, (exercise, max))| {
            let ratio = match bodyweight {
                Some(bw) => maxima.bodyweight_ratio(exercise, bw)?,
                None => None,
            };
            Ok(MaximumRow {
                exercise: exercise.to_string(),
                test: format!("{} x {}", entry.weight_kg, entry.reps),
                one_rep_max: format_kg(max),
                ratio: ratio.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
            })
        })
        .collect::<liftplan::Result<Vec<_>>>()?;

    println!("{}", Table::new(rows).with(Style::rounded()));

    if let Some(days) = days {
        let day_count = DayCount::try_from(days)?;
        let untested = untested_primaries(day_count, &maxima);
        if untested.is_empty() {
            println!("{}", format!("✓ All primary lifts of the {} split are tested", day_count).green());
        } else {
            println!(
                "{} {}",
                format!("Untested primary lifts ({} split):", day_count).yellow(),
                untested.join(", ")
            );
        }
    }
    Ok(())
}

fn manage_config(config: &PlanConfig, path: Option<&Path>, show: bool, init: bool) -> Result<()> {
    if init {
        let target = path
            .map(Path::to_path_buf)
            .unwrap_or_else(PlanConfig::default_config_path);
        if target.exists() {
            println!("{} {}", "Config already exists:".yellow(), target.display());
        } else {
            PlanConfig::default().save_to_file(&target)?;
            println!("{} {}", "✓ Wrote default config to".green(), target.display());
        }
    }

    if show || !init {
        print!("{}", config.to_toml()?);
    }
    Ok(())
}
