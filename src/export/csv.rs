use chrono::NaiveDate;
use csv::Writer;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use crate::calendar::CalendarEvent;
use crate::error::{PlanError, Result};

/// Column order expected by calendar importers
pub const CALENDAR_HEADER: [&str; 8] = [
    "Subject",
    "Start Date",
    "Start Time",
    "End Date",
    "End Time",
    "All Day Event",
    "Description",
    "Private",
];

#[derive(Serialize)]
struct CalendarRow<'a> {
    #[serde(rename = "Subject")]
    subject: &'a str,
    #[serde(rename = "Start Date")]
    start_date: String,
    #[serde(rename = "Start Time")]
    start_time: &'a str,
    #[serde(rename = "End Date")]
    end_date: String,
    #[serde(rename = "End Time")]
    end_time: &'a str,
    #[serde(rename = "All Day Event")]
    all_day: &'static str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Private")]
    private: &'static str,
}

fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn format_date(date: NaiveDate, format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format))
        .map_err(|_| PlanError::Configuration(format!("invalid calendar date format '{}'", format)))?;
    Ok(out)
}

/// Write calendar events as CSV to any writer
pub fn write_calendar<W: Write>(events: &[CalendarEvent], date_format: &str, writer: W) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);

    if events.is_empty() {
        csv_writer.write_record(CALENDAR_HEADER)?;
    }

    for event in events {
        csv_writer.serialize(CalendarRow {
            subject: &event.subject,
            start_date: format_date(event.start_date, date_format)?,
            start_time: &event.start_time,
            end_date: format_date(event.end_date, date_format)?,
            end_time: &event.end_time,
            all_day: flag(event.all_day),
            description: &event.description,
            private: flag(event.private),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Export calendar events to a CSV file
pub fn export_calendar<P: AsRef<Path>>(events: &[CalendarEvent], date_format: &str, output_path: P) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_calendar(events, date_format, file)
}
