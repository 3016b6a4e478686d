//! Calendar scheduling
//!
//! Places every training day of a cycle on the calendar. Sessions start on a Monday and the
//! date cursor advances by the split's rest gaps, which always add up to one week.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::CalendarSettings;
use crate::error::{PlanError, Result};
use crate::models::TrainingCycle;
use crate::report::day_text;

/// Line break used inside event descriptions
pub const DESCRIPTION_LINE_BREAK: &str = "<br>";

/// One calendar entry per training day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub subject: String,
    pub start_date: NaiveDate,
    pub start_time: String,
    pub end_date: NaiveDate,
    pub end_time: String,
    pub all_day: bool,
    pub description: String,
    pub private: bool,
    /// Week and 0-based day the event was generated from
    pub week: u32,
    pub day_index: usize,
}

/// Plans are anchored to a Monday
pub fn ensure_monday(date: NaiveDate) -> Result<()> {
    match date.weekday() {
        Weekday::Mon => Ok(()),
        weekday => Err(PlanError::InvalidStartDate { date, weekday }),
    }
}

/// Create the calendar events for `cycle`, starting on `start`
pub fn schedule_events(
    cycle: &TrainingCycle,
    start: NaiveDate,
    settings: &CalendarSettings,
) -> Result<Vec<CalendarEvent>> {
    ensure_monday(start)?;

    let gaps = cycle.day_count.rest_gaps();
    let mut current = start;
    let mut events = Vec::with_capacity(cycle.session_count());

    for week in &cycle.weeks {
        for (day, gap) in week.days.iter().zip(gaps.iter()) {
            events.push(CalendarEvent {
                subject: settings.subject.clone(),
                start_date: current,
                start_time: settings.start_time.clone(),
                end_date: current,
                end_time: settings.end_time.clone(),
                all_day: settings.all_day,
                description: day_text(day).to_plain(DESCRIPTION_LINE_BREAK),
                private: settings.private,
                week: week.week,
                day_index: day.index,
            });

            current = current
                .checked_add_signed(Duration::days(*gap))
                .ok_or_else(|| PlanError::invalid_input("start", "calendar runs past the supported date range"))?;
        }
    }

    info!(
        events = events.len(),
        first = %start,
        last = ?events.last().map(|e| e.start_date),
        "Scheduled calendar events"
    );

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayPlan, WeekPlan};
    use crate::templates::DayCount;

    fn empty_cycle(day_count: DayCount, weeks: u32) -> TrainingCycle {
        TrainingCycle {
            day_count,
            weeks: (1..=weeks)
                .map(|week| WeekPlan {
                    week,
                    cumulative_overload: 0.0,
                    deload: false,
                    days: (0..day_count.days())
                        .map(|index| DayPlan {
                            index,
                            cells: Vec::new(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()
    }

    fn gaps_between(events: &[CalendarEvent]) -> Vec<i64> {
        events
            .windows(2)
            .map(|pair| (pair[1].start_date - pair[0].start_date).num_days())
            .collect()
    }

    #[test]
    fn test_rejects_non_monday() {
        let tuesday = NaiveDate::from_ymd_opt(2023, 12, 26).unwrap();
        let err = schedule_events(&empty_cycle(DayCount::Two, 1), tuesday, &CalendarSettings::default())
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidStartDate {
                weekday: Weekday::Tue,
                ..
            }
        ));
    }

    #[test]
    fn test_spacing_per_split() {
        let settings = CalendarSettings::default();

        let events = schedule_events(&empty_cycle(DayCount::Two, 2), monday(), &settings).unwrap();
        assert_eq!(gaps_between(&events), vec![3, 4, 3]);

        let events = schedule_events(&empty_cycle(DayCount::Three, 2), monday(), &settings).unwrap();
        assert_eq!(gaps_between(&events), vec![2, 2, 3, 2, 2]);

        let events = schedule_events(&empty_cycle(DayCount::Four, 2), monday(), &settings).unwrap();
        assert_eq!(gaps_between(&events), vec![1, 2, 1, 3, 1, 2, 1]);
    }

    #[test]
    fn test_every_week_starts_on_monday() {
        let settings = CalendarSettings::default();
        for count in DayCount::ALL {
            let events = schedule_events(&empty_cycle(count, 6), monday(), &settings).unwrap();
            for event in events.iter().filter(|e| e.day_index == 0) {
                assert_eq!(event.start_date.weekday(), Weekday::Mon);
            }
            assert_eq!(events.len(), 6 * count.days());
        }
    }

    #[test]
    fn test_event_fields_follow_settings() {
        let settings = CalendarSettings {
            subject: "Eurotraining".to_string(),
            all_day: true,
            ..CalendarSettings::default()
        };
        let events = schedule_events(&empty_cycle(DayCount::Two, 1), monday(), &settings).unwrap();

        let first = &events[0];
        assert_eq!(first.subject, "Eurotraining");
        assert_eq!(first.start_date, first.end_date);
        assert_eq!(first.start_time, "8:00 PM");
        assert!(first.all_day);
        assert!(first.private);
        assert_eq!(first.week, 1);
    }
}
