//! Periodization scheduler
//!
//! Expands the chosen split over the requested number of weeks. The cumulative overload is
//! computed sequentially up front (it only ever grows, once every second week); the weeks are
//! then independent and are expanded in parallel.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{PlanError, Result};
use crate::models::{DayPlan, TrainingCycle, WeekPlan};
use crate::prescription::PrescriptionEngine;
use crate::templates::DayCount;

/// Cumulative overload per week: the running total grows by `step` at every even week index
pub fn overload_schedule(weeks: u32, step: f64) -> Vec<f64> {
    let mut overload = 0.0;
    (0..weeks)
        .map(|i| {
            if i % 2 == 0 {
                overload += step;
            }
            overload
        })
        .collect()
}

/// Build the full training cycle for `weeks` weeks of the `day_count` split
pub fn build_cycle(engine: &PrescriptionEngine<'_>, day_count: DayCount, weeks: u32) -> Result<TrainingCycle> {
    if weeks == 0 {
        return Err(PlanError::invalid_input("weeks", "a cycle needs at least one week"));
    }

    let overloads = overload_schedule(weeks, engine.settings().overload_step_kg);
    let template = day_count.template();

    let weeks = overloads
        .into_par_iter()
        .enumerate()
        .map(|(i, cumulative_overload)| {
            let week = i as u32 + 1;
            let days = template
                .iter()
                .enumerate()
                .map(|(index, slots)| {
                    let cells = slots
                        .iter()
                        .map(|slot| engine.prescribe(slot, week, cumulative_overload))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(DayPlan { index, cells })
                })
                .collect::<Result<Vec<_>>>()?;

            let deload = engine.is_deload_week(week);
            debug!(week, cumulative_overload, deload, "Expanded week");

            Ok(WeekPlan {
                week,
                cumulative_overload,
                deload,
                days,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        split = %day_count,
        weeks = weeks.len(),
        "Built training cycle"
    );

    Ok(TrainingCycle { day_count, weeks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgressionSettings;
    use crate::models::ExerciseTest;
    use crate::rpe::RpeTable;
    use crate::strength::MaximaMap;

    fn full_maxima() -> MaximaMap {
        let test = ExerciseTest::new()
            .with("benchpress", 70.0, 8)
            .with("squat", 90.0, 10)
            .with("lat pulldown", 85.0, 10);
        MaximaMap::from_test(&test).unwrap()
    }

    #[test]
    fn test_overload_schedule() {
        assert_eq!(overload_schedule(5, 2.5), vec![2.5, 2.5, 5.0, 5.0, 7.5]);
        assert!(overload_schedule(0, 2.5).is_empty());
    }

    #[test]
    fn test_cycle_shape() {
        let maxima = full_maxima();
        let table = RpeTable::bundled().unwrap();
        let settings = ProgressionSettings::default();
        let engine = PrescriptionEngine::new(&maxima, &table, &settings);

        for count in DayCount::ALL {
            let cycle = build_cycle(&engine, count, 10).unwrap();
            assert_eq!(cycle.weeks.len(), 10);
            assert_eq!(cycle.session_count(), 10 * count.days());
            for (i, week) in cycle.weeks.iter().enumerate() {
                assert_eq!(week.week, i as u32 + 1);
                for (index, day) in week.days.iter().enumerate() {
                    assert_eq!(day.index, index);
                    assert_eq!(day.cells.len(), count.template()[index].len());
                }
            }
        }
    }

    #[test]
    fn test_deload_week_halves_every_exercise() {
        let maxima = full_maxima();
        let table = RpeTable::bundled().unwrap();
        let settings = ProgressionSettings::default();
        let engine = PrescriptionEngine::new(&maxima, &table, &settings);

        let cycle = build_cycle(&engine, DayCount::Three, 14).unwrap();
        for week in &cycle.weeks {
            assert_eq!(week.deload, week.week % 7 == 0);
            for (day, slots) in week.days.iter().zip(DayCount::Three.template()) {
                for (cell, slot) in day.cells.iter().zip(slots.iter()) {
                    let expected = if week.week % 7 == 0 {
                        PrescriptionEngine::deload_sets(slot.sets)
                    } else {
                        slot.sets
                    };
                    assert_eq!(cell.sets, expected);
                }
            }
        }
    }

    #[test]
    fn test_weights_track_overload() {
        let maxima = full_maxima();
        let table = RpeTable::bundled().unwrap();
        let settings = ProgressionSettings::default();
        let engine = PrescriptionEngine::new(&maxima, &table, &settings);

        let cycle = build_cycle(&engine, DayCount::Four, 4).unwrap();
        let first = cycle.weeks[0].days[0].cells[0].target_weight().unwrap();
        let third = cycle.weeks[2].days[0].cells[0].target_weight().unwrap();
        assert_eq!(third - first, 2.5);
    }

    #[test]
    fn test_zero_weeks_rejected() {
        let maxima = full_maxima();
        let table = RpeTable::bundled().unwrap();
        let settings = ProgressionSettings::default();
        let engine = PrescriptionEngine::new(&maxima, &table, &settings);

        assert!(build_cycle(&engine, DayCount::Two, 0).is_err());
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_overload_monotonic(weeks in 1u32..60) {
            let schedule = overload_schedule(weeks, 2.5);
            prop_assert_eq!(schedule.len(), weeks as usize);
            prop_assert_eq!(schedule[0], 2.5);
            for pair in schedule.windows(2) {
                prop_assert!(pair[1] >= pair[0]);
            }
            for (i, value) in schedule.iter().enumerate() {
                prop_assert_eq!(*value, 2.5 * ((i / 2) as f64 + 1.0));
            }
        }
    }
}
