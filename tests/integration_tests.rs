use chrono::{Datelike, NaiveDate, Weekday};
use liftplan::export::{csv::write_calendar, html::render_html};
use liftplan::models::{AthleteProfile, ExerciseTest, Gender, Load, Reps, WeekPlan};
use liftplan::report::{Block, Segment};
use liftplan::{GeneratedPlan, PlanConfig, PlanError, PlanGenerator, PlanRequest, RpeTable};

/// Integration tests covering a full plan generation run

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    fn create_test_request(day_count: u8, weeks: u32) -> PlanRequest {
        PlanRequest {
            profile: AthleteProfile::new("dummy", Gender::Male, 192.0, 95.0, 30).unwrap(),
            test: ExerciseTest::new().with("benchpress", 70.0, 8),
            day_count,
            weeks,
            start: monday(),
        }
    }

    fn week(plan: &GeneratedPlan, number: u32) -> &WeekPlan {
        &plan.cycle.weeks[number as usize - 1]
    }

    fn full_test() -> ExerciseTest {
        ExerciseTest::new()
            .with("benchpress", 70.0, 8)
            .with("squat", 90.0, 10)
            .with("lat pulldown", 85.0, 10)
    }

    #[test]
    fn test_end_to_end_three_day_plan() {
        let config = PlanConfig::default();
        let table = RpeTable::bundled().unwrap();
        let plan = PlanGenerator::new(&config, &table)
            .generate(&create_test_request(3, 2))
            .unwrap();

        assert_eq!(plan.cycle.weeks.len(), 2);
        for week in &plan.cycle.weeks {
            assert_eq!(week.days.len(), 3);
        }

        let week1 = week(&plan, 1);
        assert_eq!(week1.cumulative_overload, 2.5);
        assert!(!week1.deload);

        let bench = week1.days[0]
            .cells
            .iter()
            .find(|c| c.exercise == "benchpress")
            .unwrap();
        assert_eq!(bench.sets, 3);
        assert_eq!(bench.target_weight(), Some(55.0));

        assert_eq!(plan.events.len(), 6);
        assert_eq!(plan.events[0].start_date, monday());
        let gaps: Vec<i64> = plan
            .events
            .windows(2)
            .map(|pair| (pair[1].start_date - pair[0].start_date).num_days())
            .collect();
        assert_eq!(gaps, vec![2, 2, 3, 2, 2]);
    }

    #[test]
    fn test_overload_grows_every_second_week() {
        let config = PlanConfig::default();
        let table = RpeTable::bundled().unwrap();
        let mut request = create_test_request(3, 6);
        request.test = full_test();
        let plan = PlanGenerator::new(&config, &table).generate(&request).unwrap();

        let overloads: Vec<f64> = plan.cycle.weeks.iter().map(|w| w.cumulative_overload).collect();
        assert_eq!(overloads, vec![2.5, 2.5, 5.0, 5.0, 7.5, 7.5]);

        let bench = |number: u32| week(&plan, number).days[0].cells[0].target_weight();
        assert_eq!(bench(1), Some(55.0));
        assert_eq!(bench(3), Some(57.5));
        assert_eq!(bench(5), Some(60.0));
    }

    #[test]
    fn test_deload_week_halves_sets() {
        let config = PlanConfig::default();
        let table = RpeTable::bundled().unwrap();
        let mut request = create_test_request(4, 8);
        request.test = full_test();
        let plan = PlanGenerator::new(&config, &table).generate(&request).unwrap();

        let week6 = week(&plan, 6);
        let week7 = week(&plan, 7);
        assert!(week7.deload);
        assert!(!week(&plan, 8).deload);

        for (normal, deload) in week6.days.iter().zip(&week7.days) {
            for (a, b) in normal.cells.iter().zip(&deload.cells) {
                let expected = (a.sets as f64 / 2.0).round_ties_even() as u32;
                assert_eq!(b.sets, expected, "{} in deload week", b.exercise);
                assert!(b.deload);
            }
        }
    }

    #[test]
    fn test_deload_first_week_variant() {
        let mut config = PlanConfig::default();
        config.progression.deload_first_week = true;
        let table = RpeTable::bundled().unwrap();
        let plan = PlanGenerator::new(&config, &table)
            .generate(&create_test_request(2, 2))
            .unwrap();

        assert!(week(&plan, 1).deload);
        assert_eq!(week(&plan, 1).days[0].cells[0].sets, 2);
        assert!(!week(&plan, 2).deload);
    }

    #[test]
    fn test_untested_primaries_cued_by_rpe() {
        let config = PlanConfig::default();
        let table = RpeTable::bundled().unwrap();
        let plan = PlanGenerator::new(&config, &table)
            .generate(&create_test_request(2, 1))
            .unwrap();

        let squat = plan.cycle.weeks[0].days[0]
            .cells
            .iter()
            .find(|c| c.exercise == "squat")
            .unwrap();
        assert_eq!(squat.load, Load::Rpe(7.0));
        assert!(!squat.accessory);
    }

    #[test]
    fn test_capitalized_test_names_match_templates() {
        let config = PlanConfig::default();
        let table = RpeTable::bundled().unwrap();
        let mut request = create_test_request(3, 1);
        request.test = ExerciseTest::new().with("Benchpress", 70.0, 8).with(" SQUAT", 90.0, 10);
        let plan = PlanGenerator::new(&config, &table).generate(&request).unwrap();

        let cells = &plan.cycle.weeks[0].days[0].cells;
        let bench = cells.iter().find(|c| c.exercise == "benchpress").unwrap();
        assert_eq!(bench.load, Load::Weight(55.0));
        let squat = cells.iter().find(|c| c.exercise == "squat").unwrap();
        assert!(squat.target_weight().is_some());
    }

    #[test]
    fn test_max_effort_accessory() {
        let config = PlanConfig::default();
        let table = RpeTable::bundled().unwrap();
        let plan = PlanGenerator::new(&config, &table)
            .generate(&create_test_request(2, 1))
            .unwrap();

        let rollout = plan.cycle.weeks[0].days[1]
            .cells
            .iter()
            .find(|c| c.exercise == "ab rollout")
            .unwrap();
        assert_eq!(rollout.reps, Reps::MaxEffort);
        assert_eq!(rollout.load, Load::Rpe(8.0));
        assert!(plan.events[1].description.contains("Ab Rollout:<br>3xX @8"));
    }

    #[test]
    fn test_rejects_bad_requests() {
        let config = PlanConfig::default();
        let table = RpeTable::bundled().unwrap();
        let generator = PlanGenerator::new(&config, &table);

        let mut request = create_test_request(3, 2);
        request.start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        match generator.generate(&request) {
            Err(PlanError::InvalidStartDate { weekday, .. }) => assert_eq!(weekday, Weekday::Wed),
            other => panic!("expected InvalidStartDate, got {:?}", other),
        }

        let request = create_test_request(1, 2);
        assert!(matches!(generator.generate(&request), Err(PlanError::UnsupportedDayCount(1))));

        let mut request = create_test_request(3, 2);
        request.test = ExerciseTest::new().with("benchpress", 0.0, 8);
        assert!(matches!(generator.generate(&request), Err(PlanError::InvalidInput { .. })));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = PlanConfig::default();
        let table = RpeTable::bundled().unwrap();
        let generator = PlanGenerator::new(&config, &table);
        let mut request = create_test_request(4, 10);
        request.test = full_test();

        let first = generator.generate(&request).unwrap();
        let second = generator.generate(&request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_and_calendar_share_the_cycle() {
        let config = PlanConfig::default();
        let table = RpeTable::bundled().unwrap();
        let plan = PlanGenerator::new(&config, &table)
            .generate(&create_test_request(3, 2))
            .unwrap();

        let report = plan.report();
        let week_tables: Vec<_> = report
            .tables()
            .filter(|t| matches!(t.header[0].segments.first(), Some(Segment::Text(text)) if text.starts_with("Week:")))
            .collect();
        assert_eq!(week_tables.len(), 2);
        assert_eq!(week_tables[0].header.len(), 4);
        assert!(matches!(report.blocks.last(), Some(Block::Links(links)) if links.len() == 15));

        let html = render_html(&report, "");
        assert!(html.contains("25.77 (Overweight)"));
        assert!(html.contains("<b>Benchpress:</b><br>3x10x55.0"));

        let mut buffer = Vec::new();
        write_calendar(&plan.events, &config.calendar.date_format, &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        assert_eq!(csv.lines().count(), 1 + plan.events.len());
        assert!(csv.lines().nth(1).unwrap().starts_with("Strength Training,08/01/24,8:00 PM"));

        for event in &plan.events {
            assert!(!event.description.contains("<b>"));
        }
        assert_eq!(plan.events[3].start_date.weekday(), Weekday::Mon);
    }
}
