//! Property tests over random fields for every computed method pair.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use heat_core::entities::{Event, HistoryBatch, Registration};
use heat_core::enums::{LaneMethod, SeedingCriteria, SeriesMethod, Unit};
use heat_seeding::{HeatPlan, PlanRequest, build_plan};
use proptest::prelude::*;

fn event() -> Event {
    Event {
        id: "evt-prop".into(),
        name: "400m".into(),
        discipline_code: "400m".into(),
        gender: None,
        category: None,
        unit: Some(Unit::Time),
        max_lanes: None,
        max_lanes_indoor: None,
        indoor: false,
    }
}

fn field(marks: &[Option<u32>]) -> Vec<Registration> {
    marks
        .iter()
        .enumerate()
        .map(|(i, centis)| Registration {
            id: format!("reg-{i:03}"),
            event_id: "evt-prop".into(),
            athlete_id: format!("ath-{i:03}"),
            first_name: "F".into(),
            surname: format!("S{}", i % 5),
            start_number: u32::try_from(i).ok().filter(|n| n % 3 != 0),
            seed_mark: centis.map(|c| format!("{}.{:02}", c / 100, c % 100)),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        })
        .collect()
}

fn computed_series() -> impl Strategy<Value = SeriesMethod> {
    let methods: Vec<SeriesMethod> = SeriesMethod::ALL
        .iter()
        .copied()
        .filter(|m| *m != SeriesMethod::Manual)
        .collect();
    prop::sample::select(methods)
}

fn computed_lanes() -> impl Strategy<Value = LaneMethod> {
    let methods: Vec<LaneMethod> = LaneMethod::ALL
        .iter()
        .copied()
        .filter(|m| *m != LaneMethod::Manual)
        .collect();
    prop::sample::select(methods)
}

fn plan(
    marks: &[Option<u32>],
    series: SeriesMethod,
    lanes: LaneMethod,
    max_lanes: u32,
    rng_seed: u64,
) -> HeatPlan {
    let request = PlanRequest {
        series_method: series,
        lane_method: lanes,
        max_lanes,
        heats_count: None,
        finalists_count: None,
        criteria: SeedingCriteria::Auto,
        rng_seed,
        manual: &[],
    };
    build_plan(&event(), &field(marks), &HistoryBatch::new(), &request)
        .expect("default heat count always fits")
}

proptest! {
    #[test]
    fn every_registration_appears_exactly_once(
        marks in prop::collection::vec(prop::option::of(900u32..6000), 0..40),
        series in computed_series(),
        lanes in computed_lanes(),
        max_lanes in 1u32..10,
        rng_seed in any::<u64>(),
    ) {
        let plan = plan(&marks, series, lanes, max_lanes, rng_seed);
        let ids: Vec<&str> = plan
            .heats
            .iter()
            .flat_map(|h| &h.slots)
            .map(|s| s.entrant.registration.id.as_str())
            .collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        prop_assert_eq!(ids.len(), marks.len());
        prop_assert_eq!(unique.len(), marks.len());
    }

    #[test]
    fn lanes_are_unique_and_in_range(
        marks in prop::collection::vec(prop::option::of(900u32..6000), 1..40),
        series in computed_series(),
        lanes in computed_lanes(),
        max_lanes in 1u32..10,
    ) {
        let plan = plan(&marks, series, lanes, max_lanes, 1);
        for heat in &plan.heats {
            let mut seen = HashSet::new();
            for slot in heat.placed() {
                let lane = slot.lane.expect("placed slots carry a lane");
                prop_assert!((1..=max_lanes).contains(&lane));
                prop_assert!(seen.insert(lane), "lane {} used twice", lane);
            }
        }
    }

    #[test]
    fn heat_numbers_are_contiguous_from_one(
        marks in prop::collection::vec(prop::option::of(900u32..6000), 1..40),
        series in computed_series(),
        max_lanes in 1u32..10,
    ) {
        let plan = plan(&marks, series, LaneMethod::StandardInside, max_lanes, 3);
        let numbers: Vec<u32> = plan.heats.iter().map(|h| h.heat_number).collect();
        let expected: Vec<u32> = (1..=u32::try_from(plan.heats.len()).unwrap()).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn serpentine_balances_heats_and_puts_rank_one_in_heat_one(
        marks in prop::collection::vec(prop::option::of(900u32..6000), 1..60),
        max_lanes in 1u32..10,
    ) {
        let plan = plan(&marks, SeriesMethod::Serpentine, LaneMethod::WaSprintsStraight, max_lanes, 0);
        let sizes: Vec<usize> = plan.heats.iter().map(|h| h.slots.len()).collect();
        let largest = sizes.iter().max().copied().unwrap_or_default();
        let smallest = sizes.iter().min().copied().unwrap_or_default();
        prop_assert!(largest - smallest <= 1, "sizes {:?}", sizes);
        prop_assert!(plan.heats[0].slots.iter().any(|s| s.entrant.seed_rank == 1));
    }

    #[test]
    fn straight_final_has_one_heat_of_capped_size(
        marks in prop::collection::vec(prop::option::of(900u32..6000), 1..30),
        max_lanes in 1u32..10,
        lanes in computed_lanes(),
    ) {
        let plan = plan(&marks, SeriesMethod::StraightFinal, lanes, max_lanes, 0);
        prop_assert_eq!(plan.heats.len(), 1);
        let expected = marks.len().min(max_lanes as usize);
        prop_assert_eq!(plan.heats[0].placed().count(), expected);
        prop_assert_eq!(plan.bye_count(), marks.len() - expected);
    }
}
