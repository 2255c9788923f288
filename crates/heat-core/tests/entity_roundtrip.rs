//! Serde roundtrip and JsonSchema validation tests for all entity types.

use chrono::{NaiveDate, Utc};
use heat_core::entities::*;
use heat_core::enums::*;
use heat_core::responses::GeneratedSheet;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_heat() -> Heat {
    Heat {
        id: "hea-a3f8b2c1".into(),
        event_id: "evt-100m-m".into(),
        heat_number: 1,
        round: Round::Semifinal,
        max_lanes: 8,
        scheduled_time: Some(Utc::now()),
        notes: Some("Wind gauge on lane 8 side".into()),
        created_at: Utc::now(),
    }
}

fn sample_assignment(lane: Option<u32>, is_present: bool) -> HeatAssignment {
    HeatAssignment {
        id: "hta-0000beef".into(),
        heat_id: "hea-a3f8b2c1".into(),
        registration_id: "reg-7".into(),
        lane,
        break_group: lane.filter(|l| *l >= 5).map(|l| (l - 3) / 2),
        seed_time: Some("10.95".into()),
        seed_rank: Some(3),
        assignment_method: SeriesMethod::Wa400m800m,
        is_present,
    }
}

roundtrip_and_validate!(
    event_roundtrip,
    Event,
    Event {
        id: "evt-100m-m".into(),
        name: "100m Men".into(),
        discipline_code: "100m".into(),
        gender: Some("M".into()),
        category: Some("Senior".into()),
        unit: Some(Unit::Time),
        max_lanes: Some(8),
        max_lanes_indoor: None,
        indoor: false,
    }
);

roundtrip_and_validate!(
    registration_roundtrip,
    Registration,
    Registration {
        id: "reg-7".into(),
        event_id: "evt-100m-m".into(),
        athlete_id: "ath-7".into(),
        first_name: "Ewa".into(),
        surname: "Nowak".into(),
        start_number: Some(112),
        seed_mark: Some("11,20".into()),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    athlete_history_roundtrip,
    AthleteHistory,
    {
        let mut history = AthleteHistory::default();
        history.insert(PerformanceRecord {
            athlete_id: "ath-7".into(),
            discipline_code: "100m".into(),
            kind: PerformanceKind::SeasonBest,
            result: "11.31".into(),
            date: NaiveDate::from_ymd_opt(2026, 6, 14),
            competition: Some("Memorial Kusocinskiego".into()),
        });
        history
    }
);

roundtrip_and_validate!(
    competition_bundle_roundtrip,
    CompetitionBundle,
    CompetitionBundle {
        events: Vec::new(),
        registrations: Vec::new(),
        performances: vec![PerformanceRecord {
            athlete_id: "ath-7".into(),
            discipline_code: "400m".into(),
            kind: PerformanceKind::PersonalBest,
            result: "52.80".into(),
            date: None,
            competition: None,
        }],
    }
);

roundtrip_and_validate!(
    lane_assignment_roundtrip,
    LaneAssignment,
    LaneAssignment {
        registration_id: "reg-7".into(),
        lane: 4,
    }
);

roundtrip_and_validate!(heat_roundtrip, Heat, sample_heat());

roundtrip_and_validate!(
    assignment_roundtrip,
    HeatAssignment,
    sample_assignment(Some(4), true)
);

roundtrip_and_validate!(
    bye_assignment_roundtrip,
    HeatAssignment,
    sample_assignment(None, false)
);

roundtrip_and_validate!(
    heat_generation_roundtrip,
    HeatGeneration,
    HeatGeneration {
        event_id: "evt-100m-m".into(),
        round: Round::Final,
        series_method: SeriesMethod::Random,
        lane_method: LaneMethod::StandardInside,
        rng_seed: Some(0x5eed),
        generated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    generated_sheet_roundtrip,
    GeneratedSheet,
    GeneratedSheet {
        event_id: "evt-100m-m".into(),
        round: Round::Qualification,
        series_method: SeriesMethod::Serpentine,
        lane_method: LaneMethod::WaSprintsStraight,
        rng_seed: None,
        heats: vec![HeatWithAssignments {
            heat: sample_heat(),
            assignments: vec![sample_assignment(Some(4), true)],
        }],
        warnings: vec![SeedWarning {
            registration_id: "reg-9".into(),
            source: MarkSource::SeedMark,
            mark: "fast".into(),
            reason: "not a number".into(),
        }],
    }
);

#[test]
fn heat_with_assignments_flattens_heat_fields() {
    let value = serde_json::to_value(HeatWithAssignments {
        heat: sample_heat(),
        assignments: Vec::new(),
    })
    .unwrap();
    assert_eq!(value["heat_number"], 1);
    assert_eq!(value["round"], "semifinal");
    assert!(value["assignments"].as_array().unwrap().is_empty());
}

#[test]
fn lane_map_ignores_byes_and_sorts() {
    let mut heat_two = sample_heat();
    heat_two.heat_number = 2;
    let mut a = sample_assignment(Some(5), true);
    a.registration_id = "reg-b".into();
    let mut b = sample_assignment(Some(3), true);
    b.registration_id = "reg-a".into();

    let sheet = GeneratedSheet {
        event_id: "evt".into(),
        round: Round::Final,
        series_method: SeriesMethod::Serpentine,
        lane_method: LaneMethod::StandardInside,
        rng_seed: None,
        heats: vec![
            HeatWithAssignments {
                heat: heat_two,
                assignments: vec![a],
            },
            HeatWithAssignments {
                heat: sample_heat(),
                assignments: vec![b, sample_assignment(None, false)],
            },
        ],
        warnings: Vec::new(),
    };

    assert_eq!(sheet.entrant_count(), 3);
    assert_eq!(
        sheet.lane_map(),
        vec![(1, 3, "reg-a".to_string()), (2, 5, "reg-b".to_string())]
    );
}

#[test]
fn bundle_sections_default_to_empty() {
    let bundle: CompetitionBundle = serde_json::from_str(r#"{"events": []}"#).unwrap();
    assert!(bundle.is_empty());
}
