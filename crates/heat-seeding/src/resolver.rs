//! Seed resolution: best-available qualifying mark per entrant, then a
//! deterministic ranking of the whole field.

use std::cmp::Ordering;

use heat_core::entities::{Event, HistoryBatch, Registration, SeedWarning};
use heat_core::enums::{MarkSource, SeedingCriteria, Unit};
use heat_core::errors::SeedingError;

use crate::marks::{format_mark, parse_mark};

/// An entrant with its resolved qualifying mark and 1-based rank.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntrant {
    pub registration: Registration,
    /// Comparable value: seconds for times, raw number otherwise.
    pub seed_value: Option<f64>,
    pub seed_source: Option<MarkSource>,
    /// Canonical rendering of `seed_value`.
    pub seed_time: Option<String>,
    pub seed_rank: u32,
}

impl RankedEntrant {
    #[must_use]
    pub fn registration_id(&self) -> &str {
        &self.registration.id
    }

    #[must_use]
    pub const fn is_seeded(&self) -> bool {
        self.seed_value.is_some()
    }
}

/// Ranked field plus the marks that had to be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedOutcome {
    pub ranked: Vec<RankedEntrant>,
    pub warnings: Vec<SeedWarning>,
}

struct Candidate {
    value: f64,
    source: MarkSource,
}

/// Rank the registrations of one event.
///
/// Registrations must be passed in registration order. Unseeded entrants
/// keep that order at the bottom of the field.
///
/// # Errors
///
/// Returns `SeedingError::Configuration` if the event has no unit.
pub fn resolve_seeds(
    event: &Event,
    registrations: &[Registration],
    history: &HistoryBatch,
    criteria: SeedingCriteria,
) -> Result<SeedOutcome, SeedingError> {
    let unit = event.unit.ok_or_else(|| SeedingError::Configuration {
        event_id: event.id.clone(),
        missing: "unit".into(),
    })?;

    let mut warnings = Vec::new();
    let mut seeded: Vec<(usize, Candidate)> = Vec::new();
    let mut unseeded: Vec<usize> = Vec::new();

    for (index, registration) in registrations.iter().enumerate() {
        match pick_candidate(event, registration, history, criteria, unit, &mut warnings) {
            Some(candidate) => seeded.push((index, candidate)),
            None => unseeded.push(index),
        }
    }

    seeded.sort_by(|(ia, a), (ib, b)| {
        compare_values(a.value, b.value, unit)
            .then_with(|| {
                let sa = registrations[*ia].surname.to_lowercase();
                let sb = registrations[*ib].surname.to_lowercase();
                sa.cmp(&sb)
            })
            .then_with(|| ia.cmp(ib))
    });

    let mut ranked = Vec::with_capacity(registrations.len());
    for (index, candidate) in seeded {
        ranked.push(RankedEntrant {
            registration: registrations[index].clone(),
            seed_value: Some(candidate.value),
            seed_source: Some(candidate.source),
            seed_time: Some(format_mark(candidate.value, unit)),
            seed_rank: 0,
        });
    }
    for index in unseeded {
        ranked.push(RankedEntrant {
            registration: registrations[index].clone(),
            seed_value: None,
            seed_source: None,
            seed_time: None,
            seed_rank: 0,
        });
    }
    for (rank, entrant) in (1u32..).zip(ranked.iter_mut()) {
        entrant.seed_rank = rank;
    }

    tracing::debug!(
        event_id = %event.id,
        entrants = ranked.len(),
        seeded = ranked.iter().filter(|e| e.is_seeded()).count(),
        warnings = warnings.len(),
        "resolved seeds"
    );

    Ok(SeedOutcome { ranked, warnings })
}

fn pick_candidate(
    event: &Event,
    registration: &Registration,
    history: &HistoryBatch,
    criteria: SeedingCriteria,
    unit: Unit,
    warnings: &mut Vec<SeedWarning>,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for &source in criteria.chain() {
        let raw = match source {
            MarkSource::SeedMark => registration.seed_mark.as_deref(),
            MarkSource::SeasonBest | MarkSource::PersonalBest => history
                .get(&registration.athlete_id)
                .and_then(|h| h.mark(source, &event.discipline_code)),
        };
        let Some(raw) = raw else { continue };

        match parse_mark(raw) {
            Ok(Some(value)) => {
                let candidate = Candidate { value, source };
                if criteria != SeedingCriteria::BestAvailable {
                    return Some(candidate);
                }
                let better = best.as_ref().is_none_or(|current| {
                    compare_values(candidate.value, current.value, unit) == Ordering::Less
                });
                if better {
                    best = Some(candidate);
                }
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(
                    registration_id = %registration.id,
                    source = %source,
                    mark = raw,
                    %error,
                    "unparseable mark, falling back"
                );
                warnings.push(SeedWarning {
                    registration_id: registration.id.clone(),
                    source,
                    mark: raw.to_string(),
                    reason: error.to_string(),
                });
            }
        }
    }

    best
}

/// `Less` means `a` ranks ahead of `b`.
fn compare_values(a: f64, b: f64, unit: Unit) -> Ordering {
    if unit.lower_is_better() {
        a.total_cmp(&b)
    } else {
        b.total_cmp(&a)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use heat_core::entities::{PerformanceRecord, group_history};
    use heat_core::enums::PerformanceKind;
    use pretty_assertions::assert_eq;

    use super::*;

    fn event(unit: Option<Unit>) -> Event {
        Event {
            id: "evt-1".into(),
            name: "100m".into(),
            discipline_code: "100m".into(),
            gender: None,
            category: None,
            unit,
            max_lanes: Some(8),
            max_lanes_indoor: None,
            indoor: false,
        }
    }

    fn registration(id: &str, surname: &str, seed: Option<&str>) -> Registration {
        Registration {
            id: id.into(),
            event_id: "evt-1".into(),
            athlete_id: format!("ath-{id}"),
            first_name: "A".into(),
            surname: surname.into(),
            start_number: None,
            seed_mark: seed.map(String::from),
            created_at: Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap(),
        }
    }

    fn record(athlete: &str, kind: PerformanceKind, result: &str) -> PerformanceRecord {
        PerformanceRecord {
            athlete_id: athlete.into(),
            discipline_code: "100m".into(),
            kind,
            result: result.into(),
            date: None,
            competition: None,
        }
    }

    fn order(outcome: &SeedOutcome) -> Vec<&str> {
        outcome.ranked.iter().map(RankedEntrant::registration_id).collect()
    }

    #[test]
    fn time_ranks_ascending_with_unseeded_last() {
        let regs = [
            registration("a", "Kowalski", Some("11.20")),
            registration("b", "Nowak", Some("11.00")),
            registration("c", "Wisniewski", None),
        ];
        let outcome =
            resolve_seeds(&event(Some(Unit::Time)), &regs, &HistoryBatch::new(), SeedingCriteria::Auto)
                .unwrap();

        assert_eq!(order(&outcome), vec!["b", "a", "c"]);
        assert_eq!(outcome.ranked[0].seed_time.as_deref(), Some("11.00"));
        assert_eq!(outcome.ranked[1].seed_time.as_deref(), Some("11.20"));
        assert_eq!(outcome.ranked[2].seed_time, None);
        let ranks: Vec<u32> = outcome.ranked.iter().map(|e| e.seed_rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn distance_ranks_descending() {
        let regs = [
            registration("a", "A", Some("7.10")),
            registration("b", "B", Some("7,45")),
            registration("c", "C", Some("6.90")),
        ];
        let outcome = resolve_seeds(
            &event(Some(Unit::Distance)),
            &regs,
            &HistoryBatch::new(),
            SeedingCriteria::Auto,
        )
        .unwrap();
        assert_eq!(order(&outcome), vec!["b", "a", "c"]);
    }

    #[test]
    fn ties_break_by_surname_then_registration_order() {
        let regs = [
            registration("a", "Zielinski", Some("10.90")),
            registration("b", "adamski", Some("10.90")),
            registration("c", "Adamski", Some("10.90")),
        ];
        let outcome =
            resolve_seeds(&event(Some(Unit::Time)), &regs, &HistoryBatch::new(), SeedingCriteria::Auto)
                .unwrap();
        assert_eq!(order(&outcome), vec!["b", "c", "a"]);
    }

    #[test]
    fn falls_back_to_season_then_personal_best() {
        let regs = [
            registration("a", "A", None),
            registration("b", "B", None),
            registration("c", "C", Some("10.50")),
        ];
        let history = group_history([
            record("ath-a", PerformanceKind::SeasonBest, "10.70"),
            record("ath-a", PerformanceKind::PersonalBest, "10.40"),
            record("ath-b", PerformanceKind::PersonalBest, "10.60"),
        ]);
        let outcome =
            resolve_seeds(&event(Some(Unit::Time)), &regs, &history, SeedingCriteria::Auto).unwrap();

        assert_eq!(order(&outcome), vec!["c", "b", "a"]);
        assert_eq!(outcome.ranked[1].seed_source, Some(MarkSource::PersonalBest));
        assert_eq!(outcome.ranked[2].seed_source, Some(MarkSource::SeasonBest));
    }

    #[test]
    fn unparseable_seed_mark_warns_and_falls_back() {
        let regs = [
            registration("a", "A", Some("quick")),
            registration("b", "B", Some("??")),
            registration("c", "C", Some("11.00")),
        ];
        let history = group_history([record("ath-a", PerformanceKind::PersonalBest, "10.80")]);
        let outcome =
            resolve_seeds(&event(Some(Unit::Time)), &regs, &history, SeedingCriteria::Auto).unwrap();

        assert_eq!(order(&outcome), vec!["a", "c", "b"]);
        assert!(!outcome.ranked[2].is_seeded());
        assert_eq!(outcome.warnings.len(), 2);
        assert_eq!(outcome.warnings[0].registration_id, "a");
        assert_eq!(outcome.warnings[0].source, MarkSource::SeedMark);
        assert_eq!(outcome.warnings[1].mark, "??");
    }

    #[test]
    fn best_available_picks_best_across_sources() {
        let regs = [registration("a", "A", Some("11.00"))];
        let history = group_history([
            record("ath-a", PerformanceKind::SeasonBest, "10.90"),
            record("ath-a", PerformanceKind::PersonalBest, "10.70"),
        ]);
        let outcome = resolve_seeds(
            &event(Some(Unit::Time)),
            &regs,
            &history,
            SeedingCriteria::BestAvailable,
        )
        .unwrap();
        assert_eq!(outcome.ranked[0].seed_source, Some(MarkSource::PersonalBest));
        assert_eq!(outcome.ranked[0].seed_time.as_deref(), Some("10.70"));
    }

    #[test]
    fn seed_mark_only_ignores_history() {
        let regs = [registration("a", "A", None)];
        let history = group_history([record("ath-a", PerformanceKind::PersonalBest, "10.70")]);
        let outcome = resolve_seeds(
            &event(Some(Unit::Time)),
            &regs,
            &history,
            SeedingCriteria::SeedMark,
        )
        .unwrap();
        assert!(!outcome.ranked[0].is_seeded());
    }

    #[test]
    fn missing_unit_is_configuration_error() {
        let regs = [registration("a", "A", Some("11.00"))];
        let err = resolve_seeds(&event(None), &regs, &HistoryBatch::new(), SeedingCriteria::Auto)
            .unwrap_err();
        assert_eq!(
            err,
            SeedingError::Configuration {
                event_id: "evt-1".into(),
                missing: "unit".into(),
            }
        );
    }
}
