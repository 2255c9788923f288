//! Heat distribution: decides the heat count and places the ranked field into
//! heats according to a [`SeriesMethod`].
//!
//! Every method is a pure function registered in [`STRATEGIES`]. A method
//! receives the ranked field and a [`Layout`] and returns the per-heat groups
//! (and, for `straight_final`, the byes). Every input entrant lands in exactly
//! one heat or in the byes.

use std::collections::{BTreeMap, HashMap, HashSet};

use heat_core::entities::ManualPlacement;
use heat_core::enums::SeriesMethod;
use heat_core::errors::SeedingError;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::resolver::RankedEntrant;

/// Inputs shared by every series method.
#[derive(Debug, Clone, Copy)]
pub struct DistributionParams<'a> {
    pub max_lanes: u32,
    pub heats_count: Option<u32>,
    pub finalists_count: Option<u32>,
    /// Shuffle seed, read only by `random`.
    pub rng_seed: u64,
    /// Caller placements, read only by `manual`.
    pub manual: &'a [ManualPlacement],
}

/// One heat's entrants, in the order the lane allocator consumes them.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatGroup {
    pub heat_number: u32,
    pub entrants: Vec<RankedEntrant>,
}

/// Result of a distribution: heats numbered from 1, plus the byes.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub method: SeriesMethod,
    pub heats: Vec<HeatGroup>,
    pub byes: Vec<RankedEntrant>,
}

impl Distribution {
    #[must_use]
    pub fn entrant_count(&self) -> usize {
        self.heats.iter().map(|h| h.entrants.len()).sum::<usize>() + self.byes.len()
    }
}

struct Layout<'a> {
    heats: usize,
    max_lanes: usize,
    finalists: Option<usize>,
    rng_seed: u64,
    manual: &'a [ManualPlacement],
}

struct Split {
    heats: Vec<Vec<RankedEntrant>>,
    byes: Vec<RankedEntrant>,
}

impl Split {
    const fn heats(heats: Vec<Vec<RankedEntrant>>) -> Self {
        Self {
            heats,
            byes: Vec::new(),
        }
    }
}

type SeriesFn = fn(Vec<RankedEntrant>, &Layout<'_>) -> Result<Split, SeedingError>;

/// Strategy table: one pure function per series method.
const STRATEGIES: &[(SeriesMethod, SeriesFn)] = &[
    (SeriesMethod::Manual, manual),
    (SeriesMethod::SeedTime, seed_time),
    (SeriesMethod::Random, random),
    (SeriesMethod::Serpentine, serpentine),
    (SeriesMethod::StraightFinal, straight_final),
    (SeriesMethod::AlphabeticalNumber, alphabetical_number),
    (SeriesMethod::AlphabeticalName, alphabetical_name),
    (SeriesMethod::RoundRobin, cyclic),
    (SeriesMethod::Zigzag, cyclic),
    (SeriesMethod::ByResult, serpentine),
    (SeriesMethod::ByResultIndoor, serpentine),
    (SeriesMethod::BestToWorst, best_to_worst),
    (SeriesMethod::WorstToBest, worst_to_best),
    (SeriesMethod::HalfAndHalf, half_and_half),
    (SeriesMethod::Pairs, serpentine),
    (SeriesMethod::PairsIndoor, serpentine),
    (SeriesMethod::StandardOutside, serpentine),
    (SeriesMethod::StandardInside, serpentine),
    (SeriesMethod::Waterfall, serpentine),
    (SeriesMethod::WaterfallReverse, serpentine),
    (SeriesMethod::WaHalvesAndPairs, serpentine),
    (SeriesMethod::WaSprintsStraight, serpentine),
    (SeriesMethod::Wa200m, serpentine),
    (SeriesMethod::Wa400m800m, serpentine),
    (SeriesMethod::Wa9Lanes, serpentine),
];

fn strategy(method: SeriesMethod) -> Result<SeriesFn, SeedingError> {
    STRATEGIES
        .iter()
        .find(|(m, _)| *m == method)
        .map(|(_, f)| *f)
        .ok_or_else(|| {
            SeedingError::validation("series_method", format!("no strategy for '{method}'"))
        })
}

/// Split a ranked field into heats.
///
/// The heat count is `heats_count`, or `ceil(entrants / max_lanes)` when
/// absent. `straight_final` always builds one heat of
/// `min(entrants, finalists_count ?? max_lanes)` and returns the rest as byes.
/// `manual` takes its heat count from the placements.
///
/// # Errors
///
/// - `Validation` for `max_lanes == 0`, `heats_count == 0`, more heats than
///   entrants, `finalists_count == 0`, or an invalid manual plan.
/// - `Capacity` when `heats * max_lanes < entrants`, or when a final or a
///   manual heat holds more entrants than lanes.
pub fn distribute(
    ranked: Vec<RankedEntrant>,
    method: SeriesMethod,
    params: &DistributionParams<'_>,
) -> Result<Distribution, SeedingError> {
    if params.max_lanes == 0 {
        return Err(SeedingError::validation("max_lanes", "must be positive"));
    }
    if params.heats_count == Some(0) {
        return Err(SeedingError::validation("heats_count", "must be positive"));
    }
    if params.finalists_count == Some(0) {
        return Err(SeedingError::validation("finalists_count", "must be positive"));
    }

    let entrants = ranked.len();
    if entrants == 0 {
        return Ok(Distribution {
            method,
            heats: Vec::new(),
            byes: Vec::new(),
        });
    }

    let max_lanes = params.max_lanes as usize;
    let heats = match method {
        SeriesMethod::StraightFinal | SeriesMethod::Manual => 1,
        _ => {
            let heats = params
                .heats_count
                .map_or_else(|| entrants.div_ceil(max_lanes), |h| h as usize);
            if heats > entrants {
                return Err(SeedingError::validation(
                    "heats_count",
                    format!("{heats} heats for {entrants} entrants would leave a heat empty"),
                ));
            }
            if heats * max_lanes < entrants {
                return Err(SeedingError::Capacity {
                    entrants,
                    capacity: heats * max_lanes,
                    context: format!("{heats} heats x {max_lanes} lanes, method {method}"),
                });
            }
            heats
        }
    };

    let layout = Layout {
        heats,
        max_lanes,
        finalists: params.finalists_count.map(|f| f as usize),
        rng_seed: params.rng_seed,
        manual: params.manual,
    };
    let run = strategy(method)?;
    let split = run(ranked, &layout)?;

    let distribution = Distribution {
        method,
        heats: (1u32..)
            .zip(split.heats)
            .map(|(heat_number, entrants)| HeatGroup {
                heat_number,
                entrants,
            })
            .collect(),
        byes: split.byes,
    };
    debug_assert_eq!(distribution.entrant_count(), entrants);
    debug_assert!(distribution.heats.iter().all(|h| !h.entrants.is_empty()));

    tracing::debug!(
        method = %method,
        heats = distribution.heats.len(),
        entrants,
        byes = distribution.byes.len(),
        "distributed field"
    );
    Ok(distribution)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Sizes for `heats` contiguous blocks differing by at most one, larger first.
fn balanced_sizes(entrants: usize, heats: usize) -> Vec<usize> {
    let base = entrants / heats;
    let extra = entrants % heats;
    (0..heats).map(|h| base + usize::from(h < extra)).collect()
}

fn split_by_sizes(entrants: Vec<RankedEntrant>, sizes: &[usize]) -> Vec<Vec<RankedEntrant>> {
    let mut rest = entrants.into_iter();
    sizes
        .iter()
        .map(|&size| rest.by_ref().take(size).collect())
        .collect()
}

fn contiguous(entrants: Vec<RankedEntrant>, heats: usize) -> Vec<Vec<RankedEntrant>> {
    let sizes = balanced_sizes(entrants.len(), heats);
    split_by_sizes(entrants, &sizes)
}

fn deal(
    entrants: Vec<RankedEntrant>,
    heats: usize,
    heat_for: impl Fn(usize) -> usize,
) -> Vec<Vec<RankedEntrant>> {
    let mut groups = vec![Vec::new(); heats];
    for (index, entrant) in entrants.into_iter().enumerate() {
        groups[heat_for(index)].push(entrant);
    }
    groups
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Boustrophedon: 1..H forwards, then H..1, and so on.
fn serpentine(entrants: Vec<RankedEntrant>, layout: &Layout<'_>) -> Result<Split, SeedingError> {
    let heats = layout.heats;
    Ok(Split::heats(deal(entrants, heats, |i| {
        let pass = i / heats;
        let offset = i % heats;
        if pass % 2 == 0 { offset } else { heats - 1 - offset }
    })))
}

fn cyclic(entrants: Vec<RankedEntrant>, layout: &Layout<'_>) -> Result<Split, SeedingError> {
    let heats = layout.heats;
    Ok(Split::heats(deal(entrants, heats, |i| i % heats)))
}

fn best_to_worst(entrants: Vec<RankedEntrant>, layout: &Layout<'_>) -> Result<Split, SeedingError> {
    Ok(Split::heats(contiguous(entrants, layout.heats)))
}

fn worst_to_best(entrants: Vec<RankedEntrant>, layout: &Layout<'_>) -> Result<Split, SeedingError> {
    let mut blocks = contiguous(entrants, layout.heats);
    blocks.reverse();
    Ok(Split::heats(blocks))
}

/// Fastest heat last. Heats are filled to capacity from the last heat down;
/// each lower heat keeps at least one entrant.
fn seed_time(entrants: Vec<RankedEntrant>, layout: &Layout<'_>) -> Result<Split, SeedingError> {
    let heats = layout.heats;
    let mut sizes = vec![0usize; heats];
    let mut remaining = entrants.len();
    for heat in (0..heats).rev() {
        let size = if heat == 0 {
            remaining
        } else {
            layout.max_lanes.min(remaining - heat)
        };
        sizes[heat] = size;
        remaining -= size;
    }

    // Best block first, destined for the last heat.
    let fastest_first: Vec<usize> = sizes.iter().rev().copied().collect();
    let mut blocks = split_by_sizes(entrants, &fastest_first);
    blocks.reverse();
    Ok(Split::heats(blocks))
}

/// Top rank-half dealt forwards from heat 1, bottom half dealt backwards
/// from the last heat, so each heat mixes both halves.
fn half_and_half(entrants: Vec<RankedEntrant>, layout: &Layout<'_>) -> Result<Split, SeedingError> {
    let heats = layout.heats;
    let top_len = entrants.len().div_ceil(2);
    let mut groups = vec![Vec::new(); heats];
    for (index, entrant) in entrants.into_iter().enumerate() {
        let heat = if index < top_len {
            index % heats
        } else {
            heats - 1 - (index - top_len) % heats
        };
        groups[heat].push(entrant);
    }
    Ok(Split::heats(groups))
}

fn random(mut entrants: Vec<RankedEntrant>, layout: &Layout<'_>) -> Result<Split, SeedingError> {
    let mut rng = ChaCha8Rng::seed_from_u64(layout.rng_seed);
    entrants.shuffle(&mut rng);
    Ok(Split::heats(contiguous(entrants, layout.heats)))
}

/// Ordered by start number; entrants without one follow in rank order.
fn alphabetical_number(
    mut entrants: Vec<RankedEntrant>,
    layout: &Layout<'_>,
) -> Result<Split, SeedingError> {
    entrants.sort_by_key(|e| {
        let number = e.registration.start_number;
        (number.is_none(), number)
    });
    Ok(Split::heats(contiguous(entrants, layout.heats)))
}

fn alphabetical_name(
    mut entrants: Vec<RankedEntrant>,
    layout: &Layout<'_>,
) -> Result<Split, SeedingError> {
    entrants.sort_by_cached_key(|e| {
        (
            e.registration.surname.to_lowercase(),
            e.registration.first_name.to_lowercase(),
        )
    });
    Ok(Split::heats(contiguous(entrants, layout.heats)))
}

fn straight_final(
    mut entrants: Vec<RankedEntrant>,
    layout: &Layout<'_>,
) -> Result<Split, SeedingError> {
    let finalists = layout.finalists.unwrap_or(layout.max_lanes).min(entrants.len());
    if finalists > layout.max_lanes {
        return Err(SeedingError::Capacity {
            entrants: finalists,
            capacity: layout.max_lanes,
            context: "straight final larger than the lane count".into(),
        });
    }
    let byes = entrants.split_off(finalists);
    Ok(Split {
        heats: vec![entrants],
        byes,
    })
}

/// Caller-chosen heats. Every entrant needs a placement with a heat number,
/// each registration may be placed once, and heat numbers must run 1..=H.
fn manual(entrants: Vec<RankedEntrant>, layout: &Layout<'_>) -> Result<Split, SeedingError> {
    let mut wanted: HashMap<&str, u32> = HashMap::new();
    for placement in layout.manual {
        let heat = placement.heat_number.ok_or_else(|| {
            SeedingError::validation(
                "manual",
                format!("placement for {} has no heat number", placement.registration_id),
            )
        })?;
        if heat == 0 {
            return Err(SeedingError::validation(
                "manual",
                format!("heat number for {} must be positive", placement.registration_id),
            ));
        }
        if wanted.insert(placement.registration_id.as_str(), heat).is_some() {
            return Err(SeedingError::validation(
                "manual",
                format!("{} is placed more than once", placement.registration_id),
            ));
        }
    }

    let known: HashSet<&str> = entrants.iter().map(RankedEntrant::registration_id).collect();
    if let Some(stranger) = wanted.keys().find(|id| !known.contains(*id)) {
        return Err(SeedingError::validation(
            "manual",
            format!("{stranger} is not registered for this event"),
        ));
    }

    let mut by_heat: BTreeMap<u32, Vec<RankedEntrant>> = BTreeMap::new();
    for entrant in entrants {
        let heat = *wanted.get(entrant.registration_id()).ok_or_else(|| {
            SeedingError::validation(
                "manual",
                format!("{} has no placement", entrant.registration_id()),
            )
        })?;
        by_heat.entry(heat).or_default().push(entrant);
    }

    for (expected, (&heat, group)) in (1u32..).zip(&by_heat) {
        if heat != expected {
            return Err(SeedingError::validation(
                "manual",
                format!("heat numbers must be contiguous from 1; found {heat} where {expected} was expected"),
            ));
        }
        if group.len() > layout.max_lanes {
            return Err(SeedingError::Capacity {
                entrants: group.len(),
                capacity: layout.max_lanes,
                context: format!("manual heat {heat}"),
            });
        }
    }

    Ok(Split::heats(by_heat.into_values().collect()))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use heat_core::entities::Registration;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn field(n: u32) -> Vec<RankedEntrant> {
        (1..=n)
            .map(|rank| RankedEntrant {
                registration: Registration {
                    id: format!("r{rank}"),
                    event_id: "evt".into(),
                    athlete_id: format!("a{rank}"),
                    first_name: "F".into(),
                    surname: format!("S{:02}", n + 1 - rank),
                    start_number: Some(100 + (rank * 7) % n),
                    seed_mark: None,
                    created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
                },
                seed_value: Some(f64::from(rank)),
                seed_source: None,
                seed_time: None,
                seed_rank: rank,
            })
            .collect()
    }

    fn params(max_lanes: u32) -> DistributionParams<'static> {
        DistributionParams {
            max_lanes,
            heats_count: None,
            finalists_count: None,
            rng_seed: 7,
            manual: &[],
        }
    }

    fn placement(id: &str, heat: Option<u32>) -> ManualPlacement {
        ManualPlacement {
            registration_id: id.into(),
            heat_number: heat,
            lane: None,
        }
    }

    fn ranks(d: &Distribution) -> Vec<Vec<u32>> {
        d.heats
            .iter()
            .map(|h| h.entrants.iter().map(|e| e.seed_rank).collect())
            .collect()
    }

    #[test]
    fn every_method_is_registered() {
        for method in SeriesMethod::ALL {
            assert!(strategy(*method).is_ok(), "{method} has no strategy");
        }
    }

    #[test]
    fn serpentine_eighteen_into_three() {
        let d = distribute(field(18), SeriesMethod::Serpentine, &params(8)).unwrap();
        assert_eq!(
            ranks(&d),
            vec![
                vec![1, 6, 7, 12, 13, 18],
                vec![2, 5, 8, 11, 14, 17],
                vec![3, 4, 9, 10, 15, 16],
            ]
        );
    }

    #[test]
    fn round_robin_is_cyclic() {
        let d = distribute(field(7), SeriesMethod::RoundRobin, &params(4)).unwrap();
        assert_eq!(ranks(&d), vec![vec![1, 3, 5, 7], vec![2, 4, 6]]);
    }

    #[test]
    fn best_and_worst_blocks() {
        let best = distribute(field(10), SeriesMethod::BestToWorst, &params(4)).unwrap();
        assert_eq!(
            ranks(&best),
            vec![vec![1, 2, 3, 4], vec![5, 6, 7], vec![8, 9, 10]]
        );
        let worst = distribute(field(10), SeriesMethod::WorstToBest, &params(4)).unwrap();
        assert_eq!(
            ranks(&worst),
            vec![vec![8, 9, 10], vec![5, 6, 7], vec![1, 2, 3, 4]]
        );
    }

    #[test]
    fn seed_time_fills_fastest_heat_last() {
        let d = distribute(field(10), SeriesMethod::SeedTime, &params(4)).unwrap();
        assert_eq!(
            ranks(&d),
            vec![vec![9, 10], vec![5, 6, 7, 8], vec![1, 2, 3, 4]]
        );
    }

    #[test]
    fn seed_time_keeps_every_heat_populated() {
        let p = DistributionParams {
            heats_count: Some(3),
            ..params(8)
        };
        let d = distribute(field(5), SeriesMethod::SeedTime, &p).unwrap();
        assert_eq!(ranks(&d), vec![vec![5], vec![4], vec![1, 2, 3]]);
    }

    #[test]
    fn half_and_half_mixes_halves() {
        let d = distribute(field(8), SeriesMethod::HalfAndHalf, &params(4)).unwrap();
        assert_eq!(ranks(&d), vec![vec![1, 3, 6, 8], vec![2, 4, 5, 7]]);
    }

    #[test]
    fn straight_final_truncates_to_finalists() {
        let p = DistributionParams {
            finalists_count: Some(8),
            ..params(8)
        };
        let d = distribute(field(10), SeriesMethod::StraightFinal, &p).unwrap();
        assert_eq!(d.heats.len(), 1);
        assert_eq!(d.heats[0].entrants.len(), 8);
        let byes: Vec<u32> = d.byes.iter().map(|e| e.seed_rank).collect();
        assert_eq!(byes, vec![9, 10]);
    }

    #[test]
    fn straight_final_ignores_heats_count() {
        let p = DistributionParams {
            heats_count: Some(3),
            ..params(8)
        };
        let d = distribute(field(5), SeriesMethod::StraightFinal, &p).unwrap();
        assert_eq!(ranks(&d), vec![vec![1, 2, 3, 4, 5]]);
        assert!(d.byes.is_empty());
    }

    #[test]
    fn random_is_reproducible_for_a_seed() {
        let a = distribute(field(16), SeriesMethod::Random, &params(8)).unwrap();
        let b = distribute(field(16), SeriesMethod::Random, &params(8)).unwrap();
        assert_eq!(ranks(&a), ranks(&b));

        let reseeded = DistributionParams {
            rng_seed: 8,
            ..params(8)
        };
        let c = distribute(field(16), SeriesMethod::Random, &reseeded).unwrap();
        assert_ne!(ranks(&a), ranks(&c));
    }

    #[test]
    fn alphabetical_name_sorts_by_surname() {
        let d = distribute(field(4), SeriesMethod::AlphabeticalName, &params(8)).unwrap();
        // Surnames run S04..S01 for ranks 1..4.
        assert_eq!(ranks(&d), vec![vec![4, 3, 2, 1]]);
    }

    #[test]
    fn alphabetical_number_sorts_by_bib_with_missing_last() {
        let mut entrants = field(3);
        entrants[0].registration.start_number = None;
        entrants[1].registration.start_number = Some(20);
        entrants[2].registration.start_number = Some(10);
        let d = distribute(entrants, SeriesMethod::AlphabeticalNumber, &params(8)).unwrap();
        assert_eq!(ranks(&d), vec![vec![3, 2, 1]]);
    }

    #[test]
    fn manual_groups_by_requested_heat() {
        let plan = vec![
            placement("r1", Some(2)),
            placement("r2", Some(1)),
            placement("r3", Some(2)),
        ];
        let p = DistributionParams {
            manual: &plan,
            ..params(8)
        };
        let d = distribute(field(3), SeriesMethod::Manual, &p).unwrap();
        assert_eq!(ranks(&d), vec![vec![2], vec![1, 3]]);
    }

    #[rstest]
    #[case::missing(vec![("r1", Some(1))])]
    #[case::duplicate(vec![("r1", Some(1)), ("r1", Some(1)), ("r2", Some(1))])]
    #[case::gap(vec![("r1", Some(1)), ("r2", Some(3))])]
    #[case::stranger(vec![("r1", Some(1)), ("r2", Some(1)), ("r9", Some(1))])]
    #[case::no_heat(vec![("r1", Some(1)), ("r2", None)])]
    fn manual_rejects_bad_plans(#[case] entries: Vec<(&str, Option<u32>)>) {
        let plan: Vec<ManualPlacement> = entries
            .into_iter()
            .map(|(id, heat)| placement(id, heat))
            .collect();
        let p = DistributionParams {
            manual: &plan,
            ..params(8)
        };
        let err = distribute(field(2), SeriesMethod::Manual, &p).unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn insufficient_explicit_heats_is_capacity_error() {
        let p = DistributionParams {
            heats_count: Some(2),
            ..params(8)
        };
        let err = distribute(field(17), SeriesMethod::Serpentine, &p).unwrap_err();
        assert_eq!(
            err,
            SeedingError::Capacity {
                entrants: 17,
                capacity: 16,
                context: "2 heats x 8 lanes, method serpentine".into(),
            }
        );
    }

    #[rstest]
    #[case::zero_lanes(params(0))]
    #[case::zero_heats(DistributionParams { heats_count: Some(0), ..params(8) })]
    #[case::too_many_heats(DistributionParams { heats_count: Some(5), ..params(8) })]
    fn rejects_invalid_parameters(#[case] p: DistributionParams<'static>) {
        let err = distribute(field(4), SeriesMethod::Serpentine, &p).unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn empty_field_has_no_heats() {
        let d = distribute(Vec::new(), SeriesMethod::Serpentine, &params(8)).unwrap();
        assert!(d.heats.is_empty());
        assert!(d.byes.is_empty());
    }
}
