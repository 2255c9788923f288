//! Lane allocation within one heat.
//!
//! Every computed lane method is a *preference order*: a permutation of
//! `1..=lanes`. The i-th entrant of a heat group takes the i-th preferred
//! lane, so the allocator never reorders entrants (tied seeds included).
//! Fixed World Athletics tables are clipped to the track's lane count and any
//! lanes they do not mention are appended center-out.
//!
//! `wa_400m_800m` also carries break-line groups for waterfall-start races
//! (800 m and up): outer lanes past the center merge in pairs after the break
//! line, see [`break_line_group`].

use std::collections::{HashMap, HashSet};

use heat_core::entities::{Event, ManualPlacement};
use heat_core::enums::LaneMethod;
use heat_core::errors::SeedingError;

use crate::resolver::RankedEntrant;

type PreferenceFn = fn(u32) -> Vec<u32>;

/// Strategy table for every lane method except `manual`.
const PREFERENCES: &[(LaneMethod, PreferenceFn)] = &[
    (LaneMethod::StandardInside, standard_inside),
    (LaneMethod::StandardOutside, standard_outside),
    (LaneMethod::Waterfall, waterfall),
    (LaneMethod::WaterfallReverse, waterfall_reverse),
    (LaneMethod::Pairs, pairs),
    (LaneMethod::PairsIndoor, pairs_indoor),
    (LaneMethod::WaHalvesAndPairs, wa_halves_and_pairs),
    (LaneMethod::WaSprintsStraight, wa_sprints_straight),
    (LaneMethod::Wa200m, wa_200m),
    (LaneMethod::Wa400m800m, wa_400m_800m),
    (LaneMethod::Wa9Lanes, wa_9_lanes),
];

/// Straight sprints: ranks 1-4 in lanes 3-6, 5-6 in 7-8, 7-8 in 1-2.
const WA_STRAIGHT_TABLE: &[u32] = &[4, 5, 3, 6, 7, 8, 2, 1];
/// Bend events: ranks 1-3 in lanes 5-7, 4-6 in 3, 4 and 8, 7-8 in 1-2.
const WA_200M_TABLE: &[u32] = &[5, 6, 7, 4, 8, 3, 2, 1];
/// Waterfall-start events: ranks 1-5 in lanes 4-8 around lane 6, then 1-3.
const WA_400M_800M_TABLE: &[u32] = &[6, 7, 5, 8, 4, 3, 2, 1];
/// Nine-lane tracks: ranks 1-3 in 4-6, 4-6 in 3, 7 and 8, 7-9 in 1, 2 and 9.
const WA_9_LANES_TABLE: &[u32] = &[5, 6, 4, 7, 3, 8, 2, 9, 1];

/// Preferred lane order for a computed method, or `None` for `manual`.
#[must_use]
pub fn preference_order(method: LaneMethod, lanes: u32) -> Option<Vec<u32>> {
    PREFERENCES
        .iter()
        .find(|(m, _)| *m == method)
        .map(|(_, f)| f(lanes))
}

/// Assign a lane to every entrant of one heat group, in group order.
///
/// `manual` is read only by [`LaneMethod::Manual`]; the lanes are returned
/// exactly as supplied.
///
/// # Errors
///
/// - `Validation` for `lanes == 0` or an incomplete, duplicated or
///   out-of-range manual map.
/// - `Capacity` if the group holds more entrants than lanes.
pub fn allocate_lanes(
    group: &[RankedEntrant],
    lanes: u32,
    method: LaneMethod,
    manual: &[ManualPlacement],
) -> Result<Vec<u32>, SeedingError> {
    if lanes == 0 {
        return Err(SeedingError::validation("max_lanes", "must be positive"));
    }
    if group.len() > lanes as usize {
        return Err(SeedingError::Capacity {
            entrants: group.len(),
            capacity: lanes as usize,
            context: format!("heat with {lanes} lanes, method {method}"),
        });
    }

    match preference_order(method, lanes) {
        Some(order) => Ok(order.into_iter().take(group.len()).collect()),
        None => manual_lanes(group, lanes, manual),
    }
}

fn manual_lanes(
    group: &[RankedEntrant],
    lanes: u32,
    manual: &[ManualPlacement],
) -> Result<Vec<u32>, SeedingError> {
    let requested: HashMap<&str, Option<u32>> = manual
        .iter()
        .map(|p| (p.registration_id.as_str(), p.lane))
        .collect();

    let mut taken = HashSet::new();
    let mut assigned = Vec::with_capacity(group.len());
    for entrant in group {
        let id = entrant.registration_id();
        let lane = requested.get(id).copied().flatten().ok_or_else(|| {
            SeedingError::validation("manual", format!("{id} has no lane"))
        })?;
        if lane == 0 || lane > lanes {
            return Err(SeedingError::validation(
                "manual",
                format!("lane {lane} for {id} is outside 1..={lanes}"),
            ));
        }
        if !taken.insert(lane) {
            return Err(SeedingError::validation(
                "manual",
                format!("lane {lane} is assigned twice"),
            ));
        }
        assigned.push(lane);
    }
    Ok(assigned)
}

/// Shortest race that starts in lanes and breaks after the first bend.
const WATERFALL_START_METRES: u32 = 800;

/// Race distance in metres for plain distance codes such as `800m` or `1500`.
/// Relay and hurdle codes give `None`.
fn distance_metres(discipline_code: &str) -> Option<u32> {
    let code = discipline_code.trim();
    let digits = code
        .strip_suffix('m')
        .or_else(|| code.strip_suffix('M'))
        .unwrap_or(code);
    digits.parse().ok()
}

/// Whether `event` is a waterfall-start race.
#[must_use]
pub fn is_waterfall_start(event: &Event) -> bool {
    distance_metres(&event.discipline_code).is_some_and(|m| m >= WATERFALL_START_METRES)
}

/// Outer lanes that merge in pairs past the break line, inner pair first.
///
/// Pairs are formed from the outermost lane inward over the lanes outside the
/// center; a lane left over next to the center stays on its own.
#[must_use]
pub fn break_line_pairs(lanes: u32) -> Vec<(u32, u32)> {
    let first_outer = lanes - lanes / 2 + 1;
    let outer: Vec<u32> = (first_outer..=lanes).rev().collect();
    let mut pairs: Vec<(u32, u32)> = outer
        .chunks_exact(2)
        .map(|pair| (pair[1], pair[0]))
        .collect();
    pairs.reverse();
    pairs
}

/// Break-line group of `lane`, numbered from 1 at the innermost pair.
///
/// Only `wa_400m_800m` on a waterfall-start event has groups; every other
/// method and lane gives `None`.
#[must_use]
pub fn break_line_group(method: LaneMethod, event: &Event, lanes: u32, lane: u32) -> Option<u32> {
    if method != LaneMethod::Wa400m800m || !is_waterfall_start(event) {
        return None;
    }
    break_line_pairs(lanes)
        .iter()
        .position(|&(inner, outer)| lane == inner || lane == outer)
        .and_then(|index| u32::try_from(index + 1).ok())
}

// ---------------------------------------------------------------------------
// Preference orders
// ---------------------------------------------------------------------------

fn standard_inside(lanes: u32) -> Vec<u32> {
    (1..=lanes).collect()
}

fn standard_outside(lanes: u32) -> Vec<u32> {
    (1..=lanes).rev().collect()
}

/// 1, n, 2, n-1, ...
fn waterfall(lanes: u32) -> Vec<u32> {
    let mut order = Vec::with_capacity(lanes as usize);
    let (mut low, mut high) = (1, lanes);
    while low <= high {
        order.push(low);
        if low != high {
            order.push(high);
        }
        low += 1;
        high -= 1;
    }
    order
}

/// n, 1, n-1, 2, ...
fn waterfall_reverse(lanes: u32) -> Vec<u32> {
    let mut order = Vec::with_capacity(lanes as usize);
    let (mut low, mut high) = (1, lanes);
    while low <= high {
        order.push(high);
        if low != high {
            order.push(low);
        }
        low += 1;
        high -= 1;
    }
    order
}

/// Lanes sorted by distance from the center, shifted `shift` lanes outward.
/// Ties go to the inner lane.
fn center_out(lanes: u32, shift: i64) -> Vec<u32> {
    let doubled_center = i64::from(lanes) + 1 + 2 * shift;
    let mut order: Vec<u32> = (1..=lanes).collect();
    order.sort_by_key(|&lane| ((2 * i64::from(lane) - doubled_center).abs(), lane));
    order
}

fn with_table(table: &[u32], lanes: u32, shift: i64) -> Vec<u32> {
    let mut order: Vec<u32> = table.iter().copied().filter(|&l| l <= lanes).collect();
    for lane in center_out(lanes, shift) {
        if !order.contains(&lane) {
            order.push(lane);
        }
    }
    order
}

fn lane_pairs(lanes: u32) -> Vec<Vec<u32>> {
    (1..=lanes)
        .collect::<Vec<_>>()
        .chunks(2)
        .map(<[u32]>::to_vec)
        .collect()
}

/// Doubled distance between a pair's midpoint and the track center.
fn pair_distance(pair: &[u32], lanes: u32) -> i64 {
    let first = pair.first().copied().unwrap_or_default();
    let last = pair.last().copied().unwrap_or_default();
    (i64::from(first) + i64::from(last) - i64::from(lanes) - 1).abs()
}

/// Adjacent pairs center-first (inner pair on ties), inner lane of each pair first.
fn pairs(lanes: u32) -> Vec<u32> {
    let mut pairs = lane_pairs(lanes);
    pairs.sort_by_key(|p| (pair_distance(p, lanes), p.first().copied()));
    pairs.into_iter().flatten().collect()
}

/// Adjacent pairs center-first (outer pair on ties), outer lane of each pair
/// first; tight indoor bends favour the outside.
fn pairs_indoor(lanes: u32) -> Vec<u32> {
    let mut pairs = lane_pairs(lanes);
    pairs.sort_by_key(|p| {
        (
            pair_distance(p, lanes),
            std::cmp::Reverse(p.first().copied()),
        )
    });
    pairs.into_iter().flat_map(|p| p.into_iter().rev()).collect()
}

/// Upper half of the field in the outer half of the track, lower half inside,
/// both filled pairwise from the half-way line, outer lane of a pair first.
fn wa_halves_and_pairs(lanes: u32) -> Vec<u32> {
    let inner = lanes / 2;
    let outer: Vec<u32> = (inner + 1..=lanes).collect();
    let inside: Vec<u32> = (1..=inner).rev().collect();

    let mut order: Vec<u32> = outer
        .chunks(2)
        .flat_map(|pair| pair.iter().rev().copied())
        .collect();
    order.extend(inside.chunks(2).flatten().copied());
    order
}

fn wa_sprints_straight(lanes: u32) -> Vec<u32> {
    with_table(WA_STRAIGHT_TABLE, lanes, 0)
}

fn wa_200m(lanes: u32) -> Vec<u32> {
    with_table(WA_200M_TABLE, lanes, 1)
}

fn wa_400m_800m(lanes: u32) -> Vec<u32> {
    with_table(WA_400M_800M_TABLE, lanes, 1)
}

fn wa_9_lanes(lanes: u32) -> Vec<u32> {
    with_table(WA_9_LANES_TABLE, lanes, 0)
}
