//! Composition of resolver, distributor and lane allocator into a heat plan.
//!
//! A [`HeatPlan`] is everything the writer needs to persist a sheet: heats in
//! order, each with its lane slots, and byes kept on heat 1 without a lane.

use heat_core::entities::{Event, HistoryBatch, ManualPlacement, Registration, SeedWarning};
use heat_core::enums::{LaneMethod, SeedingCriteria, SeriesMethod};
use heat_core::errors::SeedingError;

use crate::distributor::{DistributionParams, distribute};
use crate::lanes::{allocate_lanes, break_line_group};
use crate::resolver::{RankedEntrant, resolve_seeds};

/// Fallback lane counts when neither the request nor the event names one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneDefaults {
    pub outdoor: u32,
    pub indoor: u32,
}

impl Default for LaneDefaults {
    fn default() -> Self {
        Self {
            outdoor: 8,
            indoor: 6,
        }
    }
}

/// Lane count for an event.
///
/// Indoor events read `max_lanes_indoor` first. An explicit request value
/// wins over the event column, which wins over the configured default.
#[must_use]
pub fn resolve_lane_count(
    event: &Event,
    max_lanes: Option<u32>,
    max_lanes_indoor: Option<u32>,
    defaults: LaneDefaults,
) -> u32 {
    if event.indoor {
        max_lanes_indoor
            .or(max_lanes)
            .or(event.max_lanes_indoor)
            .unwrap_or(defaults.indoor)
    } else {
        max_lanes.or(event.max_lanes).unwrap_or(defaults.outdoor)
    }
}

/// Parameters of one generation, after lane count and seed are settled.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub series_method: SeriesMethod,
    pub lane_method: LaneMethod,
    pub max_lanes: u32,
    pub heats_count: Option<u32>,
    pub finalists_count: Option<u32>,
    pub criteria: SeedingCriteria,
    pub rng_seed: u64,
    pub manual: &'a [ManualPlacement],
}

/// One row of the sheet. Byes carry no lane and `is_present == false`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSlot {
    pub entrant: RankedEntrant,
    pub lane: Option<u32>,
    pub break_group: Option<u32>,
    pub is_present: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedHeat {
    pub heat_number: u32,
    pub slots: Vec<PlannedSlot>,
}

impl PlannedHeat {
    pub fn placed(&self) -> impl Iterator<Item = &PlannedSlot> {
        self.slots.iter().filter(|s| s.is_present)
    }
}

/// A computed, not yet persisted, heat sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatPlan {
    pub series_method: SeriesMethod,
    pub lane_method: LaneMethod,
    pub max_lanes: u32,
    pub heats: Vec<PlannedHeat>,
    pub warnings: Vec<SeedWarning>,
}

impl HeatPlan {
    #[must_use]
    pub fn entrant_count(&self) -> usize {
        self.heats.iter().map(|h| h.slots.len()).sum()
    }

    #[must_use]
    pub fn bye_count(&self) -> usize {
        self.heats
            .iter()
            .flat_map(|h| &h.slots)
            .filter(|s| !s.is_present)
            .count()
    }
}

/// Rank, distribute and lane the field of one event round.
///
/// Pure: the same inputs always give the same plan.
///
/// # Errors
///
/// Propagates `Configuration`, `Validation` and `Capacity` failures from the
/// three stages. Unparseable marks are not errors; they come back in
/// [`HeatPlan::warnings`].
pub fn build_plan(
    event: &Event,
    registrations: &[Registration],
    history: &HistoryBatch,
    request: &PlanRequest<'_>,
) -> Result<HeatPlan, SeedingError> {
    let outcome = resolve_seeds(event, registrations, history, request.criteria)?;

    let params = DistributionParams {
        max_lanes: request.max_lanes,
        heats_count: request.heats_count,
        finalists_count: request.finalists_count,
        rng_seed: request.rng_seed,
        manual: request.manual,
    };
    let distribution = distribute(outcome.ranked, request.series_method, &params)?;

    let mut heats = Vec::with_capacity(distribution.heats.len());
    for group in distribution.heats {
        let lanes = allocate_lanes(
            &group.entrants,
            request.max_lanes,
            request.lane_method,
            request.manual,
        )?;
        let slots = group
            .entrants
            .into_iter()
            .zip(lanes)
            .map(|(entrant, lane)| PlannedSlot {
                entrant,
                lane: Some(lane),
                break_group: break_line_group(
                    request.lane_method,
                    event,
                    request.max_lanes,
                    lane,
                ),
                is_present: true,
            })
            .collect();
        heats.push(PlannedHeat {
            heat_number: group.heat_number,
            slots,
        });
    }

    if let Some(first) = heats.first_mut() {
        first
            .slots
            .extend(distribution.byes.into_iter().map(|entrant| PlannedSlot {
                entrant,
                lane: None,
                break_group: None,
                is_present: false,
            }));
    }

    let plan = HeatPlan {
        series_method: request.series_method,
        lane_method: request.lane_method,
        max_lanes: request.max_lanes,
        heats,
        warnings: outcome.warnings,
    };
    tracing::debug!(
        event_id = %event.id,
        series_method = %plan.series_method,
        lane_method = %plan.lane_method,
        max_lanes = plan.max_lanes,
        heats = plan.heats.len(),
        entrants = plan.entrant_count(),
        byes = plan.bye_count(),
        "built heat plan"
    );
    Ok(plan)
}
