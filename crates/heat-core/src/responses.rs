//! Response types returned by the generate operations and printed by `heats`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{HeatWithAssignments, SeedWarning};
use crate::enums::{LaneMethod, Round, SeriesMethod};

/// A committed heat sheet plus the warnings collected while seeding.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GeneratedSheet {
    pub event_id: String,
    pub round: Round,
    pub series_method: SeriesMethod,
    pub lane_method: LaneMethod,
    /// Seed of the shuffle, present only for `random`.
    pub rng_seed: Option<u64>,
    pub heats: Vec<HeatWithAssignments>,
    pub warnings: Vec<SeedWarning>,
}

impl GeneratedSheet {
    /// Total number of assignment rows, byes included.
    #[must_use]
    pub fn entrant_count(&self) -> usize {
        self.heats.iter().map(|h| h.assignments.len()).sum()
    }

    /// Projection `(heat_number, lane) -> registration_id` over placed rows,
    /// sorted. Two sheets with equal projections are content-equal even when
    /// their row ids differ.
    #[must_use]
    pub fn lane_map(&self) -> Vec<(u32, u32, String)> {
        let mut map: Vec<(u32, u32, String)> = self
            .heats
            .iter()
            .flat_map(|h| {
                h.placed().filter_map(move |a| {
                    a.lane
                        .map(|lane| (h.heat.heat_number, lane, a.registration_id.clone()))
                })
            })
            .collect();
        map.sort();
        map
    }
}
