use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{LaneMethod, Round, SeriesMethod};

/// One race group within a round, identified by (event, round, heat number).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Heat {
    pub id: String,
    pub event_id: String,
    pub heat_number: u32,
    pub round: Round,
    pub max_lanes: u32,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A registration placed in a heat. `is_present == false` marks a bye:
/// the entrant is kept on the sheet without a lane.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HeatAssignment {
    pub id: String,
    pub heat_id: String,
    pub registration_id: String,
    pub lane: Option<u32>,
    /// Break-line group for waterfall-start races: paired outer lanes share
    /// one number and merge after the break line.
    pub break_group: Option<u32>,
    pub seed_time: Option<String>,
    pub seed_rank: Option<u32>,
    pub assignment_method: SeriesMethod,
    pub is_present: bool,
}

/// A heat together with its assignment rows, ordered by lane (byes last).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HeatWithAssignments {
    #[serde(flatten)]
    pub heat: Heat,
    pub assignments: Vec<HeatAssignment>,
}

impl HeatWithAssignments {
    /// Assignments that occupy a lane.
    pub fn placed(&self) -> impl Iterator<Item = &HeatAssignment> {
        self.assignments.iter().filter(|a| a.is_present)
    }

    /// Assignments kept as byes.
    pub fn byes(&self) -> impl Iterator<Item = &HeatAssignment> {
        self.assignments.iter().filter(|a| !a.is_present)
    }
}

/// Methods and RNG seed of the last generation for an (event, round).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HeatGeneration {
    pub event_id: String,
    pub round: Round,
    pub series_method: SeriesMethod,
    pub lane_method: LaneMethod,
    pub rng_seed: Option<u64>,
    pub generated_at: DateTime<Utc>,
}
