//! # heat-seeding
//!
//! Pure, synchronous heat-sheet algorithms:
//! - [`marks`]: parsing and formatting of `MM:SS.ss` / decimal marks
//! - [`resolver`]: best-available qualifying mark and field ranking
//! - [`distributor`]: series methods splitting the ranked field into heats
//! - [`lanes`]: lane methods mapping each heat group onto lane numbers
//! - [`plan`]: composition of the three into a persistable [`plan::HeatPlan`]
//!
//! Nothing here touches storage. `heat-db` feeds in events, registrations
//! and the performance-history batch, then writes the resulting plan.

pub mod distributor;
pub mod lanes;
pub mod marks;
pub mod plan;
pub mod resolver;

pub use distributor::{Distribution, DistributionParams, HeatGroup, distribute};
pub use lanes::{allocate_lanes, break_line_group, is_waterfall_start, preference_order};
pub use plan::{
    HeatPlan, LaneDefaults, PlanRequest, PlannedHeat, PlannedSlot, build_plan, resolve_lane_count,
};
pub use resolver::{RankedEntrant, SeedOutcome, resolve_seeds};
