use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Unit;

/// Discipline metadata for one competition event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub name: String,
    /// Discipline code used to look up personal and season bests (e.g. `"100m"`).
    pub discipline_code: String,
    pub gender: Option<String>,
    pub category: Option<String>,
    /// `None` means the event cannot be ranked.
    pub unit: Option<Unit>,
    pub max_lanes: Option<u32>,
    pub max_lanes_indoor: Option<u32>,
    pub indoor: bool,
}
