use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Caller-supplied placement for the `manual` series and lane methods.
///
/// The `manual` series method reads `heat_number`; the `manual` lane method
/// reads `lane`. Advanced mode may combine either with a computed method.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ManualPlacement {
    pub registration_id: String,
    #[serde(default)]
    pub heat_number: Option<u32>,
    #[serde(default)]
    pub lane: Option<u32>,
}

/// One row of a hand-built heat.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LaneAssignment {
    pub registration_id: String,
    pub lane: u32,
}
