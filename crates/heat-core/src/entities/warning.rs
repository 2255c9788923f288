use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::MarkSource;

/// A mark that could not be parsed. The entrant fell back to the next source
/// or was left unseeded.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SeedWarning {
    pub registration_id: String,
    pub source: MarkSource,
    pub mark: String,
    pub reason: String,
}
