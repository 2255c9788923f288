use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Event, PerformanceRecord, Registration};

/// Collaborator data loaded in one go, e.g. from an entry-list export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompetitionBundle {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub registrations: Vec<Registration>,
    #[serde(default)]
    pub performances: Vec<PerformanceRecord>,
}

impl CompetitionBundle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.registrations.is_empty() && self.performances.is_empty()
    }
}
