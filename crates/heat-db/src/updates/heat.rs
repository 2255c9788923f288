//! Heat detail update builder.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Editable heat details. Lanes and membership change only through the
/// generate and create-heat operations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeatUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl HeatUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.scheduled_time.is_none() && self.notes.is_none()
    }
}

#[derive(Debug, Default)]
pub struct HeatUpdateBuilder(HeatUpdate);

impl HeatUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(HeatUpdate::default())
    }

    #[must_use]
    pub fn scheduled_time(mut self, scheduled_time: Option<DateTime<Utc>>) -> Self {
        self.0.scheduled_time = Some(scheduled_time);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.0.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn build(self) -> HeatUpdate {
        self.0
    }
}
