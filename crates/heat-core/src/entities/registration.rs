use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An athlete entered in an event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub athlete_id: String,
    pub first_name: String,
    pub surname: String,
    /// Bib number, used by `alphabetical_number`.
    pub start_number: Option<u32>,
    /// Declared qualifying mark, as entered (`"10.95"`, `"1:52.30"`, `"7,45"`).
    pub seed_mark: Option<String>,
    pub created_at: DateTime<Utc>,
}
