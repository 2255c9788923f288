//! Entity structs for the heat-sheet domain.
//!
//! `Event`, `Registration` and `PerformanceRecord` are owned by collaborator
//! components and are read-only here. `Heat`, `HeatAssignment` and
//! `HeatGeneration` are written exclusively by the assignment writer.
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod bundle;
mod event;
mod heat;
mod manual;
mod performance;
mod registration;
mod warning;

pub use bundle::CompetitionBundle;
pub use event::Event;
pub use heat::{Heat, HeatAssignment, HeatGeneration, HeatWithAssignments};
pub use manual::{LaneAssignment, ManualPlacement};
pub use performance::{AthleteHistory, HistoryBatch, PerformanceRecord, group_history};
pub use registration::Registration;
pub use warning::SeedWarning;
