//! Repository modules.
//!
//! Each module adds methods to `HeatService` via `impl HeatService` blocks.
//! `event`, `registration` and `performance` read collaborator data;
//! `heat` and `generate` own the heat-sheet tables.

pub mod event;
pub mod generate;
pub mod heat;
pub mod import;
pub mod performance;
pub mod registration;
