//! # heat-core
//!
//! Core types, ID prefixes, and error types for the heat and lane
//! assignment engine.
//!
//! This crate provides the foundational types shared across all `heat-*` crates:
//! - Entity structs for events, registrations, performance history, heats
//!   and heat assignments
//! - Round, unit, series-method and lane-method enums
//! - ID prefix constants
//! - The `SeedingError` taxonomy
//! - Response types returned by the generate operations

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
