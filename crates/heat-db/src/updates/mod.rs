//! Update builder types for heat mutations.
//!
//! A builder produces an update struct with `Option` fields. Only `Some`
//! fields generate SET clauses in the dynamic UPDATE SQL; `Some(None)` clears
//! a nullable column.

pub mod heat;
