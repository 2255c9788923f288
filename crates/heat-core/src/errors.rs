//! Error taxonomy for seeding, distribution and lane allocation.
//!
//! Persistence errors (`DatabaseError`) live in `heat-db` and wrap
//! `SeedingError` so callers receive one structured failure.

use thiserror::Error;

/// Errors raised while ranking entrants and building a heat sheet.
///
/// `Parse` is the only recoverable kind: the resolver demotes the entrant to
/// unseeded and reports the error as a warning. Every other kind aborts the
/// whole generate call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedingError {
    /// A request parameter or manual plan is invalid.
    #[error("Validation error on '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// Entrants exceed the available lanes or heats.
    #[error("Capacity exceeded: {entrants} entrants for {capacity} slots ({context})")]
    Capacity {
        entrants: usize,
        capacity: usize,
        context: String,
    },

    /// Event metadata needed for ranking is missing.
    #[error("Configuration error on event {event_id}: missing {missing}")]
    Configuration { event_id: String, missing: String },

    /// A seed, personal-best or season-best mark could not be parsed.
    #[error("Unparseable mark '{mark}': {reason}")]
    Parse { mark: String, reason: String },
}

impl SeedingError {
    /// Shorthand for a `Validation` error.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a `Parse` error.
    pub fn parse(mark: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            mark: mark.into(),
            reason: reason.into(),
        }
    }

    /// Stable kind tag, used in CLI output and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Capacity { .. } => "capacity",
            Self::Configuration { .. } => "configuration",
            Self::Parse { .. } => "parse",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_field() {
        let err = SeedingError::validation("max_lanes", "must be positive");
        assert_eq!(
            err.to_string(),
            "Validation error on 'max_lanes': must be positive"
        );
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn capacity_display() {
        let err = SeedingError::Capacity {
            entrants: 17,
            capacity: 16,
            context: "2 heats x 8 lanes".into(),
        };
        assert_eq!(
            err.to_string(),
            "Capacity exceeded: 17 entrants for 16 slots (2 heats x 8 lanes)"
        );
    }
}
