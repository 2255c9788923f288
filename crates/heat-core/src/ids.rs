//! ID prefix constants for persisted heat-sheet rows.
//!
//! IDs are generated by `heat-db` as `{prefix}-{8 hex chars}`.

/// Prefix for `heats` rows.
pub const PREFIX_HEAT: &str = "hea";

/// Prefix for `heat_assignments` rows.
pub const PREFIX_ASSIGNMENT: &str = "hta";

/// Every prefix the writer may hand out.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_HEAT, PREFIX_ASSIGNMENT];
