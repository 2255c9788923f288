//! Service layer: the assignment writer.
//!
//! `HeatService` wraps `HeatDb` (raw database access), the per-sheet locks and
//! the seeding defaults. All repo methods are implemented as
//! `impl HeatService` blocks under [`crate::repos`].

use heat_config::SeedingConfig;
use heat_seeding::LaneDefaults;

use crate::HeatDb;
use crate::error::DatabaseError;
use crate::locks::SheetLocks;

/// Every sheet mutation follows the same protocol:
/// 1. Acquire the (event, round) lock
/// 2. Read inputs and compute the result; fail here with nothing written
/// 3. `BEGIN IMMEDIATE`, write, `COMMIT` (or `ROLLBACK` on any error)
pub struct HeatService {
    db: HeatDb,
    locks: SheetLocks,
    seeding: SeedingConfig,
}

impl HeatService {
    /// Create a service over a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, seeding: SeedingConfig) -> Result<Self, DatabaseError> {
        let db = HeatDb::open_local(db_path).await?;
        Ok(Self::from_db(db, seeding))
    }

    #[must_use]
    pub fn from_db(db: HeatDb, seeding: SeedingConfig) -> Self {
        Self {
            db,
            locks: SheetLocks::new(),
            seeding,
        }
    }

    #[must_use]
    pub const fn db(&self) -> &HeatDb {
        &self.db
    }

    #[must_use]
    pub const fn seeding(&self) -> &SeedingConfig {
        &self.seeding
    }

    pub(crate) const fn locks(&self) -> &SheetLocks {
        &self.locks
    }

    pub(crate) const fn lane_defaults(&self) -> LaneDefaults {
        LaneDefaults {
            outdoor: self.seeding.default_max_lanes,
            indoor: self.seeding.default_max_lanes_indoor,
        }
    }
}
