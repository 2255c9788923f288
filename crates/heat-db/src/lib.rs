//! # heat-db
//!
//! libSQL persistence for the heat and lane assignment engine.
//!
//! Reads the collaborator tables (`events`, `registrations`,
//! `performance_records`) and owns the heat-sheet tables (`heats`,
//! `heat_assignments`, `heat_generations`). [`service::HeatService`] is the
//! assignment writer: every sheet mutation is one `IMMEDIATE` transaction
//! scoped to a single (event, round).
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29).

pub mod error;
pub mod helpers;
pub mod locks;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

use std::ops::Deref;

use error::DatabaseError;
use libsql::{Builder, TransactionBehavior};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Central database handle.
///
/// Wraps a libSQL database and its single connection. A connection carries
/// at most one open transaction, so writers go through [`HeatDb::begin_write`],
/// which also excludes readers holding [`HeatDb::read_guard`].
pub struct HeatDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    gate: RwLock<()>,
}

impl HeatDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let heat_db = Self {
            db,
            conn,
            gate: RwLock::new(()),
        };
        heat_db.run_migrations().await?;
        tracing::debug!(path, "opened heat database");
        Ok(heat_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g. `"hea-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        helpers::generate_id(&self.conn, prefix).await
    }

    /// Shared access for multi-statement reads that must not interleave with
    /// an open write transaction.
    pub async fn read_guard(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().await
    }

    /// Start a `BEGIN IMMEDIATE` transaction.
    ///
    /// Finish the returned [`WriteTx`] with `commit` or `rollback`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the transaction cannot start.
    pub async fn begin_write(&self) -> Result<WriteTx<'_>, DatabaseError> {
        let gate = self.gate.write().await;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        Ok(WriteTx { tx, _gate: gate })
    }
}

/// An open write transaction plus exclusive use of the connection.
pub struct WriteTx<'a> {
    // Declared first so the transaction closes before the gate opens.
    tx: libsql::Transaction,
    _gate: RwLockWriteGuard<'a, ()>,
}

impl WriteTx<'_> {
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if `COMMIT` fails.
    pub async fn commit(self) -> Result<(), DatabaseError> {
        let Self { tx, _gate: gate } = self;
        tx.commit().await?;
        drop(gate);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if `ROLLBACK` fails.
    pub async fn rollback(self) -> Result<(), DatabaseError> {
        let Self { tx, _gate: gate } = self;
        tx.rollback().await?;
        drop(gate);
        Ok(())
    }
}

impl WriteTx<'_> {
    /// Commit on `Ok`, roll back on `Err`, and pass the result through.
    ///
    /// # Errors
    ///
    /// Returns the original error, or the `COMMIT` failure.
    pub async fn finish<T>(self, result: Result<T, DatabaseError>) -> Result<T, DatabaseError> {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback) = self.rollback().await {
                    tracing::error!(%rollback, "rollback failed");
                }
                Err(error)
            }
        }
    }
}

impl Deref for WriteTx<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> HeatDb {
        HeatDb::open_local(":memory:").await.unwrap()
    }

    async fn table_exists(db: &HeatDb, table: &str) -> bool {
        let mut rows = db
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
            )
            .await
            .unwrap();
        rows.next().await.unwrap().is_some()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        for table in [
            "events",
            "registrations",
            "performance_records",
            "heats",
            "heat_assignments",
            "heat_generations",
        ] {
            assert!(table_exists(&db, table).await, "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        for prefix in heat_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")), "{id}");
            assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");
            assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn rolled_back_write_leaves_no_rows() {
        let db = test_db().await;
        let tx = db.begin_write().await.unwrap();
        tx.execute(
            "INSERT INTO events (id, name, discipline_code) VALUES ('evt-x', 'X', '60m')",
            (),
        )
        .await
        .unwrap();
        tx.rollback().await.unwrap();

        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM events", ())
            .await
            .unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn committed_write_is_visible() {
        let db = test_db().await;
        let tx = db.begin_write().await.unwrap();
        tx.execute(
            "INSERT INTO events (id, name, discipline_code) VALUES ('evt-y', 'Y', '60m')",
            (),
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let _read = db.read_guard().await;
        let mut rows = db
            .conn()
            .query("SELECT name FROM events WHERE id = 'evt-y'", ())
            .await
            .unwrap();
        let name: String = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(name, "Y");
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = test_db().await;
        let err = db
            .conn()
            .execute(
                "INSERT INTO registrations (id, event_id, athlete_id, first_name, surname) \
                 VALUES ('reg-1', 'missing', 'ath-1', 'A', 'B')",
                (),
            )
            .await;
        assert!(err.is_err());
    }
}
