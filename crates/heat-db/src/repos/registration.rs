//! Registration repository (collaborator data, read by the engine).

use heat_core::entities::Registration;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_opt_u32, parse_datetime};
use crate::service::HeatService;

const SELECT_COLS: &str =
    "id, event_id, athlete_id, first_name, surname, start_number, seed_mark, created_at";

fn row_to_registration(row: &libsql::Row) -> Result<Registration, DatabaseError> {
    Ok(Registration {
        id: row.get(0)?,
        event_id: row.get(1)?,
        athlete_id: row.get(2)?,
        first_name: row.get(3)?,
        surname: row.get(4)?,
        start_number: get_opt_u32(row, 5)?,
        seed_mark: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

pub(crate) async fn upsert_registration(
    conn: &libsql::Connection,
    registration: &Registration,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO registrations ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                event_id = excluded.event_id,
                athlete_id = excluded.athlete_id,
                first_name = excluded.first_name,
                surname = excluded.surname,
                start_number = excluded.start_number,
                seed_mark = excluded.seed_mark,
                created_at = excluded.created_at"
        ),
        libsql::params![
            registration.id.as_str(),
            registration.event_id.as_str(),
            registration.athlete_id.as_str(),
            registration.first_name.as_str(),
            registration.surname.as_str(),
            registration.start_number.map(i64::from),
            registration.seed_mark.as_deref(),
            registration.created_at.to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

/// Registrations of one event in registration order, in a single query.
pub(crate) async fn registrations_for_event(
    conn: &libsql::Connection,
    event_id: &str,
) -> Result<Vec<Registration>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM registrations
                 WHERE event_id = ?1
                 ORDER BY julianday(created_at), rowid"
            ),
            [event_id],
        )
        .await?;
    let mut registrations = Vec::new();
    while let Some(row) = rows.next().await? {
        registrations.push(row_to_registration(&row)?);
    }
    Ok(registrations)
}

impl HeatService {
    pub async fn list_registrations(
        &self,
        event_id: &str,
    ) -> Result<Vec<Registration>, DatabaseError> {
        let _read = self.db().read_guard().await;
        registrations_for_event(self.db().conn(), event_id).await
    }

    pub async fn upsert_registration(
        &self,
        registration: &Registration,
    ) -> Result<(), DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = upsert_registration(&tx, registration).await;
        tx.finish(result).await
    }
}
