//! Event repository (collaborator data, read by the engine).

use heat_core::entities::Event;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_enum, get_opt_string, get_opt_u32};
use crate::service::HeatService;

const SELECT_COLS: &str =
    "id, name, discipline_code, gender, category, unit, max_lanes, max_lanes_indoor, indoor";

fn row_to_event(row: &libsql::Row) -> Result<Event, DatabaseError> {
    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        discipline_code: row.get(2)?,
        gender: get_opt_string(row, 3)?,
        category: get_opt_string(row, 4)?,
        unit: get_opt_enum(row, 5)?,
        max_lanes: get_opt_u32(row, 6)?,
        max_lanes_indoor: get_opt_u32(row, 7)?,
        indoor: get_bool(row, 8)?,
    })
}

pub(crate) async fn upsert_event(
    conn: &libsql::Connection,
    event: &Event,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO events ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                discipline_code = excluded.discipline_code,
                gender = excluded.gender,
                category = excluded.category,
                unit = excluded.unit,
                max_lanes = excluded.max_lanes,
                max_lanes_indoor = excluded.max_lanes_indoor,
                indoor = excluded.indoor"
        ),
        libsql::params![
            event.id.as_str(),
            event.name.as_str(),
            event.discipline_code.as_str(),
            event.gender.as_deref(),
            event.category.as_deref(),
            event.unit.map(|u| u.as_str()),
            event.max_lanes.map(i64::from),
            event.max_lanes_indoor.map(i64::from),
            i64::from(event.indoor)
        ],
    )
    .await?;
    Ok(())
}

pub(crate) async fn fetch_event(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Event, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM events WHERE id = ?1"), [id])
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found("event", id))?;
    row_to_event(&row)
}

impl HeatService {
    pub async fn get_event(&self, id: &str) -> Result<Event, DatabaseError> {
        let _read = self.db().read_guard().await;
        fetch_event(self.db().conn(), id).await
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, DatabaseError> {
        let _read = self.db().read_guard().await;
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM events ORDER BY id"), ())
            .await?;
        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            events.push(row_to_event(&row)?);
        }
        Ok(events)
    }

    pub async fn upsert_event(&self, event: &Event) -> Result<(), DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = upsert_event(&tx, event).await;
        tx.finish(result).await
    }
}
