//! Performance history repository.
//!
//! History is fetched once per event for every registered athlete, never
//! per athlete.

use heat_core::entities::{HistoryBatch, PerformanceRecord, group_history};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_enum, parse_optional_date};
use crate::repos::event::fetch_event;
use crate::service::HeatService;

const SELECT_COLS: &str = "athlete_id, discipline_code, kind, result, date, competition";

fn row_to_record(row: &libsql::Row) -> Result<PerformanceRecord, DatabaseError> {
    Ok(PerformanceRecord {
        athlete_id: row.get(0)?,
        discipline_code: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        result: row.get(3)?,
        date: parse_optional_date(get_opt_string(row, 4)?.as_deref())?,
        competition: get_opt_string(row, 5)?,
    })
}

pub(crate) async fn upsert_performance(
    conn: &libsql::Connection,
    record: &PerformanceRecord,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO performance_records ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(athlete_id, discipline_code, kind) DO UPDATE SET
                result = excluded.result,
                date = excluded.date,
                competition = excluded.competition"
        ),
        libsql::params![
            record.athlete_id.as_str(),
            record.discipline_code.as_str(),
            record.kind.as_str(),
            record.result.as_str(),
            record.date.map(|d| d.format("%Y-%m-%d").to_string()),
            record.competition.as_deref()
        ],
    )
    .await?;
    Ok(())
}

/// Personal and season bests of every athlete registered for `event_id`,
/// restricted to the event's discipline.
pub(crate) async fn history_for_event(
    conn: &libsql::Connection,
    event_id: &str,
    discipline_code: &str,
) -> Result<HistoryBatch, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM performance_records
                 WHERE discipline_code = ?2
                   AND athlete_id IN (SELECT athlete_id FROM registrations WHERE event_id = ?1)"
            ),
            [event_id, discipline_code],
        )
        .await?;
    let mut records = Vec::new();
    while let Some(row) = rows.next().await? {
        records.push(row_to_record(&row)?);
    }
    Ok(group_history(records))
}

impl HeatService {
    pub async fn history_for_event(
        &self,
        event_id: &str,
    ) -> Result<HistoryBatch, DatabaseError> {
        let _read = self.db().read_guard().await;
        let event = fetch_event(self.db().conn(), event_id).await?;
        history_for_event(self.db().conn(), event_id, &event.discipline_code).await
    }

    pub async fn upsert_performance(
        &self,
        record: &PerformanceRecord,
    ) -> Result<(), DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = upsert_performance(&tx, record).await;
        tx.finish(result).await
    }
}
