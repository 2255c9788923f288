//! Heat repository: sheet reads, scoped clear, detail updates and the
//! single-heat manual override.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use heat_core::entities::{Heat, HeatAssignment, HeatWithAssignments, LaneAssignment};
use heat_core::enums::{Round, SeriesMethod};
use heat_core::errors::SeedingError;
use heat_core::ids::{PREFIX_ASSIGNMENT, PREFIX_HEAT};
use heat_seeding::resolve_lane_count;

use crate::error::DatabaseError;
use crate::helpers::{
    generate_id, get_bool, get_opt_string, get_opt_u32, get_u32, parse_datetime, parse_enum,
    parse_optional_datetime,
};
use crate::repos::event::fetch_event;
use crate::repos::registration::registrations_for_event;
use crate::service::HeatService;
use crate::updates::heat::HeatUpdate;

const HEAT_COLS: &str =
    "id, event_id, heat_number, round, max_lanes, scheduled_time, notes, created_at";

const ASSIGNMENT_COLS: &str = "a.id, a.heat_id, a.registration_id, a.lane, a.break_group, \
     a.seed_time, a.seed_rank, a.assignment_method, a.is_present";

fn row_to_heat(row: &libsql::Row) -> Result<Heat, DatabaseError> {
    Ok(Heat {
        id: row.get(0)?,
        event_id: row.get(1)?,
        heat_number: get_u32(row, 2)?,
        round: parse_enum(&row.get::<String>(3)?)?,
        max_lanes: get_u32(row, 4)?,
        scheduled_time: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        notes: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

fn row_to_assignment(row: &libsql::Row) -> Result<HeatAssignment, DatabaseError> {
    Ok(HeatAssignment {
        id: row.get(0)?,
        heat_id: row.get(1)?,
        registration_id: row.get(2)?,
        lane: get_opt_u32(row, 3)?,
        break_group: get_opt_u32(row, 4)?,
        seed_time: get_opt_string(row, 5)?,
        seed_rank: get_opt_u32(row, 6)?,
        assignment_method: parse_enum(&row.get::<String>(7)?)?,
        is_present: get_bool(row, 8)?,
    })
}

pub(crate) async fn insert_heat(conn: &libsql::Connection, heat: &Heat) -> Result<(), DatabaseError> {
    conn.execute(
        &format!("INSERT INTO heats ({HEAT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
        libsql::params![
            heat.id.as_str(),
            heat.event_id.as_str(),
            i64::from(heat.heat_number),
            heat.round.as_str(),
            i64::from(heat.max_lanes),
            heat.scheduled_time.map(|t| t.to_rfc3339()),
            heat.notes.as_deref(),
            heat.created_at.to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

pub(crate) async fn insert_assignment(
    conn: &libsql::Connection,
    assignment: &HeatAssignment,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO heat_assignments (id, heat_id, registration_id, lane, break_group, \
         seed_time, seed_rank, assignment_method, is_present) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        libsql::params![
            assignment.id.as_str(),
            assignment.heat_id.as_str(),
            assignment.registration_id.as_str(),
            assignment.lane.map(i64::from),
            assignment.break_group.map(i64::from),
            assignment.seed_time.as_deref(),
            assignment.seed_rank.map(i64::from),
            assignment.assignment_method.as_str(),
            i64::from(assignment.is_present)
        ],
    )
    .await?;
    Ok(())
}

/// Delete every heat of one (event, round); assignments cascade.
pub(crate) async fn delete_sheet(
    conn: &libsql::Connection,
    event_id: &str,
    round: Round,
) -> Result<u64, DatabaseError> {
    Ok(conn
        .execute(
            "DELETE FROM heats WHERE event_id = ?1 AND round = ?2",
            [event_id, round.as_str()],
        )
        .await?)
}

/// Lane order, byes last.
pub(crate) fn sort_assignments(assignments: &mut [HeatAssignment]) {
    assignments.sort_by_key(|a| (a.lane.is_none(), a.lane, a.seed_rank));
}

pub(crate) async fn load_sheet(
    conn: &libsql::Connection,
    event_id: &str,
    round: Round,
) -> Result<Vec<HeatWithAssignments>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {HEAT_COLS} FROM heats
                 WHERE event_id = ?1 AND round = ?2
                 ORDER BY heat_number"
            ),
            [event_id, round.as_str()],
        )
        .await?;
    let mut heats = Vec::new();
    while let Some(row) = rows.next().await? {
        heats.push(row_to_heat(&row)?);
    }

    let mut rows = conn
        .query(
            &format!(
                "SELECT {ASSIGNMENT_COLS} FROM heat_assignments a
                 JOIN heats h ON h.id = a.heat_id
                 WHERE h.event_id = ?1 AND h.round = ?2"
            ),
            [event_id, round.as_str()],
        )
        .await?;
    let mut by_heat: HashMap<String, Vec<HeatAssignment>> = HashMap::new();
    while let Some(row) = rows.next().await? {
        let assignment = row_to_assignment(&row)?;
        by_heat
            .entry(assignment.heat_id.clone())
            .or_default()
            .push(assignment);
    }

    Ok(heats
        .into_iter()
        .map(|heat| {
            let mut assignments = by_heat.remove(&heat.id).unwrap_or_default();
            sort_assignments(&mut assignments);
            HeatWithAssignments { heat, assignments }
        })
        .collect())
}

async fn fetch_heat(conn: &libsql::Connection, id: &str) -> Result<Heat, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {HEAT_COLS} FROM heats WHERE id = ?1"), [id])
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found("heat", id))?;
    row_to_heat(&row)
}

/// Checks that depend only on the request: heat number, lane range and
/// duplicate lanes or registrations.
fn validate_manual_heat(
    heat_number: u32,
    max_lanes: u32,
    assignments: &[LaneAssignment],
) -> Result<(), SeedingError> {
    if heat_number == 0 {
        return Err(SeedingError::validation("heat_number", "must be at least 1"));
    }
    if max_lanes == 0 {
        return Err(SeedingError::validation("max_lanes", "must be positive"));
    }
    if assignments.len() > max_lanes as usize {
        return Err(SeedingError::Capacity {
            entrants: assignments.len(),
            capacity: max_lanes as usize,
            context: format!("heat {heat_number} with {max_lanes} lanes"),
        });
    }

    let mut lanes = HashSet::new();
    let mut registrations = HashSet::new();
    for assignment in assignments {
        if assignment.lane == 0 || assignment.lane > max_lanes {
            return Err(SeedingError::validation(
                "assignments",
                format!(
                    "lane {} for {} is outside 1..={max_lanes}",
                    assignment.lane, assignment.registration_id
                ),
            ));
        }
        if !lanes.insert(assignment.lane) {
            return Err(SeedingError::validation(
                "assignments",
                format!("lane {} is assigned twice", assignment.lane),
            ));
        }
        if !registrations.insert(assignment.registration_id.as_str()) {
            return Err(SeedingError::validation(
                "assignments",
                format!("{} is listed twice", assignment.registration_id),
            ));
        }
    }
    Ok(())
}

/// Checks against the stored sheet, run inside the write transaction.
async fn check_against_sheet(
    conn: &libsql::Connection,
    event_id: &str,
    heat_number: u32,
    round: Round,
    assignments: &[LaneAssignment],
) -> Result<(), DatabaseError> {
    let registered: HashSet<String> = registrations_for_event(conn, event_id)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();
    if let Some(stranger) = assignments
        .iter()
        .find(|a| !registered.contains(&a.registration_id))
    {
        return Err(SeedingError::validation(
            "assignments",
            format!("{} is not registered for {event_id}", stranger.registration_id),
        )
        .into());
    }

    let sheet = load_sheet(conn, event_id, round).await?;
    let highest_other = sheet
        .iter()
        .map(|h| h.heat.heat_number)
        .filter(|n| *n != heat_number)
        .max()
        .unwrap_or(0);
    if heat_number > highest_other + 1 {
        return Err(SeedingError::validation(
            "heat_number",
            format!("heat {heat_number} would leave a gap after heat {highest_other}"),
        )
        .into());
    }

    let elsewhere: HashMap<&str, u32> = sheet
        .iter()
        .filter(|h| h.heat.heat_number != heat_number)
        .flat_map(|h| {
            h.assignments
                .iter()
                .map(move |a| (a.registration_id.as_str(), h.heat.heat_number))
        })
        .collect();
    if let Some((id, other)) = assignments
        .iter()
        .find_map(|a| elsewhere.get(a.registration_id.as_str()).map(|n| (&a.registration_id, n)))
    {
        return Err(SeedingError::validation(
            "assignments",
            format!("{id} is already in heat {other} of the {round}"),
        )
        .into());
    }
    Ok(())
}

impl HeatService {
    pub async fn get_heat(&self, id: &str) -> Result<Heat, DatabaseError> {
        let _read = self.db().read_guard().await;
        fetch_heat(self.db().conn(), id).await
    }

    /// Heats of one (event, round) by number, each with its assignments in
    /// lane order and byes last. Empty when nothing has been generated.
    pub async fn get_heat_sheet(
        &self,
        event_id: &str,
        round: Round,
    ) -> Result<Vec<HeatWithAssignments>, DatabaseError> {
        let _read = self.db().read_guard().await;
        load_sheet(self.db().conn(), event_id, round).await
    }

    /// Delete one sheet and its generation metadata. Returns the number of
    /// heats removed.
    pub async fn clear_heat_sheet(&self, event_id: &str, round: Round) -> Result<u64, DatabaseError> {
        let _sheet = self.locks().acquire(event_id, round).await;

        let tx = self.db().begin_write().await?;
        let result = async {
            let removed = delete_sheet(&tx, event_id, round).await?;
            tx.execute(
                "DELETE FROM heat_generations WHERE event_id = ?1 AND round = ?2",
                [event_id, round.as_str()],
            )
            .await?;
            Ok::<_, DatabaseError>(removed)
        }
        .await;
        let removed = tx.finish(result).await?;

        tracing::info!(event_id, round = %round, heats = removed, "cleared heat sheet");
        Ok(removed)
    }

    pub async fn update_heat(&self, heat_id: &str, update: HeatUpdate) -> Result<Heat, DatabaseError> {
        if update.is_empty() {
            return self.get_heat(heat_id).await;
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref scheduled_time) = update.scheduled_time {
            sets.push(format!("scheduled_time = ?{idx}"));
            match scheduled_time {
                Some(t) => params.push(libsql::Value::Text(t.to_rfc3339())),
                None => params.push(libsql::Value::Null),
            }
            idx += 1;
        }
        if let Some(ref notes) = update.notes {
            sets.push(format!("notes = ?{idx}"));
            match notes {
                Some(n) => params.push(libsql::Value::Text(n.clone())),
                None => params.push(libsql::Value::Null),
            }
            idx += 1;
        }

        params.push(libsql::Value::Text(heat_id.to_string()));
        let sql = format!("UPDATE heats SET {} WHERE id = ?{idx}", sets.join(", "));

        let tx = self.db().begin_write().await?;
        let result: Result<Heat, DatabaseError> = async {
            let changed = tx.execute(&sql, libsql::params_from_iter(params)).await?;
            if changed == 0 {
                return Err(DatabaseError::not_found("heat", heat_id));
            }
            fetch_heat(&tx, heat_id).await
        }
        .await;
        let heat = tx.finish(result).await?;

        tracing::debug!(heat_id, ?update, "updated heat");
        Ok(heat)
    }

    /// Build or replace one heat by hand.
    ///
    /// The heat takes `heat_number` within (event, round), replacing any heat
    /// already holding that number. Lanes must be unique and within the lane
    /// count, every registration must belong to the event and sit in no other
    /// heat of the round, and the number may not leave a gap.
    pub async fn create_heat(
        &self,
        event_id: &str,
        heat_number: u32,
        round: Round,
        max_lanes: Option<u32>,
        assignments: &[LaneAssignment],
    ) -> Result<HeatWithAssignments, DatabaseError> {
        let _sheet = self.locks().acquire(event_id, round).await;

        let event = {
            let _read = self.db().read_guard().await;
            fetch_event(self.db().conn(), event_id).await?
        };
        let max_lanes = resolve_lane_count(&event, max_lanes, None, self.lane_defaults());
        validate_manual_heat(heat_number, max_lanes, assignments)?;

        let tx = self.db().begin_write().await?;
        let result = async {
            check_against_sheet(&tx, event_id, heat_number, round, assignments).await?;
            let heat = Heat {
                id: generate_id(&tx, PREFIX_HEAT).await?,
                event_id: event_id.to_string(),
                heat_number,
                round,
                max_lanes,
                scheduled_time: None,
                notes: None,
                created_at: Utc::now(),
            };
            tx.execute(
                "DELETE FROM heats WHERE event_id = ?1 AND round = ?2 AND heat_number = ?3",
                libsql::params![event_id, round.as_str(), i64::from(heat_number)],
            )
            .await?;
            insert_heat(&tx, &heat).await?;

            let mut rows = Vec::with_capacity(assignments.len());
            for assignment in assignments {
                let row = HeatAssignment {
                    id: generate_id(&tx, PREFIX_ASSIGNMENT).await?,
                    heat_id: heat.id.clone(),
                    registration_id: assignment.registration_id.clone(),
                    lane: Some(assignment.lane),
                    break_group: None,
                    seed_time: None,
                    seed_rank: None,
                    assignment_method: SeriesMethod::Manual,
                    is_present: true,
                };
                insert_assignment(&tx, &row).await?;
                rows.push(row);
            }
            Ok::<_, DatabaseError>((heat, rows))
        }
        .await;
        let (heat, mut rows) = tx.finish(result).await?;
        sort_assignments(&mut rows);

        tracing::info!(
            event_id,
            round = %round,
            heat_number,
            entrants = rows.len(),
            "created manual heat"
        );
        Ok(HeatWithAssignments {
            heat,
            assignments: rows,
        })
    }
}
