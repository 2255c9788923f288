//! Heat sheet generation: the seeding pipeline plus the transactional
//! replace of one (event, round).

use chrono::Utc;
use heat_core::entities::{
    Heat, HeatAssignment, HeatGeneration, HeatWithAssignments, ManualPlacement,
};
use heat_core::enums::{LaneMethod, Round, SeedingCriteria, SeriesMethod};
use heat_core::ids::{PREFIX_ASSIGNMENT, PREFIX_HEAT};
use heat_core::responses::GeneratedSheet;
use heat_seeding::{HeatPlan, PlanRequest, build_plan, resolve_lane_count};

use crate::WriteTx;
use crate::error::DatabaseError;
use crate::helpers::{generate_id, parse_datetime, parse_enum, seed_from_sql, seed_to_sql};
use crate::repos::event::fetch_event;
use crate::repos::heat::{delete_sheet, insert_assignment, insert_heat, sort_assignments};
use crate::repos::performance::history_for_event;
use crate::repos::registration::registrations_for_event;
use crate::service::HeatService;

/// Parameters of one generate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub event_id: String,
    pub round: Round,
    pub series_method: SeriesMethod,
    pub max_lanes: Option<u32>,
    pub max_lanes_indoor: Option<u32>,
    pub heats_count: Option<u32>,
    pub finalists_count: Option<u32>,
    /// Falls back to `seeding.default_criteria`.
    pub criteria: Option<SeedingCriteria>,
    pub manual: Vec<ManualPlacement>,
    /// Explicit shuffle seed for `random`.
    pub rng_seed: Option<u64>,
    /// Draw a fresh shuffle seed instead of reusing the stored one.
    pub reseed: bool,
}

impl GenerateRequest {
    #[must_use]
    pub fn new(event_id: impl Into<String>, round: Round, series_method: SeriesMethod) -> Self {
        Self {
            event_id: event_id.into(),
            round,
            series_method,
            max_lanes: None,
            max_lanes_indoor: None,
            heats_count: None,
            finalists_count: None,
            criteria: None,
            manual: Vec::new(),
            rng_seed: None,
            reseed: false,
        }
    }
}

const GENERATION_COLS: &str = "event_id, round, series_method, lane_method, rng_seed, generated_at";

fn row_to_generation(row: &libsql::Row) -> Result<HeatGeneration, DatabaseError> {
    Ok(HeatGeneration {
        event_id: row.get(0)?,
        round: parse_enum(&row.get::<String>(1)?)?,
        series_method: parse_enum(&row.get::<String>(2)?)?,
        lane_method: parse_enum(&row.get::<String>(3)?)?,
        rng_seed: row.get::<Option<i64>>(4)?.map(seed_from_sql),
        generated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

async fn fetch_generation(
    conn: &libsql::Connection,
    event_id: &str,
    round: Round,
) -> Result<Option<HeatGeneration>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {GENERATION_COLS} FROM heat_generations WHERE event_id = ?1 AND round = ?2"
            ),
            [event_id, round.as_str()],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_generation(&row)?)),
        None => Ok(None),
    }
}

async fn upsert_generation(
    conn: &libsql::Connection,
    generation: &HeatGeneration,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO heat_generations ({GENERATION_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(event_id, round) DO UPDATE SET
                series_method = excluded.series_method,
                lane_method = excluded.lane_method,
                rng_seed = excluded.rng_seed,
                generated_at = excluded.generated_at"
        ),
        libsql::params![
            generation.event_id.as_str(),
            generation.round.as_str(),
            generation.series_method.as_str(),
            generation.lane_method.as_str(),
            generation.rng_seed.map(seed_to_sql),
            generation.generated_at.to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

/// Pick the shuffle seed. Only `random` consumes one.
fn choose_seed(request: &GenerateRequest, stored: Option<&HeatGeneration>) -> Option<u64> {
    if request.series_method.is_deterministic() {
        return None;
    }
    let reused = if request.reseed {
        None
    } else {
        stored
            .filter(|g| g.series_method == request.series_method)
            .and_then(|g| g.rng_seed)
    };
    Some(request.rng_seed.or(reused).unwrap_or_else(rand::random))
}

/// Replace the stored sheet with `plan`. Runs inside the caller's transaction.
async fn write_plan(
    tx: &WriteTx<'_>,
    event_id: &str,
    round: Round,
    plan: &HeatPlan,
) -> Result<Vec<HeatWithAssignments>, DatabaseError> {
    let removed = delete_sheet(tx, event_id, round).await?;
    tracing::debug!(event_id, round = %round, removed, "replacing heat sheet");

    let now = Utc::now();
    let mut heats = Vec::with_capacity(plan.heats.len());
    for planned in &plan.heats {
        let heat = Heat {
            id: generate_id(tx, PREFIX_HEAT).await?,
            event_id: event_id.to_string(),
            heat_number: planned.heat_number,
            round,
            max_lanes: plan.max_lanes,
            scheduled_time: None,
            notes: None,
            created_at: now,
        };
        insert_heat(tx, &heat).await?;

        let mut assignments = Vec::with_capacity(planned.slots.len());
        for slot in &planned.slots {
            let assignment = HeatAssignment {
                id: generate_id(tx, PREFIX_ASSIGNMENT).await?,
                heat_id: heat.id.clone(),
                registration_id: slot.entrant.registration.id.clone(),
                lane: slot.lane,
                break_group: slot.break_group,
                seed_time: slot.entrant.seed_time.clone(),
                seed_rank: Some(slot.entrant.seed_rank),
                assignment_method: plan.series_method,
                is_present: slot.is_present,
            };
            insert_assignment(tx, &assignment).await?;
            assignments.push(assignment);
        }
        sort_assignments(&mut assignments);
        heats.push(HeatWithAssignments { heat, assignments });
    }
    Ok(heats)
}

impl HeatService {
    /// Simple mode: the series method also picks the lane method.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown event, `Seeding` when no plan can be built,
    /// or a database failure. Nothing is written on error.
    pub async fn generate_heats(
        &self,
        request: &GenerateRequest,
    ) -> Result<GeneratedSheet, DatabaseError> {
        self.generate_heats_advanced(request, request.series_method.simple_lane_method())
            .await
    }

    /// Generate with independent series and lane methods.
    ///
    /// Replaces every heat of (event, round) in one transaction. The previous
    /// sheet survives untouched when anything fails.
    ///
    /// # Errors
    ///
    /// Same as [`HeatService::generate_heats`].
    pub async fn generate_heats_advanced(
        &self,
        request: &GenerateRequest,
        lane_method: LaneMethod,
    ) -> Result<GeneratedSheet, DatabaseError> {
        let event_id = request.event_id.as_str();
        let round = request.round;
        let _sheet = self.locks().acquire(event_id, round).await;

        let (event, registrations, history, stored) = {
            let _read = self.db().read_guard().await;
            let conn = self.db().conn();
            let event = fetch_event(conn, event_id).await?;
            let registrations = registrations_for_event(conn, event_id).await?;
            let history = history_for_event(conn, event_id, &event.discipline_code).await?;
            let stored = fetch_generation(conn, event_id, round).await?;
            (event, registrations, history, stored)
        };

        let rng_seed = choose_seed(request, stored.as_ref());
        let max_lanes = resolve_lane_count(
            &event,
            request.max_lanes,
            request.max_lanes_indoor,
            self.lane_defaults(),
        );
        let plan_request = PlanRequest {
            series_method: request.series_method,
            lane_method,
            max_lanes,
            heats_count: request.heats_count,
            finalists_count: request.finalists_count,
            criteria: request
                .criteria
                .unwrap_or(self.seeding().default_criteria),
            rng_seed: rng_seed.unwrap_or_default(),
            manual: &request.manual,
        };
        let plan = build_plan(&event, &registrations, &history, &plan_request)?;

        let generation = HeatGeneration {
            event_id: event_id.to_string(),
            round,
            series_method: plan.series_method,
            lane_method: plan.lane_method,
            rng_seed,
            generated_at: Utc::now(),
        };

        let tx = self.db().begin_write().await?;
        let result = async {
            let heats = write_plan(&tx, event_id, round, &plan).await?;
            upsert_generation(&tx, &generation).await?;
            Ok::<_, DatabaseError>(heats)
        }
        .await;
        let heats = tx.finish(result).await?;

        tracing::info!(
            event_id,
            round = %round,
            series_method = %plan.series_method,
            lane_method = %plan.lane_method,
            heats = heats.len(),
            entrants = plan.entrant_count(),
            byes = plan.bye_count(),
            "committed heat sheet"
        );

        Ok(GeneratedSheet {
            event_id: event_id.to_string(),
            round,
            series_method: plan.series_method,
            lane_method: plan.lane_method,
            rng_seed,
            heats,
            warnings: plan.warnings,
        })
    }

    /// Methods and seed of the last committed generation, if any.
    pub async fn get_generation(
        &self,
        event_id: &str,
        round: Round,
    ) -> Result<Option<HeatGeneration>, DatabaseError> {
        let _read = self.db().read_guard().await;
        fetch_generation(self.db().conn(), event_id, round).await
    }
}
