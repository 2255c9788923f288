use std::collections::BTreeMap;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{MarkSource, PerformanceKind};

/// One personal-best or season-best entry from an athlete's history.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PerformanceRecord {
    pub athlete_id: String,
    pub discipline_code: String,
    pub kind: PerformanceKind,
    pub result: String,
    pub date: Option<NaiveDate>,
    pub competition: Option<String>,
}

/// Personal and season bests for one athlete, keyed by discipline code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AthleteHistory {
    pub personal_bests: BTreeMap<String, PerformanceRecord>,
    pub season_bests: BTreeMap<String, PerformanceRecord>,
}

impl AthleteHistory {
    /// File a record under its kind. A later record for the same discipline
    /// replaces the earlier one.
    pub fn insert(&mut self, record: PerformanceRecord) {
        let slot = match record.kind {
            PerformanceKind::PersonalBest => &mut self.personal_bests,
            PerformanceKind::SeasonBest => &mut self.season_bests,
        };
        slot.insert(record.discipline_code.clone(), record);
    }

    /// Raw mark for a history source. `SeedMark` is never stored here.
    #[must_use]
    pub fn mark(&self, source: MarkSource, discipline_code: &str) -> Option<&str> {
        let map = match source {
            MarkSource::SeedMark => return None,
            MarkSource::SeasonBest => &self.season_bests,
            MarkSource::PersonalBest => &self.personal_bests,
        };
        map.get(discipline_code).map(|record| record.result.as_str())
    }
}

/// Histories for every athlete in one event, fetched as a single batch.
pub type HistoryBatch = BTreeMap<String, AthleteHistory>;

/// Group a flat record list into a [`HistoryBatch`].
#[must_use]
pub fn group_history(records: impl IntoIterator<Item = PerformanceRecord>) -> HistoryBatch {
    let mut batch = HistoryBatch::new();
    for record in records {
        batch
            .entry(record.athlete_id.clone())
            .or_default()
            .insert(record);
    }
    batch
}
