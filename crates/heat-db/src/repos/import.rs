//! Bulk load of collaborator data.

use heat_core::entities::CompetitionBundle;
use serde::Serialize;

use crate::WriteTx;
use crate::error::DatabaseError;
use crate::repos::event::upsert_event;
use crate::repos::performance::upsert_performance;
use crate::repos::registration::upsert_registration;
use crate::service::HeatService;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub events: usize,
    pub registrations: usize,
    pub performances: usize,
}

async fn write_bundle(tx: &WriteTx<'_>, bundle: &CompetitionBundle) -> Result<(), DatabaseError> {
    for event in &bundle.events {
        upsert_event(tx, event).await?;
    }
    for registration in &bundle.registrations {
        upsert_registration(tx, registration).await?;
    }
    for record in &bundle.performances {
        upsert_performance(tx, record).await?;
    }
    Ok(())
}

impl HeatService {
    /// Upsert a bundle in one transaction; a bad row leaves nothing behind.
    pub async fn import_bundle(
        &self,
        bundle: &CompetitionBundle,
    ) -> Result<ImportSummary, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = write_bundle(&tx, bundle).await;
        tx.finish(result).await?;

        let summary = ImportSummary {
            events: bundle.events.len(),
            registrations: bundle.registrations.len(),
            performances: bundle.performances.len(),
        };
        tracing::info!(
            events = summary.events,
            registrations = summary.registrations,
            performances = summary.performances,
            "imported competition bundle"
        );
        Ok(summary)
    }
}
