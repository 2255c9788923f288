use heat_core::enums::Round;
use heat_db::service::HeatService;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SheetArgs;
use crate::commands::shared::parse::parse_enum;
use crate::output::output;

#[derive(Debug, Serialize)]
struct Cleared<'a> {
    event_id: &'a str,
    round: Round,
    heats_removed: u64,
}

/// Handle `heats clear`.
pub async fn handle(args: &SheetArgs, service: &HeatService, flags: &GlobalFlags) -> anyhow::Result<()> {
    let round: Round = parse_enum(&args.round, "round")?;
    let heats_removed = service.clear_heat_sheet(&args.event_id, round).await?;
    output(
        &Cleared {
            event_id: &args.event_id,
            round,
            heats_removed,
        },
        flags.format,
    )
}
