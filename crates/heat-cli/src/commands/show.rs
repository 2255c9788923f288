use heat_core::enums::Round;
use heat_db::service::HeatService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SheetArgs;
use crate::commands::shared::parse::parse_enum;
use crate::output::output_sheet;

/// Handle `heats show`.
pub async fn handle(args: &SheetArgs, service: &HeatService, flags: &GlobalFlags) -> anyhow::Result<()> {
    let round: Round = parse_enum(&args.round, "round")?;
    let heats = service.get_heat_sheet(&args.event_id, round).await?;
    if heats.is_empty() {
        tracing::info!(event_id = %args.event_id, round = %round, "no heat sheet stored");
    }
    output_sheet(&heats, flags.format)
}
