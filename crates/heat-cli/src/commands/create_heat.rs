use anyhow::Context;
use heat_core::enums::Round;
use heat_db::service::HeatService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CreateHeatArgs;
use crate::commands::shared::parse::{parse_enum, parse_lane_assignment};
use crate::output::output_sheet;

/// Handle `heats create-heat`.
pub async fn handle(
    args: &CreateHeatArgs,
    service: &HeatService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let round: Round = parse_enum(&args.round, "round")?;
    let assignments = args
        .assignments
        .iter()
        .map(|raw| parse_lane_assignment(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let heat = service
        .create_heat(
            &args.event_id,
            args.heat_number,
            round,
            args.max_lanes,
            &assignments,
        )
        .await
        .with_context(|| {
            format!(
                "failed to create heat {} of the {round} for {}",
                args.heat_number, args.event_id
            )
        })?;
    output_sheet(std::slice::from_ref(&heat), flags.format)
}
