use heat_db::service::HeatService;
use heat_db::updates::heat::HeatUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::UpdateHeatArgs;
use crate::commands::shared::parse::parse_timestamp;
use crate::output::output;

/// Handle `heats update-heat`.
pub async fn handle(
    args: &UpdateHeatArgs,
    service: &HeatService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    validate_update_args(args)?;

    let mut builder = HeatUpdateBuilder::new();
    if let Some(at) = args.at.as_deref() {
        builder = builder.scheduled_time(Some(parse_timestamp(at)?));
    } else if args.clear_time {
        builder = builder.scheduled_time(None);
    }
    if let Some(notes) = &args.notes {
        builder = builder.notes(Some(notes.clone()));
    } else if args.clear_notes {
        builder = builder.notes(None);
    }

    let heat = service.update_heat(&args.heat_id, builder.build()).await?;
    output(&heat, flags.format)
}

fn validate_update_args(args: &UpdateHeatArgs) -> anyhow::Result<()> {
    if args.at.is_none() && !args.clear_time && args.notes.is_none() && !args.clear_notes {
        anyhow::bail!("At least one of --at, --clear-time, --notes, or --clear-notes must be provided");
    }
    Ok(())
}
