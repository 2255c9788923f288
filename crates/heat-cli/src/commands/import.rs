use anyhow::Context;
use heat_core::entities::CompetitionBundle;
use heat_db::service::HeatService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::output::output;

/// Handle `heats import`.
pub async fn handle(args: &ImportArgs, service: &HeatService, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path))?;
    let bundle: CompetitionBundle = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a competition bundle", args.path))?;
    if bundle.is_empty() {
        anyhow::bail!("{} contains no events, registrations or performances", args.path);
    }

    let summary = service.import_bundle(&bundle).await?;
    output(&summary, flags.format)
}
