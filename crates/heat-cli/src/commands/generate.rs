use anyhow::Context;
use heat_core::enums::SeriesMethod;
use heat_db::service::HeatService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::GenerateArgs;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::request::build_request;
use crate::output::output_generated;

/// Handle `heats generate`.
pub async fn handle(
    args: &GenerateArgs,
    service: &HeatService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let method: SeriesMethod = parse_enum(&args.method, "method")?;
    let request = build_request(&args.series, method)?;

    let sheet = service.generate_heats(&request).await.with_context(|| {
        format!(
            "failed to generate {} heats for {}",
            request.round, request.event_id
        )
    })?;
    output_generated(&sheet, flags.format)
}
