use anyhow::Context;
use heat_core::enums::{LaneMethod, SeedingCriteria, SeriesMethod};
use heat_db::service::HeatService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AdvancedArgs;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::request::build_request;
use crate::output::output_generated;

/// Handle `heats advanced`.
pub async fn handle(
    args: &AdvancedArgs,
    service: &HeatService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let series_method: SeriesMethod = parse_enum(&args.series_method, "series method")?;
    let lane_method: LaneMethod = parse_enum(&args.lane_method, "lane method")?;

    let mut request = build_request(&args.series, series_method)?;
    request.max_lanes_indoor = args.max_lanes_indoor;
    request.criteria = args
        .criteria
        .as_deref()
        .map(|raw| parse_enum::<SeedingCriteria>(raw, "criteria"))
        .transpose()?;

    let sheet = service
        .generate_heats_advanced(&request, lane_method)
        .await
        .with_context(|| {
            format!(
                "failed to generate {} heats for {}",
                request.round, request.event_id
            )
        })?;
    output_generated(&sheet, flags.format)
}
