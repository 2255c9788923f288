use heat_core::enums::{Round, SeriesMethod};
use heat_db::repos::generate::GenerateRequest;

use crate::cli::root_commands::SeriesOptions;
use crate::commands::shared::parse::{parse_enum, parse_placement};

/// Build the request shared by `generate` and `advanced`.
pub fn build_request(
    options: &SeriesOptions,
    series_method: SeriesMethod,
) -> anyhow::Result<GenerateRequest> {
    let round: Round = parse_enum(&options.round, "round")?;
    let manual = options
        .manual
        .iter()
        .map(|raw| parse_placement(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut request = GenerateRequest::new(options.event_id.clone(), round, series_method);
    request.max_lanes = options.max_lanes;
    request.heats_count = options.heats;
    request.finalists_count = options.finalists;
    request.manual = manual;
    request.rng_seed = options.seed;
    request.reseed = options.reseed;
    Ok(request)
}
