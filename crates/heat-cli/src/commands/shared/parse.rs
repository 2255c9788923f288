use chrono::{DateTime, Utc};
use heat_core::entities::{LaneAssignment, ManualPlacement};
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse `REGISTRATION:HEAT:LANE`. Heat and lane may be empty.
pub fn parse_placement(raw: &str) -> anyhow::Result<ManualPlacement> {
    let mut parts = raw.split(':');
    let registration_id = parts.next().unwrap_or_default().trim();
    if registration_id.is_empty() {
        anyhow::bail!("invalid placement '{raw}': missing registration id");
    }
    let heat_number = parse_optional_number(parts.next(), raw, "heat")?;
    let lane = parse_optional_number(parts.next(), raw, "lane")?;
    if parts.next().is_some() {
        anyhow::bail!("invalid placement '{raw}': expected REGISTRATION:HEAT:LANE");
    }

    Ok(ManualPlacement {
        registration_id: registration_id.to_string(),
        heat_number,
        lane,
    })
}

fn parse_optional_number(part: Option<&str>, raw: &str, what: &str) -> anyhow::Result<Option<u32>> {
    match part.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|error| anyhow::anyhow!("invalid {what} in placement '{raw}': {error}")),
    }
}

/// Parse `REGISTRATION=LANE`.
pub fn parse_lane_assignment(raw: &str) -> anyhow::Result<LaneAssignment> {
    let Some((registration_id, lane)) = raw.split_once('=') else {
        anyhow::bail!("invalid assignment '{raw}': expected REGISTRATION=LANE");
    };
    let lane = lane
        .trim()
        .parse()
        .map_err(|error| anyhow::anyhow!("invalid lane in assignment '{raw}': {error}"))?;
    Ok(LaneAssignment {
        registration_id: registration_id.trim().to_string(),
        lane,
    })
}

pub fn parse_timestamp(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|error| anyhow::anyhow!("invalid time '{raw}' (expected RFC 3339): {error}"))
}
