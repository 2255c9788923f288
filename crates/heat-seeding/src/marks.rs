//! Mark parsing and canonical formatting.
//!
//! Accepted forms, after trimming:
//! - plain decimal: `"11.20"`, `"7,45"` (comma decimal separator), `"6123"`
//! - `M:SS.ss` / `MM:SS.ss`: `"1:52.30"`
//! - `H:MM:SS.ss`: `"2:08:12.4"`
//!
//! A single trailing unit letter (`"10.95s"`, `"8.12m"`) is ignored.
//! Times become seconds; every other unit keeps its raw number.

use heat_core::enums::Unit;
use heat_core::errors::SeedingError;

/// Parse a raw mark.
///
/// Returns `Ok(None)` for empty input (the source simply has no mark).
///
/// # Errors
///
/// Returns `SeedingError::Parse` for malformed, negative or out-of-range marks.
pub fn parse_mark(raw: &str) -> Result<Option<f64>, SeedingError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let body = strip_unit_suffix(trimmed);
    if body.is_empty() {
        return Err(SeedingError::parse(raw, "no numeric value"));
    }
    let body = body.replace(',', ".");

    let parts: Vec<&str> = body.split(':').collect();
    let value = match parts.as_slice() {
        [seconds] => decimal(raw, seconds)?,
        [minutes, seconds] => {
            let seconds = sexagesimal_seconds(raw, seconds)?;
            f64::from(whole(raw, minutes)?) * 60.0 + seconds
        }
        [hours, minutes, seconds] => {
            let minutes = whole(raw, minutes)?;
            if minutes >= 60 {
                return Err(SeedingError::parse(raw, "minutes must be below 60"));
            }
            let seconds = sexagesimal_seconds(raw, seconds)?;
            f64::from(whole(raw, hours)?) * 3600.0 + f64::from(minutes) * 60.0 + seconds
        }
        _ => return Err(SeedingError::parse(raw, "too many ':' separators")),
    };

    if !value.is_finite() {
        return Err(SeedingError::parse(raw, "not a finite number"));
    }
    Ok(Some(value))
}

/// Render a parsed value the way result sheets print it.
///
/// Times are rounded to hundredths (`"9.58"`, `"1:52.30"`, `"2:08:12.40"`);
/// whole points print without decimals; everything else keeps two decimals.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_mark(value: f64, unit: Unit) -> String {
    match unit {
        Unit::Time => {
            let centis = (value * 100.0).round().max(0.0) as u64;
            let hours = centis / 360_000;
            let minutes = (centis / 6_000) % 60;
            let seconds = (centis / 100) % 60;
            let hundredths = centis % 100;
            if hours > 0 {
                format!("{hours}:{minutes:02}:{seconds:02}.{hundredths:02}")
            } else if minutes > 0 {
                format!("{minutes}:{seconds:02}.{hundredths:02}")
            } else {
                format!("{seconds}.{hundredths:02}")
            }
        }
        Unit::Points if value.fract() == 0.0 => format!("{value:.0}"),
        Unit::Distance | Unit::Height | Unit::Points => format!("{value:.2}"),
    }
}

fn strip_unit_suffix(s: &str) -> &str {
    match s.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => s[..idx].trim_end(),
        _ => s,
    }
}

fn decimal(raw: &str, s: &str) -> Result<f64, SeedingError> {
    let well_formed = !s.is_empty()
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
        && s.chars().filter(|c| *c == '.').count() <= 1
        && s.chars().any(|c| c.is_ascii_digit());
    if !well_formed {
        return Err(SeedingError::parse(raw, format!("'{s}' is not a decimal number")));
    }
    s.parse::<f64>()
        .map_err(|e| SeedingError::parse(raw, e.to_string()))
}

fn whole(raw: &str, s: &str) -> Result<u32, SeedingError> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(SeedingError::parse(raw, format!("'{s}' is not a whole number")));
    }
    s.parse::<u32>()
        .map_err(|e| SeedingError::parse(raw, e.to_string()))
}

fn sexagesimal_seconds(raw: &str, s: &str) -> Result<f64, SeedingError> {
    let seconds = decimal(raw, s)?;
    if seconds >= 60.0 {
        return Err(SeedingError::parse(raw, "seconds must be below 60"));
    }
    Ok(seconds)
}
