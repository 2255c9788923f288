//! Rounds, units, seeding sources and the closed sets of series and lane methods.
//!
//! All enums use `snake_case` serialization. `FromStr` accepts any case and
//! treats `-` like `_`, so `WA_400M_800M`, `wa-400m-800m` and `wa_400m_800m`
//! all name the same method. Unknown names are a `SeedingError::Validation`.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::SeedingError;

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('-', "_")
}

fn parse_from<T: Copy>(
    all: &[T],
    as_str: fn(T) -> &'static str,
    field: &str,
    s: &str,
) -> Result<T, SeedingError> {
    let wanted = normalize(s);
    all.iter()
        .copied()
        .find(|candidate| as_str(*candidate) == wanted)
        .ok_or_else(|| SeedingError::validation(field, format!("unknown value '{s}'")))
}

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

/// Competition phase. Each (event, round) owns exactly one heat sheet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    Qualification,
    Semifinal,
    Final,
}

impl Round {
    pub const ALL: &'static [Self] = &[Self::Qualification, Self::Semifinal, Self::Final];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qualification => "qualification",
            Self::Semifinal => "semifinal",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Round {
    type Err = SeedingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_from(Self::ALL, Self::as_str, "round", s)
    }
}

// ---------------------------------------------------------------------------
// Unit
// ---------------------------------------------------------------------------

/// Measurement unit of an event's results. Decides the ranking direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Time,
    Distance,
    Height,
    Points,
}

impl Unit {
    pub const ALL: &'static [Self] = &[Self::Time, Self::Distance, Self::Height, Self::Points];

    /// Whether a smaller mark ranks higher (only true for timed events).
    #[must_use]
    pub const fn lower_is_better(self) -> bool {
        matches!(self, Self::Time)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Distance => "distance",
            Self::Height => "height",
            Self::Points => "points",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = SeedingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_from(Self::ALL, Self::as_str, "unit", s)
    }
}

// ---------------------------------------------------------------------------
// MarkSource / PerformanceKind / SeedingCriteria
// ---------------------------------------------------------------------------

/// Where an entrant's qualifying mark came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MarkSource {
    SeedMark,
    SeasonBest,
    PersonalBest,
}

impl MarkSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SeedMark => "seed_mark",
            Self::SeasonBest => "season_best",
            Self::PersonalBest => "personal_best",
        }
    }
}

impl fmt::Display for MarkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a performance-history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceKind {
    PersonalBest,
    SeasonBest,
}

impl PerformanceKind {
    pub const ALL: &'static [Self] = &[Self::PersonalBest, Self::SeasonBest];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PersonalBest => "personal_best",
            Self::SeasonBest => "season_best",
        }
    }
}

impl fmt::Display for PerformanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceKind {
    type Err = SeedingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_from(Self::ALL, Self::as_str, "performance_kind", s)
    }
}

/// Which qualifying sources the seed resolver consults, and in what order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SeedingCriteria {
    /// Seed mark, then season best, then personal best.
    #[default]
    Auto,
    /// Only the explicit seed mark.
    SeedMark,
    /// Season best, then personal best.
    SeasonBest,
    /// Only the personal best.
    PersonalBest,
    /// Best parseable mark across all three sources.
    BestAvailable,
}

impl SeedingCriteria {
    pub const ALL: &'static [Self] = &[
        Self::Auto,
        Self::SeedMark,
        Self::SeasonBest,
        Self::PersonalBest,
        Self::BestAvailable,
    ];

    /// Sources in consultation order.
    #[must_use]
    pub const fn chain(self) -> &'static [MarkSource] {
        match self {
            Self::Auto | Self::BestAvailable => &[
                MarkSource::SeedMark,
                MarkSource::SeasonBest,
                MarkSource::PersonalBest,
            ],
            Self::SeedMark => &[MarkSource::SeedMark],
            Self::SeasonBest => &[MarkSource::SeasonBest, MarkSource::PersonalBest],
            Self::PersonalBest => &[MarkSource::PersonalBest],
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::SeedMark => "seed_mark",
            Self::SeasonBest => "season_best",
            Self::PersonalBest => "personal_best",
            Self::BestAvailable => "best_available",
        }
    }
}

impl fmt::Display for SeedingCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeedingCriteria {
    type Err = SeedingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_from(Self::ALL, Self::as_str, "seeding_criteria", s)
    }
}

// ---------------------------------------------------------------------------
// LaneMethod
// ---------------------------------------------------------------------------

/// Policy assigning a lane number to each entrant within one heat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LaneMethod {
    Manual,
    StandardOutside,
    StandardInside,
    Waterfall,
    WaterfallReverse,
    Pairs,
    PairsIndoor,
    WaHalvesAndPairs,
    WaSprintsStraight,
    #[serde(rename = "wa_200m")]
    Wa200m,
    #[serde(rename = "wa_400m_800m")]
    Wa400m800m,
    #[serde(rename = "wa_9_lanes")]
    Wa9Lanes,
}

impl LaneMethod {
    pub const ALL: &'static [Self] = &[
        Self::Manual,
        Self::StandardOutside,
        Self::StandardInside,
        Self::Waterfall,
        Self::WaterfallReverse,
        Self::Pairs,
        Self::PairsIndoor,
        Self::WaHalvesAndPairs,
        Self::WaSprintsStraight,
        Self::Wa200m,
        Self::Wa400m800m,
        Self::Wa9Lanes,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::StandardOutside => "standard_outside",
            Self::StandardInside => "standard_inside",
            Self::Waterfall => "waterfall",
            Self::WaterfallReverse => "waterfall_reverse",
            Self::Pairs => "pairs",
            Self::PairsIndoor => "pairs_indoor",
            Self::WaHalvesAndPairs => "wa_halves_and_pairs",
            Self::WaSprintsStraight => "wa_sprints_straight",
            Self::Wa200m => "wa_200m",
            Self::Wa400m800m => "wa_400m_800m",
            Self::Wa9Lanes => "wa_9_lanes",
        }
    }
}

impl fmt::Display for LaneMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaneMethod {
    type Err = SeedingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_from(Self::ALL, Self::as_str, "lane_method", s)
    }
}

// ---------------------------------------------------------------------------
// SeriesMethod
// ---------------------------------------------------------------------------

/// Policy distributing ranked entrants across heats.
///
/// The lane-draw family names are accepted here too: in simple mode they
/// distribute serpentine and then assign lanes with the same-named
/// [`LaneMethod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMethod {
    Manual,
    SeedTime,
    Random,
    Serpentine,
    StraightFinal,
    AlphabeticalNumber,
    AlphabeticalName,
    RoundRobin,
    Zigzag,
    ByResult,
    ByResultIndoor,
    BestToWorst,
    WorstToBest,
    HalfAndHalf,
    Pairs,
    PairsIndoor,
    StandardOutside,
    StandardInside,
    Waterfall,
    WaterfallReverse,
    WaHalvesAndPairs,
    WaSprintsStraight,
    #[serde(rename = "wa_200m")]
    Wa200m,
    #[serde(rename = "wa_400m_800m")]
    Wa400m800m,
    #[serde(rename = "wa_9_lanes")]
    Wa9Lanes,
}

impl SeriesMethod {
    pub const ALL: &'static [Self] = &[
        Self::Manual,
        Self::SeedTime,
        Self::Random,
        Self::Serpentine,
        Self::StraightFinal,
        Self::AlphabeticalNumber,
        Self::AlphabeticalName,
        Self::RoundRobin,
        Self::Zigzag,
        Self::ByResult,
        Self::ByResultIndoor,
        Self::BestToWorst,
        Self::WorstToBest,
        Self::HalfAndHalf,
        Self::Pairs,
        Self::PairsIndoor,
        Self::StandardOutside,
        Self::StandardInside,
        Self::Waterfall,
        Self::WaterfallReverse,
        Self::WaHalvesAndPairs,
        Self::WaSprintsStraight,
        Self::Wa200m,
        Self::Wa400m800m,
        Self::Wa9Lanes,
    ];

    /// The same-named lane method, for `Manual` and the lane-draw family.
    #[must_use]
    pub const fn as_lane_method(self) -> Option<LaneMethod> {
        match self {
            Self::Manual => Some(LaneMethod::Manual),
            Self::Pairs => Some(LaneMethod::Pairs),
            Self::PairsIndoor => Some(LaneMethod::PairsIndoor),
            Self::StandardOutside => Some(LaneMethod::StandardOutside),
            Self::StandardInside => Some(LaneMethod::StandardInside),
            Self::Waterfall => Some(LaneMethod::Waterfall),
            Self::WaterfallReverse => Some(LaneMethod::WaterfallReverse),
            Self::WaHalvesAndPairs => Some(LaneMethod::WaHalvesAndPairs),
            Self::WaSprintsStraight => Some(LaneMethod::WaSprintsStraight),
            Self::Wa200m => Some(LaneMethod::Wa200m),
            Self::Wa400m800m => Some(LaneMethod::Wa400m800m),
            Self::Wa9Lanes => Some(LaneMethod::Wa9Lanes),
            _ => None,
        }
    }

    /// Lane method used when this series method runs in simple mode.
    ///
    /// Shuffled and alphabetical heats keep their order (inside-out lanes);
    /// every ranked method puts the best seeds in the center lanes.
    #[must_use]
    pub const fn simple_lane_method(self) -> LaneMethod {
        match self.as_lane_method() {
            Some(lane) => lane,
            None => match self {
                Self::Random | Self::AlphabeticalNumber | Self::AlphabeticalName => {
                    LaneMethod::StandardInside
                }
                _ => LaneMethod::WaSprintsStraight,
            },
        }
    }

    /// Whether two runs over the same input always produce the same sheet.
    #[must_use]
    pub const fn is_deterministic(self) -> bool {
        !matches!(self, Self::Random)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::SeedTime => "seed_time",
            Self::Random => "random",
            Self::Serpentine => "serpentine",
            Self::StraightFinal => "straight_final",
            Self::AlphabeticalNumber => "alphabetical_number",
            Self::AlphabeticalName => "alphabetical_name",
            Self::RoundRobin => "round_robin",
            Self::Zigzag => "zigzag",
            Self::ByResult => "by_result",
            Self::ByResultIndoor => "by_result_indoor",
            Self::BestToWorst => "best_to_worst",
            Self::WorstToBest => "worst_to_best",
            Self::HalfAndHalf => "half_and_half",
            Self::Pairs => "pairs",
            Self::PairsIndoor => "pairs_indoor",
            Self::StandardOutside => "standard_outside",
            Self::StandardInside => "standard_inside",
            Self::Waterfall => "waterfall",
            Self::WaterfallReverse => "waterfall_reverse",
            Self::WaHalvesAndPairs => "wa_halves_and_pairs",
            Self::WaSprintsStraight => "wa_sprints_straight",
            Self::Wa200m => "wa_200m",
            Self::Wa400m800m => "wa_400m_800m",
            Self::Wa9Lanes => "wa_9_lanes",
        }
    }
}

impl fmt::Display for SeriesMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesMethod {
    type Err = SeedingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_from(Self::ALL, Self::as_str, "series_method", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SERPENTINE", SeriesMethod::Serpentine)]
    #[case("straight-final", SeriesMethod::StraightFinal)]
    #[case("WA_400M_800M", SeriesMethod::Wa400m800m)]
    #[case(" wa_9_lanes ", SeriesMethod::Wa9Lanes)]
    fn series_method_parses_any_case(#[case] input: &str, #[case] expected: SeriesMethod) {
        assert_eq!(input.parse::<SeriesMethod>().unwrap(), expected);
    }

    #[test]
    fn unknown_method_is_validation_error() {
        let err = "fastest_first".parse::<SeriesMethod>().unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(err.to_string().contains("series_method"));
    }

    #[test]
    fn serde_names_match_as_str() {
        for method in SeriesMethod::ALL {
            let json = serde_json::to_value(method).unwrap();
            assert_eq!(json, serde_json::Value::String(method.as_str().into()));
        }
        for method in LaneMethod::ALL {
            let json = serde_json::to_value(method).unwrap();
            assert_eq!(json, serde_json::Value::String(method.as_str().into()));
        }
    }

    #[test]
    fn every_lane_method_has_a_series_alias() {
        for lane in LaneMethod::ALL {
            let series: SeriesMethod = lane.as_str().parse().unwrap();
            assert_eq!(series.as_lane_method(), Some(*lane));
        }
    }

    #[test]
    fn simple_lane_method_defaults() {
        assert_eq!(
            SeriesMethod::Serpentine.simple_lane_method(),
            LaneMethod::WaSprintsStraight
        );
        assert_eq!(
            SeriesMethod::Random.simple_lane_method(),
            LaneMethod::StandardInside
        );
        assert_eq!(SeriesMethod::Manual.simple_lane_method(), LaneMethod::Manual);
        assert_eq!(SeriesMethod::Wa200m.simple_lane_method(), LaneMethod::Wa200m);
    }

    #[test]
    fn time_is_the_only_ascending_unit() {
        assert!(Unit::Time.lower_is_better());
        assert!(!Unit::Distance.lower_is_better());
        assert!(!Unit::Height.lower_is_better());
        assert!(!Unit::Points.lower_is_better());
    }
}
