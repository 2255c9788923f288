use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Generate a heat sheet; the series method also picks the lane method.
    Generate(GenerateArgs),
    /// Generate with separate series and lane methods.
    Advanced(AdvancedArgs),
    /// Build or replace a single heat by hand.
    CreateHeat(CreateHeatArgs),
    /// Print a stored heat sheet.
    Show(SheetArgs),
    /// Delete a stored heat sheet.
    Clear(SheetArgs),
    /// Edit a heat's schedule or notes.
    UpdateHeat(UpdateHeatArgs),
    /// Load events, registrations and performances from a JSON bundle.
    Import(ImportArgs),
}

/// Options shared by `generate` and `advanced`.
#[derive(Clone, Debug, Args)]
pub struct SeriesOptions {
    /// Event ID.
    pub event_id: String,

    /// Round: qualification, semifinal, final.
    #[arg(long, default_value = "qualification")]
    pub round: String,

    /// Lanes per heat (overrides the event and config).
    #[arg(long)]
    pub max_lanes: Option<u32>,

    /// Number of heats (default: as few as the lanes allow).
    #[arg(long)]
    pub heats: Option<u32>,

    /// Finalists kept by `straight_final` (default: lane count).
    #[arg(long)]
    pub finalists: Option<u32>,

    /// Manual placement `REGISTRATION:HEAT:LANE`; either number may be empty.
    #[arg(long = "manual", value_name = "PLACEMENT")]
    pub manual: Vec<String>,

    /// Shuffle seed for `random`.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Draw a new shuffle seed for `random` instead of reusing the stored one.
    #[arg(long, conflicts_with = "seed")]
    pub reseed: bool,
}

#[derive(Clone, Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub series: SeriesOptions,

    /// Series method, e.g. serpentine, straight_final, wa_sprints_straight.
    #[arg(long)]
    pub method: String,
}

#[derive(Clone, Debug, Args)]
pub struct AdvancedArgs {
    #[command(flatten)]
    pub series: SeriesOptions,

    /// Series method.
    #[arg(long = "series")]
    pub series_method: String,

    /// Lane method.
    #[arg(long = "lanes")]
    pub lane_method: String,

    /// Lanes per heat for indoor events.
    #[arg(long)]
    pub max_lanes_indoor: Option<u32>,

    /// Seeding criteria: auto, seed_mark, season_best, personal_best, best_available.
    #[arg(long)]
    pub criteria: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct CreateHeatArgs {
    pub event_id: String,

    #[arg(long, default_value = "qualification")]
    pub round: String,

    /// Heat number to create or replace.
    #[arg(long = "heat")]
    pub heat_number: u32,

    #[arg(long)]
    pub max_lanes: Option<u32>,

    /// Lane assignment `REGISTRATION=LANE`, repeatable.
    #[arg(long = "assign", value_name = "ASSIGNMENT")]
    pub assignments: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SheetArgs {
    pub event_id: String,

    #[arg(long, default_value = "qualification")]
    pub round: String,
}

#[derive(Clone, Debug, Args)]
pub struct UpdateHeatArgs {
    /// Heat ID.
    pub heat_id: String,

    /// Scheduled start, RFC 3339.
    #[arg(long, conflicts_with = "clear_time")]
    pub at: Option<String>,

    #[arg(long)]
    pub clear_time: bool,

    #[arg(long, conflicts_with = "clear_notes")]
    pub notes: Option<String>,

    #[arg(long)]
    pub clear_notes: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// Path to a JSON competition bundle.
    pub path: String,
}
