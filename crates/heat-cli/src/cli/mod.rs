use anyhow::Context;
use clap::{Parser, ValueEnum};
use heat_config::HeatConfig;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `heats` binary.
#[derive(Debug, Parser)]
#[command(name = "heats", version, about = "Athletics heat and lane assignment")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw (default from `general.default_format`)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database path (defaults to `database.path`)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    /// Resolve global flags, filling the output format from config.
    pub fn global_flags(&self, config: &HeatConfig) -> anyhow::Result<GlobalFlags> {
        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_str(&config.general.default_format, true)
                .map_err(|error| anyhow::anyhow!(error))
                .context("invalid general.default_format")?,
        };
        Ok(GlobalFlags {
            format,
            quiet: self.quiet,
            db: self.db.clone(),
        })
    }
}
