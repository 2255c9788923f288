use std::path::Path;

use anyhow::Context;
use heat_config::HeatConfig;
use heat_db::service::HeatService;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered config.
pub fn load_config() -> anyhow::Result<HeatConfig> {
    HeatConfig::load_with_dotenv().context("failed to load heats configuration")
}

/// Open the database named by `--db`, falling back to `database.path`.
pub async fn open_service(config: &HeatConfig, flags: &GlobalFlags) -> anyhow::Result<HeatService> {
    let path = flags
        .db
        .clone()
        .unwrap_or_else(|| config.database.path.clone());

    if path != ":memory:" {
        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }
    }

    tracing::debug!(path, "opening heat database");
    HeatService::new_local(&path, config.seeding.clone())
        .await
        .with_context(|| format!("failed to open heat database at {path}"))
}
