use heat_db::service::HeatService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    service: &HeatService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Generate(args) => commands::generate::handle(&args, service, flags).await,
        Commands::Advanced(args) => commands::advanced::handle(&args, service, flags).await,
        Commands::CreateHeat(args) => commands::create_heat::handle(&args, service, flags).await,
        Commands::Show(args) => commands::show::handle(&args, service, flags).await,
        Commands::Clear(args) => commands::clear::handle(&args, service, flags).await,
        Commands::UpdateHeat(args) => commands::update_heat::handle(&args, service, flags).await,
        Commands::Import(args) => commands::import::handle(&args, service, flags).await,
    }
}
