use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Extract(args) => commands::extract::handle(&args, ctx, flags).await,
        Commands::Stage(args) => commands::stage::handle(&args, ctx, flags).await,
        Commands::Risk(args) => commands::risk::handle(&args, ctx, flags).await,
        Commands::Update(args) => commands::update::handle(&args, ctx, flags).await,
        Commands::Reanalyze(args) => commands::reanalyze::handle(&args, ctx, flags).await,
        Commands::Verify(args) => commands::verify::handle(&args, ctx, flags).await,
        Commands::History(args) => commands::history::handle(&args, ctx, flags).await,
        Commands::Profile(args) => commands::profile::handle(&args, ctx, flags).await,
        Commands::Agent(args) => commands::agent::handle(&args, ctx, flags).await,
        Commands::Document { action } => commands::document::handle(&action, ctx, flags).await,
        Commands::Recommender { action } => {
            commands::recommender::handle(&action, ctx, flags).await
        }
        Commands::Schema { .. } => unreachable!("schema is pre-dispatched in main"),
    }
}
