use crate::cli::GlobalFlags;
use crate::cli::subcommands::RecommenderCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `dossier recommender`.
pub async fn handle(
    action: &RecommenderCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        RecommenderCommands::Add {
            case,
            name,
            relationship,
        } => {
            let recommender = ctx
                .store()
                .add_recommender(case, name, relationship.as_deref())
                .await?;
            output(&recommender, flags.format)
        }
        RecommenderCommands::List { case } => {
            let recommenders = ctx.store().list_recommenders(case).await?;
            output(&recommenders, flags.format)
        }
    }
}
