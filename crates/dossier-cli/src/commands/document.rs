use crate::cli::GlobalFlags;
use crate::cli::subcommands::DocumentCommands;
use crate::commands::shared::input::read_text;
use crate::context::AppContext;
use crate::output::output;

/// Handle `dossier document`.
pub async fn handle(
    action: &DocumentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DocumentCommands::Add { case, name, input } => {
            let content = input.as_deref().map(read_text).transpose()?;
            let document = ctx
                .store()
                .register_document(case, name, content.as_deref())
                .await?;
            output(&document, flags.format)
        }
        DocumentCommands::List { case } => {
            let documents = ctx.store().list_documents(case).await?;
            output(&documents, flags.format)
        }
        DocumentCommands::Verifications { id } => {
            let records = ctx.store().list_verifications(id).await?;
            output(&records, flags.format)
        }
    }
}
