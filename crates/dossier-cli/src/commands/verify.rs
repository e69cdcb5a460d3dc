use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::VerifyArgs;
use crate::commands::shared::input::read_text;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `dossier verify`.
pub async fn handle(args: &VerifyArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let document = ctx
        .store()
        .list_documents(&args.case)
        .await?
        .into_iter()
        .find(|d| d.id == args.document)
        .with_context(|| format!("document {} not found for case {}", args.document, args.case))?;
    let text = read_text(&args.input)?;

    let progress = Progress::spinner(&format!("verifying {}", document.name));
    match ctx
        .pipeline
        .verify_document(&document, &text, &args.criteria)
        .await
    {
        Ok(report) => {
            progress.finish_clear();
            output(&report, flags.format)
        }
        Err(error) => {
            progress.finish_err("verification failed");
            Err(error.into())
        }
    }
}
