use crate::cli::GlobalFlags;
use crate::cli::root_commands::InputArgs;
use crate::commands::shared::input::read_text;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `dossier reanalyze`.
pub async fn handle(args: &InputArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let document_text = read_text(&args.input)?;
    let progress = Progress::spinner("re-evaluating affected criteria");

    match ctx.pipeline.reanalyze(&args.case, &document_text).await {
        Ok(outcome) => {
            progress.finish_clear();
            output(&outcome, flags.format)
        }
        Err(error) => {
            progress.finish_err("reanalysis failed");
            Err(error.into())
        }
    }
}
