use crate::cli::GlobalFlags;
use crate::cli::root_commands::CaseArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `dossier risk`.
pub async fn handle(args: &CaseArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let progress = Progress::spinner("assessing risk");

    match ctx.pipeline.assess_risk(&args.case).await {
        Ok(run) => {
            progress.finish_clear();
            output(&run, flags.format)
        }
        Err(error) => {
            progress.finish_err("risk assessment failed");
            Err(error.into())
        }
    }
}
