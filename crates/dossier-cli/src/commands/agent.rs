use crate::cli::GlobalFlags;
use crate::cli::root_commands::AgentArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `dossier agent`.
pub async fn handle(args: &AgentArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let progress = Progress::spinner("assistant working");

    match ctx.pipeline.run_agent(&args.case, &args.request).await {
        Ok(run) => {
            if run.exhausted {
                progress.finish_ok(&format!("stopped after {} steps", run.steps));
            } else {
                progress.finish_clear();
            }
            output(&run, flags.format)
        }
        Err(error) => {
            progress.finish_err("assistant failed");
            Err(error.into())
        }
    }
}
