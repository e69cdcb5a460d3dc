use crate::cli::GlobalFlags;
use crate::cli::root_commands::StageArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `dossier stage`.
pub async fn handle(args: &StageArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let stage = args.stage.pipeline_stage();
    let progress = Progress::spinner(&format!("running {stage}"));

    match ctx.pipeline.run_stage(&args.case, stage).await {
        Ok(record) => {
            progress.finish_clear();
            output(&record, flags.format)
        }
        Err(error) => {
            progress.finish_err(&format!("{stage} failed"));
            Err(error.into())
        }
    }
}
