use dossier_core::entities::ExtractionDocument;
use dossier_pipeline::ExtractionUnit;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExtractArgs;
use crate::commands::shared::input::read_text;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `dossier extract`.
pub async fn handle(args: &ExtractArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let case_text = read_text(&args.input)?;
    let survey = args.survey.as_deref().map(read_text).transpose()?;

    let total = ExtractionUnit::all().len() as u64;
    let progress = Progress::units(total, "extracting evidence");
    let observer = |completed: usize, _total: usize, snapshot: &ExtractionDocument| {
        progress.settle_units(completed as u64, snapshot.strong_count());
    };

    let result = ctx
        .pipeline
        .extract_case(&args.case, &case_text, survey.as_deref(), Some(&observer))
        .await;

    match result {
        Ok(report) => {
            if report.failed_units.is_empty() {
                progress.finish_clear();
            } else {
                progress.finish_ok(&format!("{} unit(s) failed", report.failed_units.len()));
            }
            output(&report, flags.format)
        }
        Err(error) => {
            progress.finish_err("extraction failed");
            Err(error.into())
        }
    }
}
