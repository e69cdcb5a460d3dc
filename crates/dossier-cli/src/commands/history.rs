use anyhow::Context;
use dossier_core::entities::{AnalysisSummary, AnalysisVersion};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::HistoryArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct HistoryResponse {
    summary: Option<AnalysisSummary>,
    versions: Vec<AnalysisVersion>,
}

/// Handle `dossier history`.
pub async fn handle(args: &HistoryArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(number) = args.version {
        let version = ctx
            .store()
            .get_version(&args.case, number)
            .await?
            .with_context(|| format!("case {} has no version {number}", args.case))?;
        return output(&version, flags.format);
    }

    let limit = effective_limit(args.limit, ctx.config.general.default_limit);
    let response = HistoryResponse {
        summary: ctx.pipeline.current_summary(&args.case).await?,
        versions: ctx.pipeline.history(&args.case, limit).await?,
    };
    output(&response, flags.format)
}
