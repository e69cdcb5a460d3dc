use anyhow::Context;
use dossier_core::entities::CriterionUpdate;
use dossier_schema::{SchemaRegistry, names};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::UpdateArgs;
use crate::commands::shared::input::read_text;
use crate::context::AppContext;
use crate::output::output;

/// Handle `dossier update`.
pub async fn handle(args: &UpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = read_text(&args.file)?;
    let updates = parse_updates(&raw)?;
    let version = ctx.pipeline.apply_updates(&args.case, &updates).await?;
    output(&version, flags.format)
}

/// Accept a bare array or `{"updates": [...]}` and validate against the
/// registered schema.
fn parse_updates(raw: &str) -> anyhow::Result<Vec<CriterionUpdate>> {
    let mut value: serde_json::Value =
        serde_json::from_str(raw).context("updates file is not valid JSON")?;
    if let Some(inner) = value.get_mut("updates") {
        value = inner.take();
    }
    SchemaRegistry::new()
        .decode(names::CRITERION_UPDATES, value)
        .map_err(|error| anyhow::anyhow!("invalid criterion updates: {error}"))
}
