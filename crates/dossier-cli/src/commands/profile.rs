use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProfileArgs;
use crate::commands::shared::input::parse_object;
use crate::context::AppContext;
use crate::output::output;

/// Handle `dossier profile`. Without `--patch`, prints the stored profile.
pub async fn handle(args: &ProfileArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let profile = match args.patch.as_deref() {
        Some(raw) => {
            let patch = parse_object(raw, "--patch")?;
            ctx.pipeline.update_profile(&args.case, patch).await?
        }
        None => ctx
            .store()
            .get_profile(&args.case)
            .await?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new())),
    };
    output(&profile, flags.format)
}
