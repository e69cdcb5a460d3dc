use anyhow::Context;
use dossier_schema::SchemaRegistry;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SchemaCommands;
use crate::output::output;

/// Handle `dossier schema`. Needs no project or configuration.
pub fn handle(action: &SchemaCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    match action {
        SchemaCommands::List => output(&registry.list(), flags.format),
        SchemaCommands::Show { name } => {
            let schema = registry
                .get(name)
                .with_context(|| format!("unknown schema '{name}' (see `dossier schema list`)"))?;
            output(schema, flags.format)
        }
    }
}
