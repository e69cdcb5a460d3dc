use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `dossier` binary.
#[derive(Debug, Parser)]
#[command(
    name = "dossier",
    version,
    about = "Dossier - petition evidence extraction and case analysis"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only, no progress)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to auto-detect via .dossier)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use dossier_core::enums::Criterion;

    use super::{Cli, Commands, OutputFormat};
    use crate::cli::root_commands::StageName;
    use crate::cli::subcommands::{DocumentCommands, SchemaCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "dossier", "--format", "raw", "--verbose", "history", "--case", "case-1",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::History(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["dossier", "risk", "--case", "case-1", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Risk(ref args) if args.case == "case-1"));
    }

    #[test]
    fn output_format_rejects_table() {
        let parsed = Cli::try_parse_from(["dossier", "--format", "table", "schema", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn stage_names_map_to_cascade_stages() {
        let cli = Cli::try_parse_from(["dossier", "stage", "consolidate", "--case", "case-1"])
            .expect("cli should parse");
        let Commands::Stage(args) = cli.command else {
            panic!("expected stage command");
        };
        assert_eq!(args.stage, StageName::Consolidate);
        assert_eq!(
            args.stage.pipeline_stage(),
            dossier_core::enums::PipelineStage::Consolidation
        );
    }

    #[test]
    fn verify_parses_comma_separated_criteria() {
        let cli = Cli::try_parse_from([
            "dossier",
            "verify",
            "--case",
            "case-1",
            "--document",
            "doc-1",
            "--input",
            "letter.txt",
            "--criteria",
            "C1,c4",
        ])
        .expect("cli should parse");
        let Commands::Verify(args) = cli.command else {
            panic!("expected verify command");
        };
        assert_eq!(args.criteria, vec![Criterion::Awards, Criterion::Judging]);
    }

    #[test]
    fn verify_rejects_unknown_criterion() {
        let parsed = Cli::try_parse_from([
            "dossier", "verify", "--case", "c", "--document", "d", "--input", "f", "--criteria",
            "C11",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn nested_subcommands_parse() {
        let cli = Cli::try_parse_from(["dossier", "schema", "show", "gap_analysis"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Schema { action: SchemaCommands::Show { ref name } } if name == "gap_analysis"
        ));

        let cli = Cli::try_parse_from([
            "dossier", "document", "add", "--case", "case-1", "--name", "cv.pdf",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Document { action: DocumentCommands::Add { .. } }
        ));
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["dossier", "--project", "/tmp/demo", "schema", "list"])
            .expect("cli should parse");
        let flags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }
}
