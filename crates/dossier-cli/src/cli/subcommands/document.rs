use clap::Subcommand;

/// Uploaded document commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DocumentCommands {
    /// Register a document for a case.
    Add {
        #[arg(long)]
        case: String,
        #[arg(long)]
        name: String,
        /// File holding the document text.
        #[arg(long)]
        input: Option<String>,
    },
    /// List a case's documents.
    List {
        #[arg(long)]
        case: String,
    },
    /// Verification records for a document.
    Verifications { id: String },
}
