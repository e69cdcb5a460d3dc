use clap::Subcommand;

/// Recommender commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RecommenderCommands {
    /// Add a recommender to a case.
    Add {
        #[arg(long)]
        case: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        relationship: Option<String>,
    },
    /// List a case's recommenders.
    List {
        #[arg(long)]
        case: String,
    },
}
