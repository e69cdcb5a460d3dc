mod document;
mod recommender;
mod schema;

pub use document::DocumentCommands;
pub use recommender::RecommenderCommands;
pub use schema::SchemaCommands;
