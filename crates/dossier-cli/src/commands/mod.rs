pub mod agent;
pub mod dispatch;
pub mod document;
pub mod extract;
pub mod history;
pub mod profile;
pub mod reanalyze;
pub mod recommender;
pub mod risk;
pub mod schema;
pub mod shared;
pub mod stage;
pub mod update;
pub mod verify;
