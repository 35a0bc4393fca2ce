pub mod repo;
pub mod repo_types;
pub mod services;

pub use repo::MatchStore;
pub use repo_types::MatchRecord;
pub use services::{MatchEngine, MatchEntry, SwipeOutcome};
