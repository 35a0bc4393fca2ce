pub mod ledger;
pub mod repo;
pub mod repo_types;

pub use ledger::SwipeLedger;
pub use repo::SwipeStore;
pub use repo_types::SwipeEdge;
