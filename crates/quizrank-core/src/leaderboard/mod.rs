pub mod ranking;
pub mod reconcile;
pub mod types;
