//! Database models and queries

pub mod init;
pub mod models;
pub mod quotes;
pub mod sources;

pub use init::*;
pub use models::*;
