//! Data transfer objects (DTOs) for engine responses.
//!
//! All structs serialize to camelCase JSON for the presentation layer.
//! - `repository`: RepositorySummary, BranchInfo, setup/clone confirmations
//! - `commit`: CommitSummary, CommitPage, CommitDetails, Reference
//! - `diff`: FileChange, ChangeStatus, CommitStats

pub mod commit;
pub mod diff;
pub mod repository;

pub use commit::*;
pub use diff::*;
pub use repository::*;
