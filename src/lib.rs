//! Git workspace inspection engine.
//!
//! Discovers the git repositories directly under a workspace directory,
//! summarizes them, lists their branches and history, assembles full commit
//! records with per-file diff statistics, and clones new repositories into
//! the workspace.
//!
//! - `engine`: async operation contract (`GitEngine`)
//! - `git`: synchronous git2-backed components
//! - `models`: serialized DTOs
//! - `routes`: HTTP binding of the operations
//! - `settings`: persisted workspace root for the binary

pub mod engine;
pub mod error;
pub mod git;
pub mod models;
pub mod routes;
pub mod settings;

pub use engine::{EngineConfig, GitEngine};
pub use error::{AppError, Result};
