pub mod branches;
pub mod cache;
pub mod clone;
pub mod details;
pub mod diff;
pub mod history;
pub mod locator;
pub mod repository;

pub use cache::DiffCache;
pub use clone::CloneHandle;
pub use diff::DiffSettings;
pub use repository::GitRepository;
