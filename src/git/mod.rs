pub mod executor;
pub mod failure;
pub mod log;
pub mod repository;
pub mod revision;
pub mod status;
pub mod tags;
pub mod version;

// Re-export commonly used types
pub use executor::{CommandRunner, GitCommand, GitExecutor};
pub use failure::FailureKind;
pub use log::{LogAccumulator, parse_revisions};
pub use repository::Repository;
pub use revision::Revision;
pub use status::{StatusReport, is_clean_status, parse_status};
pub use tags::{TagMap, parse_tag_listing};
pub use version::GitVersion;
