// ABOUTME: Validated domain types shared across the deployer.
// ABOUTME: Remote repositories, byte sizes, and short digests.

mod digest;
mod repository;
mod size;

pub use digest::short_digest;
pub use repository::{RemoteRepository, RemoteRepositoryError};
pub use size::ByteSize;
