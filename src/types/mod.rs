// ABOUTME: Validated domain types for registry images and repositories.
// ABOUTME: Shared by the registry client, pruning pipeline, and reporter.

mod image;
mod repository_name;

pub use image::{ImageIdentifier, ImageRecord, UNKNOWN_DIGEST, short_digest};
pub use repository_name::{RepositoryName, RepositoryNameError};
