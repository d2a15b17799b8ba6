// ABOUTME: Registry access for listing and deleting repository images.
// ABOUTME: Defines the client trait and its ECR Public implementation.

mod client;
mod ecr_public;
mod error;

pub use client::{
    BatchDeleteResponse, ImagePages, RegistryClient, ReportedFailure, ReportedImage,
};
pub use ecr_public::{DEFAULT_REGION, EcrPublicClient, RegistrySettings, StaticCredentials};
pub use error::RegistryError;
