// ABOUTME: Registry client trait consumed by the pruning pipeline.
// ABOUTME: Paged image listing plus one batch delete mutation.

use super::error::RegistryError;
use crate::types::{ImageIdentifier, ImageRecord, RepositoryName};
use async_trait::async_trait;
use futures::Stream;
use std::num::NonZeroUsize;
use std::pin::Pin;

/// Lazy sequence of listing pages. Ends when the registry has no next page.
pub type ImagePages<'a> =
    Pin<Box<dyn Stream<Item = Result<Vec<ImageRecord>, RegistryError>> + Send + 'a>>;

/// The two registry operations pruning needs.
///
/// Retry and timeout policy belong to implementations; callers never retry.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// List every image in a repository, one page at a time.
    fn list_images<'a>(&'a self, repository: &'a RepositoryName) -> ImagePages<'a>;

    /// Delete a set of images in a single request.
    async fn batch_delete(
        &self,
        repository: &RepositoryName,
        images: &[ImageIdentifier],
    ) -> Result<BatchDeleteResponse, RegistryError>;

    /// Largest number of identifiers one delete request may carry.
    fn max_batch_size(&self) -> Option<NonZeroUsize> {
        None
    }
}

/// An image id as echoed back by the registry. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportedImage {
    pub digest: Option<String>,
    pub tag: Option<String>,
}

impl ReportedImage {
    /// Whether this report refers to the given submitted identifier.
    ///
    /// Digests must agree when both are present; a missing digest falls back
    /// to the tag.
    pub fn refers_to(&self, image: &ImageIdentifier) -> bool {
        match self.digest.as_deref() {
            Some(digest) => {
                digest == image.digest()
                    && (self.tag.is_none() || self.tag.as_deref() == image.tag())
            }
            None => self.tag.is_some() && self.tag.as_deref() == image.tag(),
        }
    }
}

impl From<&ImageIdentifier> for ReportedImage {
    fn from(image: &ImageIdentifier) -> Self {
        Self {
            digest: Some(image.digest().to_string()),
            tag: image.tag().map(str::to_string),
        }
    }
}

/// A per-image rejection inside an otherwise successful delete call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportedFailure {
    pub image: Option<ReportedImage>,
    pub code: Option<String>,
    pub reason: Option<String>,
}

/// Raw result of one batch delete request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDeleteResponse {
    pub succeeded: Vec<ReportedImage>,
    pub failed: Vec<ReportedFailure>,
}
