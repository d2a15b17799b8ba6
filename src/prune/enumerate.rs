// ABOUTME: Drains the registry's paged image listing into one collection.
// ABOUTME: Pages are fetched strictly in order; any page failure aborts the listing.

use super::error::EnumerationError;
use crate::cancel::Cancellation;
use crate::registry::{RegistryClient, RegistryError};
use crate::types::{ImageRecord, RepositoryName};
use futures::TryStreamExt;

/// Fetch every image in `repository`, following pages until the registry
/// reports no more.
///
/// An empty repository yields an empty vector. Cancellation is reported as a
/// page failure with [`RegistryError::Cancelled`].
pub async fn enumerate_images<C>(
    client: &C,
    repository: &RepositoryName,
    cancellation: &Cancellation,
) -> Result<Vec<ImageRecord>, EnumerationError>
where
    C: RegistryClient + ?Sized,
{
    let mut pages = client.list_images(repository);
    let mut images = Vec::new();
    let mut pages_fetched = 0;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(RegistryError::Cancelled),
            page = pages.try_next() => page,
        };

        match next {
            Ok(Some(page)) => {
                pages_fetched += 1;
                tracing::debug!(
                    repository = %repository,
                    page = pages_fetched,
                    images = page.len(),
                    "fetched image page"
                );
                images.extend(page);
            }
            Ok(None) => break,
            Err(source) => {
                tracing::error!(repository = %repository, pages_fetched, error = %source, "image listing failed");
                return Err(EnumerationError {
                    pages_fetched,
                    images_fetched: images.len(),
                    source,
                });
            }
        }
    }

    tracing::info!(repository = %repository, pages = pages_fetched, images = images.len(), "image listing complete");
    Ok(images)
}
