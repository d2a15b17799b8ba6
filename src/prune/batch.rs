// ABOUTME: Issues the batch delete request and normalizes its mixed response.
// ABOUTME: Produces exactly one outcome per submitted identifier, in submission order.

use super::error::BatchCallError;
use super::outcome::DeletionOutcome;
use crate::cancel::Cancellation;
use crate::registry::{BatchDeleteResponse, RegistryClient, RegistryError, ReportedImage};
use crate::types::{ImageIdentifier, RepositoryName};
use nonempty::NonEmpty;

/// Reason recorded for images the registry response never mentioned.
pub const NOT_REPORTED: &str = "not reported by registry";

/// Delete `images` and report what happened to each one.
///
/// One request is sent unless the client declares a smaller batch limit, in
/// which case requests are sent one after another and their outcomes
/// concatenated. The first request that fails outright aborts the whole
/// batch, carrying the outcomes of the requests before it. Nothing is
/// retried here.
pub async fn batch_delete<C>(
    client: &C,
    repository: &RepositoryName,
    images: &NonEmpty<ImageIdentifier>,
    cancellation: &Cancellation,
) -> Result<Vec<DeletionOutcome>, BatchCallError>
where
    C: RegistryClient + ?Sized,
{
    let submitted: Vec<ImageIdentifier> = images.iter().cloned().collect();
    let chunk_size = client
        .max_batch_size()
        .map_or(submitted.len(), |limit| limit.get());
    let mut outcomes = Vec::with_capacity(submitted.len());

    for chunk in submitted.chunks(chunk_size) {
        tracing::debug!(repository = %repository, images = chunk.len(), "sending batch delete");

        let response = tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(RegistryError::Cancelled),
            response = client.batch_delete(repository, chunk) => response,
        };

        match response {
            Ok(response) => outcomes.extend(match_outcomes(chunk, response)),
            Err(source) => {
                tracing::error!(
                    repository = %repository,
                    processed = outcomes.len(),
                    error = %source,
                    "batch delete call failed"
                );
                return Err(BatchCallError {
                    attempted: submitted.len(),
                    completed: outcomes,
                    source,
                });
            }
        }
    }

    Ok(outcomes)
}

/// Pair each submitted identifier with what the registry said about it.
///
/// Reports that match nothing, or match an identifier already accounted for,
/// are logged and dropped. Identifiers the registry skipped become failures.
fn match_outcomes(
    submitted: &[ImageIdentifier],
    response: BatchDeleteResponse,
) -> Vec<DeletionOutcome> {
    let mut slots: Vec<Option<DeletionOutcome>> = vec![None; submitted.len()];

    for reported in response.succeeded {
        match claim(submitted, &slots, &reported) {
            Some(index) => {
                slots[index] = Some(DeletionOutcome::Success {
                    image: submitted[index].clone(),
                });
            }
            None => tracing::warn!(?reported, "ignoring deletion the registry reported for an unsubmitted image"),
        }
    }

    for failure in response.failed {
        let index = failure
            .image
            .as_ref()
            .and_then(|reported| claim(submitted, &slots, reported));
        match index {
            Some(index) => {
                slots[index] = Some(DeletionOutcome::Failure {
                    image: submitted[index].clone(),
                    code: failure.code,
                    reason: failure.reason,
                });
            }
            None => tracing::warn!(?failure, "ignoring failure the registry reported for an unsubmitted image"),
        }
    }

    slots
        .into_iter()
        .zip(submitted)
        .map(|(slot, image)| {
            slot.unwrap_or_else(|| {
                tracing::warn!(image = %image, "registry response did not mention image");
                DeletionOutcome::Failure {
                    image: image.clone(),
                    code: None,
                    reason: Some(NOT_REPORTED.to_string()),
                }
            })
        })
        .collect()
}

fn claim(
    submitted: &[ImageIdentifier],
    slots: &[Option<DeletionOutcome>],
    reported: &ReportedImage,
) -> Option<usize> {
    submitted
        .iter()
        .zip(slots)
        .position(|(image, slot)| slot.is_none() && reported.refers_to(image))
}
