// ABOUTME: Prune run orchestration using the type state pattern.
// ABOUTME: Transitions consume self; `run` drives a repository from listing to outcomes.

use super::batch::batch_delete;
use super::enumerate::enumerate_images;
use super::error::AbortReason;
use super::filter::deletion_candidates;
use super::outcome::PruneResult;
use super::state::{Enumerating, Filtering, Pruning, Reporting};
use crate::cancel::Cancellation;
use crate::output::Output;
use crate::registry::RegistryClient;
use crate::types::{ImageIdentifier, ImageRecord, RepositoryName};
use nonempty::NonEmpty;

/// A prune run in progress, parameterized by its current state.
#[derive(Debug)]
pub struct Prune<S> {
    repository: RepositoryName,
    state: S,
}

/// Where a run goes after filtering.
#[derive(Debug)]
pub enum Filtered {
    /// Nothing dangling; no delete request will be sent.
    NothingToDelete(Prune<Reporting>),
    Pruning(Prune<Pruning>),
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Outcomes are known, even if some images could not be deleted.
    Completed(PruneResult),
    Aborted(AbortReason),
}

impl<S> Prune<S> {
    pub fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    fn transition<T>(self, state: T) -> Prune<T> {
        Prune {
            repository: self.repository,
            state,
        }
    }
}

impl Prune<Enumerating> {
    pub fn new(repository: RepositoryName) -> Self {
        Prune {
            repository,
            state: Enumerating,
        }
    }

    /// List every image in the repository.
    pub async fn enumerate<C>(
        self,
        client: &C,
        cancellation: &Cancellation,
    ) -> Result<Prune<Filtering>, AbortReason>
    where
        C: RegistryClient + ?Sized,
    {
        let records = enumerate_images(client, &self.repository, cancellation).await?;
        Ok(self.transition(Filtering { records }))
    }
}

impl Prune<Filtering> {
    pub fn records(&self) -> &[ImageRecord] {
        &self.state.records
    }

    /// Select dangling images and decide whether a delete is needed.
    pub fn filter(self) -> Filtered {
        let scanned = self.state.records.len();
        match deletion_candidates(&self.state.records) {
            Some(candidates) => {
                tracing::info!(repository = %self.repository, scanned, candidates = candidates.len(), "dangling images found");
                Filtered::Pruning(self.transition(Pruning {
                    scanned,
                    candidates,
                }))
            }
            None => {
                tracing::info!(repository = %self.repository, scanned, "no dangling images");
                Filtered::NothingToDelete(self.transition(Reporting {
                    result: PruneResult::nothing_to_delete(scanned),
                }))
            }
        }
    }
}

impl Prune<Pruning> {
    pub fn candidates(&self) -> &NonEmpty<ImageIdentifier> {
        &self.state.candidates
    }

    /// Delete the dangling images.
    ///
    /// Per-image refusals still produce `Ok`; only a failed request aborts.
    pub async fn prune<C>(
        self,
        client: &C,
        cancellation: &Cancellation,
    ) -> Result<Prune<Reporting>, AbortReason>
    where
        C: RegistryClient + ?Sized,
    {
        let outcomes = batch_delete(
            client,
            &self.repository,
            &self.state.candidates,
            cancellation,
        )
        .await?;

        let result = PruneResult {
            total_scanned: self.state.scanned,
            candidates_for_deletion: self.state.candidates.len(),
            outcomes,
        };
        tracing::info!(
            repository = %self.repository,
            deleted = result.deleted(),
            failed = result.failed(),
            "batch delete finished"
        );

        Ok(self.transition(Reporting { result }))
    }
}

impl Prune<Reporting> {
    pub fn result(&self) -> &PruneResult {
        &self.state.result
    }

    pub fn into_result(self) -> PruneResult {
        self.state.result
    }
}

/// Run the whole pipeline for one repository.
///
/// Progress lines go to `output`; the caller renders the outcome.
pub async fn run<C>(
    client: &C,
    repository: RepositoryName,
    cancellation: &Cancellation,
    output: &Output,
) -> RunOutcome
where
    C: RegistryClient + ?Sized,
{
    output.progress(&format!("→ listing images in {repository}..."));
    let listed = match Prune::new(repository).enumerate(client, cancellation).await {
        Ok(listed) => listed,
        Err(reason) => return abort(reason, output),
    };
    output.progress(&format!("✓ fetched images: {}", listed.records().len()));

    let pruning = match listed.filter() {
        Filtered::NothingToDelete(done) => {
            output.progress("✓ no images to remove");
            return RunOutcome::Completed(done.into_result());
        }
        Filtered::Pruning(pruning) => pruning,
    };

    output.progress(&format!(
        "attempting to remove: {} images",
        pruning.candidates().len()
    ));

    match pruning.prune(client, cancellation).await {
        Ok(done) => RunOutcome::Completed(done.into_result()),
        Err(reason) => abort(reason, output),
    }
}

fn abort(reason: AbortReason, output: &Output) -> RunOutcome {
    tracing::error!(kind = ?reason.kind(), "prune run aborted: {reason}");
    output.error(&format!("✗ {reason} ({})", reason.advice()));
    RunOutcome::Aborted(reason)
}
