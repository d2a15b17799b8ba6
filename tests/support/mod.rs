// ABOUTME: In-memory registry used by integration tests.
// ABOUTME: Scripted listing pages, scripted delete behavior, and call recording.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::StreamExt;
use registry_prune::registry::{
    BatchDeleteResponse, ImagePages, RegistryClient, RegistryError, ReportedFailure,
    ReportedImage,
};
use registry_prune::types::{ImageIdentifier, ImageRecord, RepositoryName};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// How the fake answers delete requests.
#[derive(Debug, Clone)]
pub enum DeleteBehavior {
    /// Every submitted image is reported deleted.
    DeleteAll,
    /// Listed digests are rejected with (code, reason); the rest succeed.
    Reject(HashMap<String, (String, String)>),
    /// The call fails as a whole.
    Fail(RegistryError),
    /// Calls before the given index delete everything; later calls fail.
    FailFrom(usize, RegistryError),
    /// The call never completes.
    Hang,
}

pub struct FakeRegistry {
    pages: Vec<Result<Vec<ImageRecord>, RegistryError>>,
    delete: DeleteBehavior,
    max_batch: Option<NonZeroUsize>,
    page_fetches: AtomicUsize,
    deletes: Mutex<Vec<Vec<ImageIdentifier>>>,
}

impl FakeRegistry {
    pub fn new(pages: Vec<Result<Vec<ImageRecord>, RegistryError>>) -> Self {
        Self {
            pages,
            delete: DeleteBehavior::DeleteAll,
            max_batch: None,
            page_fetches: AtomicUsize::new(0),
            deletes: Mutex::new(Vec::new()),
        }
    }

    /// A registry whose listing is a single page.
    pub fn single_page(images: Vec<ImageRecord>) -> Self {
        Self::new(vec![Ok(images)])
    }

    pub fn with_delete(mut self, behavior: DeleteBehavior) -> Self {
        self.delete = behavior;
        self
    }

    pub fn rejecting(self, digest: &str, code: &str, reason: &str) -> Self {
        let mut rejected = match self.delete {
            DeleteBehavior::Reject(ref map) => map.clone(),
            _ => HashMap::new(),
        };
        rejected.insert(digest.to_string(), (code.to_string(), reason.to_string()));
        self.with_delete(DeleteBehavior::Reject(rejected))
    }

    pub fn with_max_batch(mut self, limit: usize) -> Self {
        self.max_batch = NonZeroUsize::new(limit);
        self
    }

    pub fn page_fetches(&self) -> usize {
        self.page_fetches.load(Ordering::SeqCst)
    }

    /// Identifiers of each delete request, in call order.
    pub fn delete_calls(&self) -> Vec<Vec<ImageIdentifier>> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistryClient for FakeRegistry {
    fn list_images<'a>(&'a self, _repository: &'a RepositoryName) -> ImagePages<'a> {
        Box::pin(futures::stream::iter(self.pages.clone()).map(move |page| {
            self.page_fetches.fetch_add(1, Ordering::SeqCst);
            page
        }))
    }

    async fn batch_delete(
        &self,
        _repository: &RepositoryName,
        images: &[ImageIdentifier],
    ) -> Result<BatchDeleteResponse, RegistryError> {
        let call = {
            let mut deletes = self.deletes.lock().unwrap();
            deletes.push(images.to_vec());
            deletes.len() - 1
        };

        let rejected = match self.delete {
            DeleteBehavior::DeleteAll => HashMap::new(),
            DeleteBehavior::FailFrom(first_failing, ref err) if call >= first_failing => {
                return Err(err.clone());
            }
            DeleteBehavior::FailFrom(..) => HashMap::new(),
            DeleteBehavior::Reject(ref map) => map.clone(),
            DeleteBehavior::Fail(ref err) => return Err(err.clone()),
            DeleteBehavior::Hang => std::future::pending().await,
        };

        let mut response = BatchDeleteResponse::default();
        for image in images {
            match rejected.get(image.digest()) {
                Some((code, reason)) => response.failed.push(ReportedFailure {
                    image: Some(ReportedImage::from(image)),
                    code: Some(code.clone()),
                    reason: Some(reason.clone()),
                }),
                None => response.succeeded.push(ReportedImage::from(image)),
            }
        }
        Ok(response)
    }

    fn max_batch_size(&self) -> Option<NonZeroUsize> {
        self.max_batch
    }
}

pub fn record(digest: &str, tags: &[&str]) -> ImageRecord {
    ImageRecord::new(digest, tags.iter().map(|t| t.to_string()).collect())
}

pub fn repository() -> RepositoryName {
    RepositoryName::new("team/app").unwrap()
}
