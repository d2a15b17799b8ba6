// ABOUTME: Registry client backed by the Amazon ECR Public SDK.
// ABOUTME: Manual DescribeImages pagination and BatchDeleteImage with SDK retry/timeout policy.

use super::client::{
    BatchDeleteResponse, ImagePages, RegistryClient, ReportedFailure, ReportedImage,
};
use super::error::RegistryError;
use crate::types::{ImageIdentifier, ImageRecord, RepositoryName};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_ecrpublic::Client;
use aws_sdk_ecrpublic::config::{Credentials, Region};
use aws_sdk_ecrpublic::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ecrpublic::types::{ImageDetail, ImageFailure, ImageIdentifier as EcrImageIdentifier};
use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

/// ECR Public only serves its API from this region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// BatchDeleteImage accepts at most this many image ids.
const MAX_IDS_PER_DELETE: usize = 100;

const CREDENTIALS_PROVIDER: &str = "registry-prune";

/// Connection settings for [`EcrPublicClient`].
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    pub region: String,
    pub credentials: Option<StaticCredentials>,
    /// Per-operation timeout, including retries.
    pub timeout: Option<Duration>,
    pub max_attempts: u32,
}

/// Access key pair. The secret never appears in debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// [`RegistryClient`] for Amazon ECR Public.
#[derive(Debug, Clone)]
pub struct EcrPublicClient {
    client: Client,
}

impl EcrPublicClient {
    /// Build a client. Without explicit credentials the default AWS provider
    /// chain is used.
    pub async fn connect(settings: &RegistrySettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .retry_config(RetryConfig::standard().with_max_attempts(settings.max_attempts.max(1)));

        if let Some(timeout) = settings.timeout {
            loader = loader.timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(timeout)
                    .build(),
            );
        }

        if let Some(ref creds) = settings.credentials {
            loader = loader.credentials_provider(Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                None,
                None,
                CREDENTIALS_PROVIDER,
            ));
        }

        let sdk_config = loader.load().await;
        tracing::debug!(region = %settings.region, "ECR Public client configured");

        Self {
            client: Client::new(&sdk_config),
        }
    }

    async fn describe_page(
        &self,
        repository: &RepositoryName,
        token: Option<String>,
    ) -> Result<(Vec<ImageRecord>, Cursor), RegistryError> {
        let output = self
            .client
            .describe_images()
            .repository_name(repository.as_str())
            .set_next_token(token)
            .send()
            .await
            .map_err(classify)?;

        let records = output
            .image_details()
            .iter()
            .filter_map(record_from_detail)
            .collect::<Vec<_>>();

        let next = match output.next_token() {
            Some(token) if !token.is_empty() => Cursor::Next(token.to_string()),
            _ => Cursor::Done,
        };

        Ok((records, next))
    }
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

#[async_trait]
impl RegistryClient for EcrPublicClient {
    fn list_images<'a>(&'a self, repository: &'a RepositoryName) -> ImagePages<'a> {
        Box::pin(futures::stream::try_unfold(
            Cursor::Start,
            move |cursor| async move {
                let token = match cursor {
                    Cursor::Done => return Ok(None),
                    Cursor::Start => None,
                    Cursor::Next(token) => Some(token),
                };
                self.describe_page(repository, token).await.map(Some)
            },
        ))
    }

    async fn batch_delete(
        &self,
        repository: &RepositoryName,
        images: &[ImageIdentifier],
    ) -> Result<BatchDeleteResponse, RegistryError> {
        let ids = images
            .iter()
            .map(|image| {
                EcrImageIdentifier::builder()
                    .image_digest(image.digest())
                    .set_image_tag(image.tag().map(str::to_string))
                    .build()
            })
            .collect::<Vec<_>>();

        let output = self
            .client
            .batch_delete_image()
            .repository_name(repository.as_str())
            .set_image_ids(Some(ids))
            .send()
            .await
            .map_err(classify)?;

        Ok(BatchDeleteResponse {
            succeeded: output.image_ids().iter().map(reported_image).collect(),
            failed: output.failures().iter().map(reported_failure).collect(),
        })
    }

    fn max_batch_size(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(MAX_IDS_PER_DELETE)
    }
}

fn record_from_detail(detail: &ImageDetail) -> Option<ImageRecord> {
    match detail.image_digest() {
        Some(digest) if !digest.is_empty() => Some(ImageRecord::new(
            digest,
            detail.image_tags().to_vec(),
        )),
        _ => {
            tracing::warn!(tags = ?detail.image_tags(), "skipping listed image without a digest");
            None
        }
    }
}

fn reported_image(id: &EcrImageIdentifier) -> ReportedImage {
    ReportedImage {
        digest: id.image_digest().map(str::to_string),
        tag: id.image_tag().map(str::to_string),
    }
}

fn reported_failure(failure: &ImageFailure) -> ReportedFailure {
    ReportedFailure {
        image: failure.image_id().map(reported_image),
        code: failure.failure_code().map(|code| code.as_str().to_string()),
        reason: failure.failure_reason().map(str::to_string),
    }
}

/// Map an SDK error onto the registry error taxonomy.
fn classify<E, R>(err: SdkError<E, R>) -> RegistryError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: fmt::Debug,
{
    let detail = DisplayErrorContext(&err).to_string();

    match &err {
        SdkError::TimeoutError(_) => RegistryError::Timeout(detail),
        SdkError::DispatchFailure(failure) if failure.is_timeout() => {
            RegistryError::Timeout(detail)
        }
        SdkError::ServiceError(service) => {
            let code = service.err().code().unwrap_or("Unknown").to_string();
            let message = service
                .err()
                .message()
                .map(str::to_string)
                .unwrap_or(detail);
            match code.as_str() {
                "RepositoryNotFoundException" => RegistryError::RepositoryNotFound(message),
                "UnrecognizedClientException"
                | "InvalidSignatureException"
                | "AccessDeniedException"
                | "ExpiredTokenException" => RegistryError::Authentication(message),
                _ => RegistryError::Service { code, message },
            }
        }
        _ => RegistryError::Transport(detail),
    }
}
