// ABOUTME: Image records returned by the registry and identifiers used for deletion.
// ABOUTME: Also renders digests in their shortened display form.

use serde::Serialize;
use std::fmt;

/// Placeholder shown when a digest is missing.
pub const UNKNOWN_DIGEST: &str = "unknown";

const SHORT_DIGEST_EDGE: usize = 4;

/// Identifies one image for a delete request.
///
/// Two identifiers are equal iff both digest and tag are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageIdentifier {
    digest: String,
    tag: Option<String>,
}

impl ImageIdentifier {
    pub fn new(digest: impl Into<String>, tag: Option<String>) -> Self {
        Self {
            digest: digest.into(),
            tag,
        }
    }

    /// Identifier for an image addressed by digest alone.
    pub fn untagged(digest: impl Into<String>) -> Self {
        Self::new(digest, None)
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn short_digest(&self) -> String {
        short_digest(&self.digest)
    }
}

impl fmt::Display for ImageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digest)?;
        if let Some(ref tag) = self.tag {
            write!(f, ":{}", tag)?;
        }
        Ok(())
    }
}

/// One image as listed by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub digest: String,
    pub tags: Vec<String>,
}

impl ImageRecord {
    pub fn new(digest: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            digest: digest.into(),
            tags,
        }
    }

    /// A record is dangling when no tag points at it.
    pub fn is_dangling(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn identifier(&self) -> ImageIdentifier {
        ImageIdentifier::untagged(self.digest.clone())
    }
}

/// Shorten a digest to its first and last four hex characters.
///
/// The algorithm prefix (`sha256:`) is dropped. Hex parts of eight characters
/// or fewer are returned whole.
pub fn short_digest(digest: &str) -> String {
    let hex = digest
        .split_once(':')
        .map(|(_, hex)| hex)
        .unwrap_or(digest)
        .trim();

    if hex.is_empty() {
        return UNKNOWN_DIGEST.to_string();
    }

    let chars: Vec<char> = hex.chars().collect();
    if chars.len() <= SHORT_DIGEST_EDGE * 2 {
        return hex.to_string();
    }

    let head: String = chars[..SHORT_DIGEST_EDGE].iter().collect();
    let tail: String = chars[chars.len() - SHORT_DIGEST_EDGE..].iter().collect();
    format!("{head}...{tail}")
}
