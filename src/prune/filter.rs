// ABOUTME: Selects dangling (untagged) images from a listing.
// ABOUTME: Pure and order preserving.

use crate::types::{ImageIdentifier, ImageRecord};
use nonempty::NonEmpty;

/// Records with no tags, in listing order.
pub fn dangling(records: &[ImageRecord]) -> Vec<&ImageRecord> {
    records.iter().filter(|r| r.is_dangling()).collect()
}

/// Identifiers to delete, or `None` when nothing is dangling.
pub fn deletion_candidates(records: &[ImageRecord]) -> Option<NonEmpty<ImageIdentifier>> {
    NonEmpty::from_vec(
        dangling(records)
            .into_iter()
            .map(ImageRecord::identifier)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(digest: &str, tags: &[&str]) -> ImageRecord {
        ImageRecord::new(digest, tags.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn keeps_only_untagged_in_order() {
        let records = vec![
            record("d1", &["v1"]),
            record("d2", &[]),
            record("d3", &["latest", "v2"]),
            record("d4", &[]),
        ];

        let digests: Vec<&str> = dangling(&records)
            .iter()
            .map(|r| r.digest.as_str())
            .collect();
        assert_eq!(digests, ["d2", "d4"]);
    }

    #[test]
    fn no_candidates_when_everything_is_tagged() {
        let records = vec![record("d1", &["v1"]), record("d2", &["v2"])];
        assert!(deletion_candidates(&records).is_none());
        assert!(deletion_candidates(&[]).is_none());
    }

    #[test]
    fn candidates_are_untagged_identifiers() {
        let records = vec![record("d1", &["v1"]), record("d2", &[])];
        let candidates = deletion_candidates(&records).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates.head, ImageIdentifier::untagged("d2"));
    }
}
