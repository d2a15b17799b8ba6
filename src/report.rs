// ABOUTME: Turns a run outcome into a structured summary and a pass/fail decision.
// ABOUTME: Renders the summary as a markdown step summary or plain text lines.

use crate::prune::{AbortReason, DeletionOutcome, PruneResult, RunOutcome};
use crate::types::RepositoryName;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub const SUMMARY_TITLE: &str = "Batch deleted images";
pub const NOTHING_TO_REMOVE: &str = "no images to remove";
const DELETED_COMMENT: &str = "deleted";
const MISSING_FIELD: &str = "?";

/// Row status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Deleted,
    Failed,
}

impl RowStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            RowStatus::Deleted => "✓",
            RowStatus::Failed => "✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub status: RowStatus,
    /// Shortened digest.
    pub digest: String,
    pub comment: String,
}

impl From<&DeletionOutcome> for SummaryRow {
    fn from(outcome: &DeletionOutcome) -> Self {
        match outcome {
            DeletionOutcome::Success { image } => SummaryRow {
                status: RowStatus::Deleted,
                digest: image.short_digest(),
                comment: DELETED_COMMENT.to_string(),
            },
            DeletionOutcome::Failure {
                image,
                code,
                reason,
            } => SummaryRow {
                status: RowStatus::Failed,
                digest: image.short_digest(),
                comment: format!(
                    "{} - {}",
                    code.as_deref().unwrap_or(MISSING_FIELD),
                    reason.as_deref().unwrap_or(MISSING_FIELD)
                ),
            },
        }
    }
}

/// Presentation-neutral summary of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub title: String,
    pub repository: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<usize>,
    pub rows: Vec<SummaryRow>,
    /// Informational line shown instead of rows, or after them when a run aborted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Summary plus the decision whether the CI job should fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub should_fail: bool,
}

impl Report {
    /// Report a completed run. Fails iff any image could not be deleted.
    pub fn from_result(repository: &RepositoryName, result: &PruneResult) -> Self {
        let rows: Vec<SummaryRow> = result.outcomes.iter().map(SummaryRow::from).collect();
        let notice = rows.is_empty().then(|| NOTHING_TO_REMOVE.to_string());

        Report {
            summary: Summary {
                title: SUMMARY_TITLE.to_string(),
                repository: repository.to_string(),
                scanned: Some(result.total_scanned),
                candidates: Some(result.candidates_for_deletion),
                rows,
                notice,
            },
            should_fail: result.has_failures(),
        }
    }

    /// Report a run that stopped early. Always fails.
    ///
    /// Outcomes already known when a later delete request failed keep their rows.
    pub fn aborted(repository: &RepositoryName, reason: &AbortReason) -> Self {
        Report {
            summary: Summary {
                title: SUMMARY_TITLE.to_string(),
                repository: repository.to_string(),
                scanned: None,
                candidates: None,
                rows: reason
                    .completed_outcomes()
                    .iter()
                    .map(SummaryRow::from)
                    .collect(),
                notice: Some(format!("✗ {reason}; {}", reason.advice())),
            },
            should_fail: true,
        }
    }

    pub fn from_outcome(repository: &RepositoryName, outcome: &RunOutcome) -> Self {
        match outcome {
            RunOutcome::Completed(result) => Self::from_result(repository, result),
            RunOutcome::Aborted(reason) => Self::aborted(repository, reason),
        }
    }

    pub fn exit_code(&self) -> u8 {
        u8::from(self.should_fail)
    }
}

/// One line with the image counts, when the run got far enough to know them.
pub fn render_counts(summary: &Summary) -> Option<String> {
    let scanned = summary.scanned?;
    let candidates = summary.candidates?;
    Some(format!(
        "fetched images: {scanned}, attempting to remove: {candidates}"
    ))
}

/// Plain lines: the title followed by `✓ abcd...wxyz deleted` rows, or just
/// the notice when there are no rows.
pub fn render_text(summary: &Summary) -> String {
    if summary.rows.is_empty() {
        return summary
            .notice
            .clone()
            .unwrap_or_else(|| NOTHING_TO_REMOVE.to_string());
    }

    let mut lines = vec![summary.title.clone()];
    lines.extend(summary.rows.iter().map(|row| {
        format!("{} {} {}", row.status.symbol(), row.digest, row.comment)
    }));
    if let Some(ref notice) = summary.notice {
        lines.push(notice.clone());
    }
    lines.join("\n")
}

/// Markdown for a CI step summary: a heading and one table row per outcome.
pub fn render_markdown(summary: &Summary) -> String {
    if summary.rows.is_empty() {
        let notice = summary.notice.as_deref().unwrap_or(NOTHING_TO_REMOVE);
        return format!("{notice}\n");
    }

    let mut out = format!("### {}\n\n", summary.title);
    out.push_str("| Status | Digest | Comment |\n");
    out.push_str("| :---: | --- | --- |\n");
    for row in &summary.rows {
        out.push_str(&format!(
            "| {} | `{}` | {} |\n",
            row.status.symbol(),
            row.digest,
            escape_cell(&row.comment)
        ));
    }
    if let Some(ref notice) = summary.notice {
        out.push_str(&format!("\n{notice}\n"));
    }
    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Append the markdown summary to a step summary file, creating it if needed.
pub fn write_step_summary(path: &Path, summary: &Summary) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(render_markdown(summary).as_bytes())
}
