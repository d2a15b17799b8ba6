// ABOUTME: Output formatting for CI log feedback.
// ABOUTME: Supports normal, quiet, and JSON-lines output modes.

use crate::report::{Summary, render_counts, render_text, write_step_summary};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Only the summary and errors
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
#[derive(Debug)]
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing the run.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet mode).
    pub fn progress(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("{message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit("progress", message, false),
        }
    }

    /// Print a warning that does not fail the run.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => self.emit("warning", message, true),
        }
    }

    /// Print the final line with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => match self.duration() {
                Some(elapsed) if elapsed > 0.0 => println!("{message} ({:.1}s)", elapsed),
                _ => println!("{message}"),
            },
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => self.emit("success", message, false),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => self.emit("error", message, true),
        }
    }

    /// Print the run summary. Quiet mode prefixes the counts its progress
    /// lines would have shown.
    pub fn summary(&self, summary: &Summary) {
        match self.mode {
            OutputMode::Normal => println!("{}", render_text(summary)),
            OutputMode::Quiet => {
                if let Some(counts) = render_counts(summary) {
                    println!("{counts}");
                }
                println!("{}", render_text(summary));
            }
            OutputMode::Json => {
                let event = JsonSummaryEvent {
                    event: "summary",
                    summary,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print the summary, then append it to the step summary file if one is
    /// configured. A failed append is only a warning.
    pub fn publish(&self, summary: &Summary, step_summary: Option<&Path>) {
        self.summary(summary);

        if let Some(path) = step_summary {
            if let Err(e) = write_step_summary(path, summary) {
                self.warning(&format!(
                    "failed to write step summary to {}: {}",
                    path.display(),
                    e
                ));
            }
        }
    }

    fn emit(&self, event: &str, message: &str, to_stderr: bool) {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.duration(),
        };
        if let Ok(json) = serde_json::to_string(&event) {
            if to_stderr {
                eprintln!("{json}");
            } else {
                println!("{json}");
            }
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct JsonSummaryEvent<'a> {
    event: &'a str,
    summary: &'a Summary,
}
