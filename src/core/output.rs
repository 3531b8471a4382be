//! Public output types for rewrite runs.
//!
//! A `RunReport` is what both the text and JSON front ends render, and what
//! library consumers get back from `rewrite::run`.

use serde::Serialize;

use crate::error::Error;

// ============================================================================
// Per-file outcomes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Updated,
    WouldUpdate,
    Unchanged,
    Excluded,
    Failed,
}

/// Error recorded against a single file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeError {
    pub code: String,
    pub message: String,
}

impl From<&Error> for OutcomeError {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code.as_str().to_string(),
            message: err.summary(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub path: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "is_zero")]
    pub replacements: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl FileOutcome {
    pub fn new(path: impl Into<String>, status: OutcomeStatus, replacements: usize) -> Self {
        Self {
            path: path.into(),
            status,
            replacements,
            error: None,
        }
    }

    pub fn failed(path: impl Into<String>, err: &Error) -> Self {
        Self {
            path: path.into(),
            status: OutcomeStatus::Failed,
            replacements: 0,
            error: Some(OutcomeError::from(err)),
        }
    }
}

// ============================================================================
// Run report
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub excluded: usize,
    pub failed: usize,
    pub replacements: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_source: Option<String>,
    pub files: Vec<FileOutcome>,
    pub summary: RunSummary,
}

impl RunReport {
    /// Build a report from outcomes in processing order.
    pub fn from_outcomes(files: Vec<FileOutcome>, dry_run: bool) -> Self {
        let mut summary = RunSummary {
            total: files.len(),
            ..RunSummary::default()
        };

        for outcome in &files {
            match outcome.status {
                OutcomeStatus::Updated | OutcomeStatus::WouldUpdate => summary.updated += 1,
                OutcomeStatus::Unchanged => summary.unchanged += 1,
                OutcomeStatus::Excluded => summary.excluded += 1,
                OutcomeStatus::Failed => summary.failed += 1,
            }
            summary.replacements += outcome.replacements;
        }

        Self {
            dry_run,
            map_source: None,
            files,
            summary,
        }
    }

    pub fn with_map_source(mut self, source: impl Into<String>) -> Self {
        self.map_source = Some(source.into());
        self
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}
