//! Directory discovery and run orchestration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use rayon::prelude::*;

use super::file::{process_file, ExclusionSet, FileChange, FileTask};
use crate::error::{Error, Result};
use crate::identifier_map::IdentifierMap;
use crate::lexer::Tokenizer;
use crate::output::{FileOutcome, OutcomeStatus, RunReport};

/// Extensions picked up by directory discovery (compared lower-cased).
pub const DISCOVERY_EXTENSIONS: &[&str] = &["c", "h", "cpp", "hpp", "f", "f90", "cu"];

/// Inputs of one run. Directory files come first, then explicit files;
/// repeated paths are processed once, at their first position.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub directory: Option<PathBuf>,
    /// Processed as given, without the extension allow-list.
    pub files: Vec<PathBuf>,
    pub excluded: ExclusionSet,
    pub dry_run: bool,
    /// Worker threads. 1 processes files sequentially, 0 uses one per CPU.
    pub jobs: usize,
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            directory: None,
            files: Vec::new(),
            excluded: ExclusionSet::new(),
            dry_run: false,
            jobs: 1,
        }
    }
}

pub fn has_discovery_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            DISCOVERY_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Recursively find candidate source files under `root`, sorted.
///
/// Hidden files and directories are skipped, as are paths that are not
/// regular files.
pub fn discover_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::validation_invalid_argument(
            "directory",
            format!("Not a directory: {}", root.display()),
            Some(root.display().to_string()),
        ));
    }

    let escaped = Pattern::escape(&root.to_string_lossy());
    let pattern = Path::new(&escaped).join("**").join("*");
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut files: Vec<PathBuf> = glob::glob_with(&pattern.to_string_lossy(), options)
        .map_err(|e| {
            Error::validation_invalid_argument(
                "directory",
                format!("Invalid directory pattern: {}", e),
                Some(root.display().to_string()),
            )
        })?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file() && has_discovery_extension(p))
        .collect();

    files.sort();
    Ok(files)
}

/// Process every requested file and collect one outcome per path.
///
/// Per-file errors become `failed` outcomes and never stop the run. Only
/// pre-flight problems (bad directory, thread pool setup) return `Err`.
pub fn run(
    request: &RunRequest,
    map: &IdentifierMap,
    tokenizer: &dyn Tokenizer,
) -> Result<RunReport> {
    run_with_progress(request, map, tokenizer, |_| {})
}

/// Like [`run`], calling `on_outcome` once per file in report order.
///
/// Sequential runs call it as each file finishes. Parallel runs call it
/// after the pool drains.
pub fn run_with_progress<F>(
    request: &RunRequest,
    map: &IdentifierMap,
    tokenizer: &dyn Tokenizer,
    mut on_outcome: F,
) -> Result<RunReport>
where
    F: FnMut(&FileOutcome),
{
    let mut paths = match &request.directory {
        Some(dir) => discover_files(dir)?,
        None => Vec::new(),
    };
    paths.extend(request.files.iter().cloned());

    // A path named twice (discovered and listed, or listed twice) is one task.
    let mut seen = HashSet::new();
    paths.retain(|path| seen.insert(path.clone()));

    let process = |path: &PathBuf| -> FileOutcome {
        let task = FileTask::new(path, map, &request.excluded);
        outcome_for(path, process_file(&task, tokenizer, request.dry_run))
    };

    let outcomes: Vec<FileOutcome> = if request.jobs == 1 {
        paths
            .iter()
            .map(|path| {
                let outcome = process(path);
                on_outcome(&outcome);
                outcome
            })
            .collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(request.jobs)
            .build()
            .map_err(|e| Error::internal_unexpected(format!("worker pool: {}", e)))?;
        log_status!(
            "rewrite",
            "Processing {} files on {} threads",
            paths.len(),
            pool.current_num_threads()
        );
        let outcomes: Vec<FileOutcome> =
            pool.install(|| paths.par_iter().map(process).collect());
        outcomes.iter().for_each(&mut on_outcome);
        outcomes
    };

    Ok(RunReport::from_outcomes(outcomes, request.dry_run))
}

fn outcome_for(path: &Path, result: Result<FileChange>) -> FileOutcome {
    let display = path.display().to_string();
    match result {
        Ok(FileChange::Excluded) => FileOutcome::new(display, OutcomeStatus::Excluded, 0),
        Ok(FileChange::Unchanged) => FileOutcome::new(display, OutcomeStatus::Unchanged, 0),
        Ok(FileChange::Updated { replacements }) => {
            FileOutcome::new(display, OutcomeStatus::Updated, replacements)
        }
        Ok(FileChange::WouldUpdate { replacements }) => {
            FileOutcome::new(display, OutcomeStatus::WouldUpdate, replacements)
        }
        Err(err) => {
            log_status!("rewrite", "Failed {}: {}", display, err.summary());
            FileOutcome::failed(display, &err)
        }
    }
}
