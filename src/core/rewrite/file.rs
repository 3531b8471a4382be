//! Per-file driver: exclusion check, read, rewrite, conditional atomic write.

use std::collections::HashSet;
use std::path::Path;

use super::engine::rewrite_source;
use crate::error::Result;
use crate::identifier_map::IdentifierMap;
use crate::lexer::Tokenizer;
use crate::utils::io;

/// Paths that must never be read or written, compared as exact strings.
pub type ExclusionSet = HashSet<String>;

/// One file's unit of work.
#[derive(Debug, Clone, Copy)]
pub struct FileTask<'a> {
    pub path: &'a Path,
    pub map: &'a IdentifierMap,
    pub excluded: &'a ExclusionSet,
}

/// What happened to a file that was processed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    Excluded,
    Unchanged,
    Updated { replacements: usize },
    WouldUpdate { replacements: usize },
}

impl<'a> FileTask<'a> {
    pub fn new(path: &'a Path, map: &'a IdentifierMap, excluded: &'a ExclusionSet) -> Self {
        Self {
            path,
            map,
            excluded,
        }
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded.contains(&*self.path.to_string_lossy())
    }
}

/// Rewrite a single file in place.
///
/// The file is only written when at least one token changed, so an
/// unchanged file keeps its content and timestamp. With `dry_run` the
/// rewrite runs in memory and nothing is written.
pub fn process_file(
    task: &FileTask<'_>,
    tokenizer: &dyn Tokenizer,
    dry_run: bool,
) -> Result<FileChange> {
    if task.is_excluded() {
        log_status!("rewrite", "Skipping excluded {}", task.path.display());
        return Ok(FileChange::Excluded);
    }

    let content = io::read_file(task.path)?;
    let result = rewrite_source(tokenizer, task.path, &content, task.map)?;

    if !result.changed {
        return Ok(FileChange::Unchanged);
    }

    if dry_run {
        return Ok(FileChange::WouldUpdate {
            replacements: result.replacements,
        });
    }

    io::write_file_atomic(task.path, &result.text)?;
    Ok(FileChange::Updated {
        replacements: result.replacements,
    })
}
