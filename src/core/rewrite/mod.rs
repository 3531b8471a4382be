//! Token-aware identifier rewriting.
//!
//! `traverse` discovers files and hands each to `file`, which reads it,
//! runs `engine` over the classified lexemes and writes the result back
//! only when something changed. `category` decides how each lexeme kind is
//! matched against the map.

pub mod category;
pub mod engine;
pub mod file;
pub mod traverse;

pub use category::{classify, Category};
pub use engine::{rewrite_source, rewrite_tokens, RewriteResult, Token};
pub use file::{process_file, ExclusionSet, FileChange, FileTask};
pub use traverse::{
    discover_files, has_discovery_extension, run, run_with_progress, RunRequest,
};
