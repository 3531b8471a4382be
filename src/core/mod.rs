// Public modules
pub mod error;
pub mod identifier_map;
pub mod lexer;
pub mod output;
pub mod rewrite;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use identifier_map::IdentifierMap;
pub use output::{FileOutcome, OutcomeStatus, RunReport, RunSummary};
