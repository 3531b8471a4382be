//! Plain-text progress protocol.
//!
//! Banners and `Updated` lines go to stdout; failures and pre-flight
//! errors go to stderr.

use idrewrite::{Error, FileOutcome, OutcomeStatus};

pub const START_BANNER: &str = "Processing files...";
pub const DONE_BANNER: &str = "Done!";

pub fn outcome_line(outcome: &FileOutcome) -> Option<String> {
    match outcome.status {
        OutcomeStatus::Updated => Some(format!("Updated   {}...", outcome.path)),
        OutcomeStatus::WouldUpdate => Some(format!("Would update {}...", outcome.path)),
        OutcomeStatus::Failed => {
            let (code, message) = outcome
                .error
                .as_ref()
                .map(|e| (e.code.as_str(), e.message.as_str()))
                .unwrap_or(("internal.unexpected", "unknown error"));
            Some(format!("Failed    {}: {}: {}", outcome.path, code, message))
        }
        OutcomeStatus::Unchanged | OutcomeStatus::Excluded => None,
    }
}

/// Print one file's progress line, if its status has one.
pub fn print_outcome(outcome: &FileOutcome) {
    let Some(line) = outcome_line(outcome) else {
        return;
    };
    if outcome.status == OutcomeStatus::Failed {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

/// Two lines on stderr: what went wrong, then what to do about it.
pub fn print_error_text(err: &Error) {
    eprintln!("Error: {}", err.summary());
    match err.hints.first() {
        Some(hint) => eprintln!("{}", hint.message),
        None => eprintln!("No files were modified."),
    }
}
