use clap::Args;
use std::path::PathBuf;

use idrewrite::identifier_map::BUILTIN_SOURCE;
use idrewrite::lexer::SourceLexer;
use idrewrite::log_status;
use idrewrite::rewrite::{self, ExclusionSet, RunRequest};
use idrewrite::{Error, FileOutcome, IdentifierMap, RunReport};

use super::CmdResult;

/// Exit code when the run completed but at least one file failed.
pub const EXIT_FILE_FAILURES: i32 = 3;

#[derive(Args, Debug)]
pub struct RewriteArgs {
    /// Recursively rewrite matching source files under this directory
    #[arg(short, long, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Rewrite exactly these files, whatever their extension
    #[arg(short, long, value_name = "PATH", num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Never read or write these paths (exact match against discovered paths)
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub exclude: Vec<String>,

    /// JSON object of old -> new names to use instead of the built-in table
    #[arg(short, long, value_name = "FILE")]
    pub map: Option<PathBuf>,

    /// Report which files would change without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long, default_value_t = 1, value_name = "N")]
    pub jobs: usize,
}

impl Default for RewriteArgs {
    fn default() -> Self {
        Self {
            directory: None,
            files: Vec::new(),
            exclude: Vec::new(),
            map: None,
            dry_run: false,
            jobs: 1,
        }
    }
}

/// Everything resolved before the first file is touched.
pub struct RewritePlan {
    pub map: IdentifierMap,
    pub map_source: String,
    pub request: RunRequest,
}

/// Load the map and validate arguments. Any error here aborts the run.
pub fn plan(args: RewriteArgs) -> idrewrite::Result<RewritePlan> {
    if let Some(dir) = &args.directory {
        if !dir.is_dir() {
            return Err(Error::validation_invalid_argument(
                "directory",
                format!("Not a directory: {}", dir.display()),
                Some(dir.display().to_string()),
            )
            .with_hint("Pass an existing directory to --directory"));
        }
    }

    let (map, map_source) = match &args.map {
        Some(path) => (IdentifierMap::load(path)?, path.display().to_string()),
        None => (IdentifierMap::builtin()?, BUILTIN_SOURCE.to_string()),
    };

    let chained = map.chained_keys();
    if !chained.is_empty() {
        log_status!(
            "map",
            "{} entries map to another key; a second pass will rewrite them again: {}",
            chained.len(),
            chained.join(", ")
        );
    }

    let request = RunRequest {
        directory: args.directory,
        files: args.files,
        excluded: args.exclude.into_iter().collect::<ExclusionSet>(),
        dry_run: args.dry_run,
        jobs: args.jobs,
    };

    Ok(RewritePlan {
        map,
        map_source,
        request,
    })
}

pub fn run(plan: &RewritePlan) -> CmdResult<RunReport> {
    run_with_progress(plan, |_| {})
}

/// Run the plan, handing each file's outcome to `on_outcome` as it lands.
pub fn run_with_progress(
    plan: &RewritePlan,
    on_outcome: impl FnMut(&FileOutcome),
) -> CmdResult<RunReport> {
    let report = rewrite::run_with_progress(&plan.request, &plan.map, &SourceLexer, on_outcome)?
        .with_map_source(plan.map_source.clone());

    let exit_code = if report.has_failures() {
        EXIT_FILE_FAILURES
    } else {
        0
    };

    Ok((report, exit_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn plan_rejects_missing_directory() {
        let args = RewriteArgs {
            directory: Some(PathBuf::from("/nonexistent/idrewrite-src")),
            ..RewriteArgs::default()
        };
        let err = plan(args).err().unwrap();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn default_args_match_cli_defaults() {
        let args = RewriteArgs::default();
        assert_eq!(args.jobs, 1);
        assert!(!args.dry_run);
        assert_eq!(plan(args).unwrap().request.jobs, 1);
    }

    #[test]
    fn plan_uses_builtin_map_by_default() {
        let plan = plan(RewriteArgs::default()).unwrap();
        assert_eq!(plan.map_source, BUILTIN_SOURCE);
        assert!(!plan.map.is_empty());
    }

    #[test]
    fn run_reports_failures_with_exit_code() {
        let dir = TempDir::new().unwrap();
        let map_path = dir.path().join("map.json");
        fs::write(&map_path, r#"{"old_func": "new_func"}"#).unwrap();

        let args = RewriteArgs {
            files: vec![dir.path().join("missing.c")],
            map: Some(map_path),
            ..RewriteArgs::default()
        };
        let plan = plan(args).unwrap();
        let (report, code) = run(&plan).unwrap();

        assert_eq!(code, EXIT_FILE_FAILURES);
        assert_eq!(report.summary.failed, 1);
    }

    #[test]
    fn progress_reports_updated_files_in_order() {
        let dir = TempDir::new().unwrap();
        let map_path = dir.path().join("map.json");
        fs::write(&map_path, r#"{"old_func": "new_func"}"#).unwrap();
        let a = dir.path().join("a.c");
        let b = dir.path().join("b.c");
        fs::write(&a, "old_func();\n").unwrap();
        fs::write(&b, "int x;\n").unwrap();

        let args = RewriteArgs {
            files: vec![a.clone(), b.clone()],
            map: Some(map_path),
            ..RewriteArgs::default()
        };
        let plan = plan(args).unwrap();
        let mut statuses = Vec::new();
        let (_, code) = run_with_progress(&plan, |outcome| {
            statuses.push((outcome.path.clone(), outcome.status))
        })
        .unwrap();

        assert_eq!(code, 0);
        assert_eq!(
            statuses,
            vec![
                (a.display().to_string(), idrewrite::OutcomeStatus::Updated),
                (b.display().to_string(), idrewrite::OutcomeStatus::Unchanged),
            ]
        );
    }
}
