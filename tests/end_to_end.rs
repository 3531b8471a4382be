use std::fs;
use std::path::{Path, PathBuf};

use idrewrite::lexer::{SourceLexer, Tokenizer};
use idrewrite::rewrite::{self, rewrite_source, ExclusionSet, RunRequest};
use idrewrite::{IdentifierMap, OutcomeStatus};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn scenario_map() -> IdentifierMap {
    [("old_name.h", "new_name.h"), ("old_func", "new_func")]
        .into_iter()
        .collect()
}

#[test]
fn header_directory_scenario() {
    let dir = TempDir::new().unwrap();
    let header = write(
        dir.path(),
        "a.h",
        "#include \"old_name.h\"\nvoid old_func(void);\n",
    );

    let request = RunRequest {
        directory: Some(dir.path().to_path_buf()),
        ..RunRequest::default()
    };
    let report = rewrite::run(&request, &scenario_map(), &SourceLexer).unwrap();

    assert_eq!(
        fs::read_to_string(&header).unwrap(),
        "#include \"new_name.h\"\nvoid new_func(void);\n"
    );
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].status, OutcomeStatus::Updated);
    assert_eq!(report.files[0].path, header.display().to_string());
}

#[test]
fn second_run_reports_no_changes() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/solver.c",
        "#include <fclaw2d_global.h>\n\
         #define GLOB(g) fclaw2d_global_get_options(g)\n\
         /* fclaw2d_global_t stays in comments */\n\
         static fclaw2d_global_t *g;\n\
         const char *s = \"fclaw2d_global_t\";\n",
    );
    write(dir.path(), "src/kernel.cu", "__global__ void k() { fclaw2d_domain_t *d; }\n");
    write(dir.path(), "fortran/map.f90", "call fclaw2d_map_c2m(cont)\n");

    let map = IdentifierMap::builtin().unwrap();
    let request = RunRequest {
        directory: Some(dir.path().to_path_buf()),
        ..RunRequest::default()
    };

    let first = rewrite::run(&request, &map, &SourceLexer).unwrap();
    assert!(first.summary.updated > 0);
    assert_eq!(first.summary.failed, 0);

    let second = rewrite::run(&request, &map, &SourceLexer).unwrap();
    assert_eq!(second.summary.updated, 0);
    assert_eq!(second.summary.unchanged, second.summary.total);

    let solver = fs::read_to_string(dir.path().join("src/solver.c")).unwrap();
    assert!(solver.contains("/* fclaw2d_global_t stays in comments */"));
    assert!(solver.contains("\"fclaw2d_global_t\""));
    assert!(solver.contains("static fclaw_global_t *g;"));
}

#[test]
fn tokens_reconstruct_real_looking_sources() {
    let sources = [
        (
            "patch.c",
            "#include \"fclaw2d_clawpatch.h\"\n\
             #if REFINE_DIM == 2 && PATCH_DIM == 2\n/* x */\n#endif\n\
             int f(int a) { return a * 2; }\n",
        ),
        (
            "mapc2m.f",
            "c     comment line\n      subroutine mapc2m(xc,yc,xp,yp,zp)\n\
             \x20     xp = xc\n      end\n",
        ),
        (
            "mod.f90",
            "module m\n  implicit none\n\
             \x20 character(len=*), parameter :: s = \"a\"\"b\"\nend module m\n",
        ),
    ];

    for (name, text) in sources {
        let lexemes = SourceLexer.tokenize(Path::new(name), text).unwrap();
        let rebuilt: String = lexemes.iter().map(|l| l.text).collect();
        assert_eq!(rebuilt, text);
    }
}

#[test]
fn literals_matching_keys_survive() {
    let map: IdentifierMap = [("old", "new")].into_iter().collect();
    let text = "puts(\"old\"); // old\n/* old */ char c = 'o';\n";
    let result = rewrite_source(&SourceLexer, Path::new("x.cpp"), text, &map).unwrap();

    assert_eq!(result.text, text);
    assert!(!result.changed);
}

#[test]
fn directive_boundaries_and_include_values() {
    let map: IdentifierMap = [("foo", "bar"), ("<old.h>", "<new.h>")].into_iter().collect();
    let rewrite = |text: &str| {
        rewrite_source(&SourceLexer, Path::new("x.h"), text, &map)
            .unwrap()
            .text
    };

    assert_eq!(rewrite("#define foobar 1\n"), "#define foobar 1\n");
    assert_eq!(rewrite("#define foo 1\n"), "#define bar 1\n");
    assert_eq!(rewrite("#include <old.h>\n"), "#include <new.h>\n");
    assert_eq!(rewrite("#include <oldx.h>\n"), "#include <oldx.h>\n");
}

#[test]
fn unmapped_file_is_left_byte_identical() {
    let dir = TempDir::new().unwrap();
    let content = "int main(void) {\r\n  return 0; \t\r\n}\r\n";
    let path = write(dir.path(), "main.c", content);

    let request = RunRequest {
        files: vec![path.clone()],
        ..RunRequest::default()
    };
    let report = rewrite::run(&request, &scenario_map(), &SourceLexer).unwrap();

    assert_eq!(report.files[0].status, OutcomeStatus::Unchanged);
    assert_eq!(fs::read(&path).unwrap(), content.as_bytes());
}

#[test]
fn excluded_file_is_never_touched() {
    let dir = TempDir::new().unwrap();
    let kept = write(dir.path(), "kept.h", "void old_func(void);\n");
    let skipped = write(dir.path(), "skipped.h", "void old_func(void);\n");

    let excluded: ExclusionSet = [skipped.display().to_string()].into_iter().collect();
    let request = RunRequest {
        directory: Some(dir.path().to_path_buf()),
        excluded,
        ..RunRequest::default()
    };
    let report = rewrite::run(&request, &scenario_map(), &SourceLexer).unwrap();

    assert_eq!(fs::read_to_string(&kept).unwrap(), "void new_func(void);\n");
    assert_eq!(fs::read_to_string(&skipped).unwrap(), "void old_func(void);\n");
    assert_eq!(report.summary.excluded, 1);
    assert_eq!(report.summary.updated, 1);
}

#[test]
fn dry_run_reports_without_writing() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "a.c", "old_func();\n");

    let request = RunRequest {
        directory: Some(dir.path().to_path_buf()),
        dry_run: true,
        ..RunRequest::default()
    };
    let report = rewrite::run(&request, &scenario_map(), &SourceLexer).unwrap();

    assert_eq!(report.files[0].status, OutcomeStatus::WouldUpdate);
    assert_eq!(fs::read_to_string(&path).unwrap(), "old_func();\n");
}

#[test]
fn empty_request_is_a_no_op() {
    let report = rewrite::run(&RunRequest::default(), &scenario_map(), &SourceLexer).unwrap();
    assert_eq!(report.summary.total, 0);
    assert!(!report.has_failures());
}
