//! End-to-end runs of the `closurec` binary against a scripted compiler.
#![cfg(unix)]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_closurec");

/// Prints fixed compiled code, a source map when asked for one, and
/// `diagnostics` (a JSON array) on stderr, then exits with `status`.
fn fake_compiler(dir: &Path, diagnostics: &str, status: i32) -> String {
    let script = dir.join("compiler.sh");
    let body = format!(
        "cat > /dev/null\n\
         case \"$*\" in\n\
         *--create_source_map*) printf '%s\\n' '[{{\"src\":\"var x=3;\\n\",\"source_map\":\"{{}}\"}}]' ;;\n\
         *) printf '%s\\n' '[{{\"src\":\"var x=3;\\n\"}}]' ;;\n\
         esac\n\
         printf '%s\\n' '{diagnostics}' >&2\n\
         exit {status}\n"
    );
    std::fs::write(&script, body).unwrap();
    format!("sh {}", script.display())
}

fn run(dir: &TempDir, compiler: &str, args: &[&str], stdin: &str) -> Output {
    let externs_dir = dir.path().join("no-externs");
    let mut child = Command::new(BIN)
        .arg("--compiler")
        .arg(compiler)
        .arg("--externs-dir")
        .arg(&externs_dir)
        .args(["--color", "never"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn clean_compile_prints_code_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let compiler = fake_compiler(dir.path(), "[]", 0);

    let output = run(&dir, &compiler, &[], "const x = 1 + 2;");

    assert!(output.status.success(), "{}", text(&output.stderr));
    assert_eq!(text(&output.stdout), "var x=3;\n");
    assert_eq!(text(&output.stderr), "");
}

#[test]
fn warnings_are_reported_but_do_not_fail() {
    let dir = tempfile::tempdir().unwrap();
    let compiler = fake_compiler(
        dir.path(),
        r#"[{"level":"warning","description":"Suspicious code.","source":"stdin","line":1,"column":6,"key":"JSC_USELESS_CODE"}]"#,
        0,
    );

    let output = run(&dir, &compiler, &["-"], "const x = 1 + 2;");

    assert!(output.status.success());
    assert_eq!(text(&output.stdout), "var x=3;\n");
    assert_eq!(
        text(&output.stderr),
        "stdin:1 (JSC_USELESS_CODE)\nSuspicious code.\nconst x = 1 + 2;\n      ^\n\n"
    );
}

#[test]
fn errors_fail_and_suppress_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("app.js");
    std::fs::write(&source, "var a;\nfoo(;\n").unwrap();
    let name = source.display().to_string();
    let diagnostics = format!(
        r#"[{{"level":"error","description":"Parse error.","source":"{name}","line":2,"column":4,"key":"JSC_PARSE_ERROR"}}]"#
    );
    let compiler = fake_compiler(dir.path(), &diagnostics, 2);

    let output = run(&dir, &compiler, &[name.as_str()], "");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(text(&output.stdout), "");
    assert_eq!(
        text(&output.stderr),
        format!("{name}:2 (JSC_PARSE_ERROR)\nParse error.\nfoo(;\n    ^\n\n\n")
    );
}

#[test]
fn missing_input_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let compiler = fake_compiler(dir.path(), "[]", 0);
    let missing = dir.path().join("missing.js").display().to_string();

    let output = run(&dir, &compiler, &[missing.as_str()], "");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(text(&output.stdout), "");
    assert!(text(&output.stderr).contains(&missing));
}

#[test]
fn source_map_is_appended_inline() {
    let dir = tempfile::tempdir().unwrap();
    let compiler = fake_compiler(dir.path(), "[]", 0);

    let output = run(&dir, &compiler, &["--createSourceMap"], "const x = 1 + 2;");

    assert!(output.status.success(), "{}", text(&output.stderr));
    assert_eq!(
        text(&output.stdout),
        "var x=3;\n//# sourceMappingURL=data:application/json;base64,e30=\n"
    );
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let output = Command::new(BIN).arg("--no-such-flag").output().unwrap();
    assert!(!output.status.success());
    assert!(text(&output.stderr).contains("--no-such-flag"));
}
