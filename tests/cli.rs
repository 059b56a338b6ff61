use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn kestrel_binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_kestrel"));
    command.env_remove("RUST_LOG");
    command
}

fn run_with_stdin(args: &[&str], program: &str) -> Output {
    let mut child = kestrel_binary()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn kestrel");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(program.as_bytes())
        .expect("Failed to write program");

    child.wait_with_output().expect("Failed to wait for kestrel")
}

fn temp_program(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("kestrel-{}-{}.ks", name, std::process::id()));
    std::fs::write(&path, contents).expect("Failed to write temp program");
    path
}

#[test]
fn test_version_flag() {
    let output = kestrel_binary()
        .arg("--version")
        .output()
        .expect("Failed to execute kestrel");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("kestrel"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_program_from_stdin() {
    let output = run_with_stdin(&["--color", "never"], "1 + 2 * 3;");
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "7\n");
}

#[test]
fn test_dash_reads_stdin() {
    let output = run_with_stdin(&["--color", "never", "-"], "\"kes\" + \"trel\";");
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "kestrel\n");
}

#[test]
fn test_program_from_file() {
    let path = temp_program("file", "number x = 20;\nnumber y = 22;\nx + y;\n");
    let output = kestrel_binary()
        .arg("--color")
        .arg("never")
        .arg(&path)
        .output()
        .expect("Failed to execute kestrel");
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "42\n");
}

#[test]
fn test_no_value_prints_nothing() {
    let output = run_with_stdin(&["--color", "never"], "if (false) 1;");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_syntax_error_exit_status_and_report() {
    let output = run_with_stdin(&["--color", "never"], "1 + 2");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert_eq!(
        String::from_utf8(output.stderr).unwrap(),
        "InvalidSyntaxError: Expected ';'\nFile <stdin>, line: 1\n\n1 + 2\n^^^^^\n"
    );
}

#[test]
fn test_runtime_error_report_names_file() {
    let path = temp_program("runtime", "number x = 1;\nx / 0;\n");
    let output = kestrel_binary()
        .arg("--color")
        .arg("never")
        .arg(&path)
        .output()
        .expect("Failed to execute kestrel");
    let _ = std::fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Traceback (most recent call last):\n   line: 2, in <program>\n"));
    assert!(stderr.contains("RunTimeError: Cannot divide by 0\n\nx / 0;\n"));
}

#[test]
fn test_color_always_marks_carets() {
    let output = run_with_stdin(&["--color", "always"], "1 / 0;");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("\x1b[31m^^^^^^\x1b[0m"));
}

#[test]
fn test_missing_file() {
    let output = kestrel_binary()
        .arg("--color")
        .arg("never")
        .arg("/definitely/not/here.ks")
        .output()
        .expect("Failed to execute kestrel");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to read /definitely/not/here.ks"));
}

#[test]
fn test_invalid_color_choice() {
    let output = kestrel_binary()
        .arg("--color")
        .arg("sometimes")
        .output()
        .expect("Failed to execute kestrel");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid color choice"));
}

#[test]
fn test_verbose_logs_pipeline_stages() {
    let output = run_with_stdin(&["--color", "never", "--verbose"], "1;");
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("lexed source"));
    assert!(stderr.contains("parsed program"));
}

#[test]
fn test_quiet_by_default() {
    let output = run_with_stdin(&["--color", "never"], "1;");
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_runaway_recursion_is_an_error() {
    let output = run_with_stdin(&["--color", "never"], "function f(n) f(n + 1);\nf(0);");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("RunTimeError: Maximum call depth exceeded"));
    assert!(stderr.contains("   line: 2, in <program>\n   line: 1, in f\n"));
}

#[test]
fn test_empty_program_is_rejected() {
    let output = run_with_stdin(&["--color", "never"], "");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("InvalidSyntaxError: "));
}

#[test]
fn test_deep_nesting_reports_instead_of_crashing() {
    let program = format!("{}1{};", "(".repeat(10_000), ")".repeat(10_000));
    let output = run_with_stdin(&["--color", "never"], &program);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("InvalidSyntaxError: Maximum nesting depth exceeded\n"));
}

#[test]
fn test_non_tail_recursion_near_the_limit() {
    let output = run_with_stdin(
        &["--color", "never"],
        "function f(n) if (n == 0) 0 else 1 + f(n - 1); f(198);",
    );
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "198\n");
}

#[test]
fn test_completion_script() {
    let output = kestrel_binary()
        .arg("complete")
        .arg("bash")
        .output()
        .expect("Failed to execute kestrel");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("kestrel"));
}
