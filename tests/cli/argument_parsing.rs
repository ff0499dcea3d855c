//! CLI argument parsing tests
//!
//! Version and usage paths exit successfully without starting the worker.

use crate::common::{run_threadtest, stderr_of, stdout_of};

const BANNER: &str = "Thread Test Application.  Written by Kevin Neale (c) 2015";

#[test]
fn test_version_prints_and_exits_zero() {
    let output = run_threadtest(&["-v"]);

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with(BANNER));
    assert!(stdout.lines().any(|line| line == "1.0.0"));
}

#[test]
fn test_unknown_option_prints_usage_and_exits_zero() {
    let output = run_threadtest(&["-x"]);

    assert!(output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.starts_with("Usage:-"));
    assert!(stderr.contains("-d <debug_level>"));
    assert!(stdout_of(&output).contains(BANNER));
}

#[test]
fn test_missing_debug_value_prints_usage() {
    let output = run_threadtest(&["-d"]);

    assert!(output.status.success());
    assert!(stderr_of(&output).starts_with("Usage:-"));
}

#[test]
fn test_help_is_not_special() {
    let output = run_threadtest(&["--help"]);

    assert!(output.status.success());
    assert!(stderr_of(&output).starts_with("Usage:-"));
}

#[test]
fn test_version_wins_over_debug_level() {
    let output = run_threadtest(&["-d", "all", "-v"]);

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("1.0.0"));
    assert!(!stderr_of(&output).contains("Running..."));
}
