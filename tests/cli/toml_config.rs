//! TOML configuration tests

use crate::common::{run_threadtest, stderr_of, write_config};

#[test]
fn test_missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let output = run_threadtest(&["-c", missing.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("The specified configuration file does not exist"));
}

#[test]
fn test_unknown_config_key_fails() {
    let config = write_config("queue-capacity = 10\n");

    let output = run_threadtest(&["--config-file", config.path().to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Error parsing configuration file"));
}

#[test]
fn test_invalid_config_value_fails() {
    let config = write_config("strategy = \"spin\"\n");

    let output = run_threadtest(&["-c", config.path().to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Invalid value for 'strategy'"));
}

#[test]
fn test_zero_interval_on_command_line_fails() {
    let output = run_threadtest(&["--poll-interval-ms", "0"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("poll-interval-ms"));
}

#[test]
fn test_oversized_producer_interval_exits_cleanly() {
    let output = run_threadtest(&["--no-color", "--producer-interval-secs", "18446744073709551615"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("producer-interval-secs"));
    assert!(!stderr.contains("panicked"));
}

#[test]
fn test_unreadable_config_reports_loading_failure() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_threadtest(&["-c", dir.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Error: configuration loading failed:"));
}
