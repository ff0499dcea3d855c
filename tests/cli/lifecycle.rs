//! Full process runs, stopped with SIGTERM

#![cfg(unix)]

use crate::common::{spawn_threadtest, write_config};
use std::process::Child;
use std::thread;
use std::time::Duration;

fn terminate(child: &Child) {
    let pid = libc::pid_t::try_from(child.id()).unwrap();
    unsafe {
        libc::kill(pid, libc::SIGTERM);
    }
}

fn run_for(args: &[&str], duration: Duration) -> (std::process::ExitStatus, String) {
    let child = spawn_threadtest(args);
    thread::sleep(duration);
    terminate(&child);

    let output = child.wait_with_output().unwrap();
    (output.status, String::from_utf8_lossy(&output.stderr).into_owned())
}

#[test]
fn test_all_level_logs_startup_and_every_seeded_message() {
    let (status, stderr) = run_for(
        &["-d", "all", "--no-color", "--producer-interval-secs", "1"],
        Duration::from_millis(2500),
    );

    assert!(status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("CRT Running..."));
    assert!(stderr.contains("INF Main thread!"));
    assert!(stderr.contains("New message queued!"));
    for index in 0..=10 {
        assert!(
            stderr.contains(&format!("received message: TestMessage: {}\n", index)),
            "missing TestMessage: {}",
            index
        );
    }
    assert!(stderr.contains("received message: still"));
    assert!(stderr.contains("received message: alive"));
}

#[test]
fn test_critical_level_hides_info() {
    let (status, stderr) = run_for(&["-d", "critical", "--no-color"], Duration::from_millis(800));

    assert!(status.success());
    assert!(stderr.contains("Running..."));
    assert!(!stderr.contains("Main thread!"));
    assert!(!stderr.contains("received message"));
}

#[test]
fn test_unrecognized_level_falls_back_to_none() {
    let (status, stderr) = run_for(&["-d", "loud", "--no-color"], Duration::from_millis(800));

    assert!(status.success());
    assert!(stderr.contains("unrecognized debug level 'loud'"));
    assert!(!stderr.contains("Running..."));
}

#[test]
fn test_config_file_selects_level_and_json_format() {
    let config = write_config(
        r#"
debug-level = "info"
log-format = "json"
strategy = "poll"
poll-interval-ms = 10
"#,
    );

    let (status, stderr) = run_for(
        &["-c", config.path().to_str().unwrap()],
        Duration::from_millis(1500),
    );

    assert!(status.success());
    let records: Vec<serde_json::Value> = stderr
        .lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(records
        .iter()
        .any(|record| record["message"] == "received message: TestMessage: 10"));
    assert!(records.iter().all(|record| record["level"] != "DBG"));
}
