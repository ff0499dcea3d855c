//! Common test utilities and helpers
//!
//! Helpers for driving the built `threadtest` binary.

use std::io::Write;
use std::process::{Child, Command, Output, Stdio};
use tempfile::NamedTempFile;

pub fn threadtest() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_threadtest"));
    // Keep a developer's own configuration file out of the picture
    command.env("XDG_CONFIG_HOME", std::env::temp_dir().join("threadtest-no-config"));
    command
}

/// Run the binary to completion
pub fn run_threadtest(args: &[&str]) -> Output {
    threadtest()
        .args(args)
        .output()
        .expect("failed to run threadtest binary")
}

/// Start the binary with piped output
pub fn spawn_threadtest(args: &[&str]) -> Child {
    threadtest()
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn threadtest binary")
}

pub fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
