use std::process::ExitCode;

fn main() -> ExitCode {
    threadtest::app::startup::startup()
}
