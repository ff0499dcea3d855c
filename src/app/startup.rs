use crate::app::cli::{usage, Args, CliOutcome, FileConfig, Settings};
use crate::app::context::AppContext;
use crate::app::producer::{run_heartbeat, seed_test_messages};
use crate::core::error_handling::{log_error_with_context, ContextualError};
use crate::core::logging::{flush_logging, init_logging};
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::version;
use crate::queue::{QueueError, QueueResult};
use crate::worker::{LogHandler, Worker, WorkerReport};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::broadcast;

pub const BANNER: &str = "Thread Test Application.  Written by Kevin Neale (c) 2015";

/// Initialize application startup
pub fn startup() -> ExitCode {
    println!("{}", BANNER);

    let args = match Args::parse_from_env() {
        CliOutcome::Run(args) => args,
        CliOutcome::Version => {
            println!("{}", version::version());
            return ExitCode::SUCCESS;
        }
        CliOutcome::Usage => {
            eprint!("{}", usage());
            return ExitCode::SUCCESS;
        }
    };

    let settings = match FileConfig::load(args.config_file.as_deref())
        .and_then(|file| Settings::resolve(&args, &file))
    {
        Ok(settings) => settings,
        // Logging is not up yet, so configuration errors go straight to stderr
        Err(e) => {
            match e.user_message() {
                Some(message) => eprintln!("Error: {}", message),
                None => eprintln!("Error: configuration loading failed: {}", e),
            }
            return ExitCode::FAILURE;
        }
    };

    // Logging at `none` would swallow this, so it goes straight to stderr
    if let Some(level) = &settings.unrecognized_level {
        eprintln!(
            "Warning: unrecognized debug level '{}', using '{}'",
            level, settings.debug_level
        );
    }

    if let Err(e) = init_logging(
        settings.debug_level,
        settings.log_format.as_deref(),
        settings.log_file.as_deref(),
        settings.color,
    ) {
        eprintln!("Error: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    log::debug!(
        "threadtest {} (built {}, {})",
        version::version(),
        version::build_time(),
        version::git_hash()
    );
    log::debug!("Settings: {:?}", settings);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            crate::critical!("FATAL: failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let context = AppContext::new(settings);
    let result = runtime.block_on(async {
        let (coordinator, shutdown_rx) = ShutdownCoordinator::new();
        coordinator.listen_for_signals();
        run(context, shutdown_rx).await
    });

    let code = match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log_error_with_context(&e, "Message processing");
            ExitCode::FAILURE
        }
    };
    flush_logging();
    code
}

/// Seed the queue, start the worker, and produce heartbeats until shutdown
///
/// Once shutdown is signalled the worker drains the queue and is joined.
pub async fn run(
    context: AppContext,
    shutdown_rx: broadcast::Receiver<()>,
) -> QueueResult<WorkerReport> {
    crate::critical!("Running...");

    let seeded = seed_test_messages(&context.queue);
    log::debug!("Seeded {} test message(s)", seeded);

    let worker = Worker::new(
        Arc::clone(&context.queue),
        context.settings.strategy,
        LogHandler,
    )
    .spawn()?;

    log::info!("Main thread!");

    let beats = run_heartbeat(
        Arc::clone(&context.queue),
        context.settings.producer_interval,
        shutdown_rx,
    )
    .await;
    log::info!("Shutting down after {} heartbeat(s)", beats);

    let report = tokio::task::spawn_blocking(move || worker.shutdown())
        .await
        .map_err(|e| QueueError::internal(format!("worker shutdown task failed: {}", e)))??;

    log::debug!(
        "Worker received {} message(s), {} failure(s)",
        report.received,
        report.failures
    );
    Ok(report)
}
