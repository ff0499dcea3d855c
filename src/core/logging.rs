//! Leveled diagnostics on top of flexi_logger
//!
//! The application exposes four severities (info, warning, major, critical)
//! plus the `all` and `none` thresholds. They are mapped onto `log` levels,
//! with critical records written under [`CRITICAL_TARGET`] so that a
//! `critical` threshold can hide ordinary error lines.

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// Target used by [`critical!`](crate::critical) records
pub const CRITICAL_TARGET: &str = "threadtest::critical";

static LOGGER_HANDLE: OnceLock<flexi_logger::LoggerHandle> = OnceLock::new();

/// Emit a critical diagnostic
///
/// Critical records are `log::Level::Error` records routed to
/// [`CRITICAL_TARGET`], which the `critical` threshold keeps enabled while
/// silencing everything else.
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => {
        ::log::error!(target: $crate::core::logging::CRITICAL_TARGET, $($arg)+)
    };
}

/// Minimum debug level selected with `-d`
///
/// Ordered from least to most restrictive threshold: `All` shows everything
/// and `None` suppresses every diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DebugLevel {
    All,
    Info,
    Warning,
    Major,
    Critical,
    #[default]
    None,
}

impl DebugLevel {
    const NAMES: [(&'static str, DebugLevel); 6] = [
        ("all", DebugLevel::All),
        ("info", DebugLevel::Info),
        ("warning", DebugLevel::Warning),
        ("major", DebugLevel::Major),
        ("critical", DebugLevel::Critical),
        ("none", DebugLevel::None),
    ];

    /// Match a command-line argument against the level names
    ///
    /// Matching is case-sensitive and by prefix: the argument only has to
    /// start with a level name, so `"infox"` selects `Info`.
    pub fn from_arg(arg: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(name, _)| arg.starts_with(name))
            .map(|(_, level)| *level)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DebugLevel::All => "all",
            DebugLevel::Info => "info",
            DebugLevel::Warning => "warning",
            DebugLevel::Major => "major",
            DebugLevel::Critical => "critical",
            DebugLevel::None => "none",
        }
    }

    /// flexi_logger specification implementing this threshold
    pub fn log_spec(&self) -> String {
        match self {
            DebugLevel::All => "trace".to_string(),
            DebugLevel::Info => "info".to_string(),
            DebugLevel::Warning => "warn".to_string(),
            DebugLevel::Major => "error".to_string(),
            DebugLevel::Critical => format!("off,{}=error", CRITICAL_TARGET),
            DebugLevel::None => "off".to_string(),
        }
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Start the process-wide logger
///
/// Records go to stderr unless `log_file` is given. `log_format` selects one
/// of `text` (default), `ext` (with source location) or `json`.
pub fn init_logging(
    level: DebugLevel,
    log_format: Option<&str>,
    log_file: Option<&Path>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    use flexi_logger::{FileSpec, Logger};

    let mut logger = Logger::try_with_str(level.log_spec())?;

    logger = match (log_format.unwrap_or("text"), color_enabled) {
        ("json", _) => logger.format(json_format),
        ("ext", true) => logger.format(extended_color_format),
        ("ext", false) => logger.format(extended_format),
        (_, true) => logger.format(simple_color_format),
        (_, false) => logger.format(simple_format),
    };

    if let Some(path) = log_file {
        logger = logger.log_to_file(FileSpec::try_from(path)?);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(handle);

    Ok(())
}

/// Flush buffered records before the process exits
///
/// Does nothing when logging was never initialized.
pub fn flush_logging() {
    if let Some(handle) = LOGGER_HANDLE.get() {
        handle.flush();
    }
}

fn level_tag(record: &log::Record) -> &'static str {
    if record.target() == CRITICAL_TARGET {
        return "CRT";
    }
    match record.level() {
        log::Level::Error => "MAJ",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

fn colored_level_tag(record: &log::Record) -> colored::ColoredString {
    use colored::Colorize;

    let tag = level_tag(record);
    match tag {
        "CRT" => tag.red().bold(),
        "MAJ" => tag.red(),
        "WRN" => tag.yellow(),
        "INF" => tag.green(),
        "DBG" => tag.blue(),
        _ => tag.magenta(),
    }
}

// Format: "YYYY-MM-DD HH:mm:ss.fff INF message"
fn simple_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_tag(record),
        record.args()
    )
}

fn simple_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        colored_level_tag(record),
        record.args()
    )
}

// Format: "YYYY-MM-DD HH:mm:ss.fff INF message (queue/message_queue.rs:42)"
fn extended_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_tag(record),
        record.args(),
        source_location(record)
    )
}

fn extended_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        colored_level_tag(record),
        record.args(),
        source_location(record).dimmed()
    )
}

fn json_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use serde_json::{json, to_string};

    let json_obj = json!({
        "timestamp": now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "level": level_tag(record),
        "message": record.args().to_string(),
        "source": source_location(record)
    });

    match to_string(&json_obj) {
        Ok(json_string) => w.write_all(json_string.as_bytes()),
        Err(_) => w.write_all(b"{\"error\":\"Failed to serialize log message\"}"),
    }
}

// The module path is used rather than the target, critical records share a target
fn source_location(record: &log::Record) -> String {
    let module = record.module_path().unwrap_or_else(|| record.target());
    let path_like = match module.strip_prefix("threadtest::") {
        Some(without_prefix) => without_prefix.replace("::", "/") + ".rs",
        None => module.replace("::", "/"),
    };

    match record.line() {
        Some(line_num) => format!("{}:{}", path_like, line_num),
        None => path_like,
    }
}
