//! Logging infrastructure for webdesk
//!
//! `init_log_bridge` installs a `log` implementation so every `log::info!()`
//! and friends lands in a debug log file:
//! `/tmp/webdesk_debug.log` on Unix/macOS, `%TEMP%\webdesk_debug.log` on Windows.
//! When `RUST_LOG` is set, lines are mirrored to stderr as well.
//!
//! Level precedence: `--log-level`, then `RUST_LOG`, then the config file's
//! `log_level` (applied once the config has been loaded).

use crate::config::LogLevel;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Environment switch that traces every window lifecycle event
pub const LOG_EVENTS_ENV: &str = "WEBDESK_LOG_EVENTS";

struct DebugLogger {
    file: Option<File>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn new(mirror_stderr: bool) -> Self {
        Self {
            file: None,
            mirror_stderr,
        }
    }

    /// Open the log file on first use so `Off` never creates it.
    fn ensure_file(&mut self) {
        if self.file.is_some() {
            return;
        }
        let path = log_path();
        // Silently fail if the log file can't be opened
        if let Ok(file) = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&path)
        {
            self.file = Some(file);
            self.write_raw(&format!(
                "\n{}\nwebdesk debug session started at {} (level={})\n{}\n",
                "=".repeat(80),
                get_timestamp(),
                log::max_level(),
                "=".repeat(80)
            ));
        }
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn write_record(&mut self, record: &log::Record) {
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        self.ensure_file();
        self.write_raw(&line);
        if self.mirror_stderr {
            eprint!("{}", line);
        }
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

/// Set when `--log-level` or `RUST_LOG` chose the level, so the config cannot override it
static LEVEL_FROM_OVERRIDE: AtomicBool = AtomicBool::new(false);

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::new(std::env::var_os("RUST_LOG").is_some())))
}

fn get_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

struct LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            get_logger().lock().write_record(record);
        }
    }

    fn flush(&self) {
        if let Some(ref mut file) = get_logger().lock().file {
            let _ = file.flush();
        }
    }
}

static BRIDGE: LogBridge = LogBridge;

/// Path of the debug log file
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    let path = PathBuf::from("/tmp/webdesk_debug.log");
    #[cfg(not(unix))]
    let path = std::env::temp_dir().join("webdesk_debug.log");
    path
}

/// Pick the startup level from the CLI flag and the `RUST_LOG` value.
///
/// Returns `None` when neither is usable, leaving the choice to the config.
fn resolve_override_level(
    cli_level: Option<log::LevelFilter>,
    rust_log: Option<&str>,
) -> Option<log::LevelFilter> {
    cli_level.or_else(|| {
        rust_log
            .and_then(LogLevel::from_name)
            .map(LogLevel::to_level_filter)
    })
}

/// Install the `log` bridge. Safe to call more than once; later calls only
/// adjust the level.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let level = resolve_override_level(cli_level, rust_log.as_deref());
    LEVEL_FROM_OVERRIDE.store(level.is_some(), Ordering::Relaxed);

    if log::set_logger(&BRIDGE).is_err() {
        // Another logger is already installed (e.g. in tests)
        return;
    }
    log::set_max_level(level.unwrap_or(log::LevelFilter::Off));
}

/// Apply the config file's `log_level` unless the CLI or `RUST_LOG` already chose one.
pub fn apply_config_log_level(level: LogLevel) {
    if LEVEL_FROM_OVERRIDE.load(Ordering::Relaxed) {
        return;
    }
    log::set_max_level(level.to_level_filter());
}

fn parse_log_events(value: Option<&str>) -> bool {
    value.is_some_and(|value| value.is_empty() || value.eq_ignore_ascii_case("true"))
}

/// Whether lifecycle event tracing was requested through `WEBDESK_LOG_EVENTS`.
pub fn log_events_enabled() -> bool {
    parse_log_events(std::env::var(LOG_EVENTS_ENV).ok().as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_level_wins_over_rust_log() {
        assert_eq!(
            resolve_override_level(Some(log::LevelFilter::Warn), Some("trace")),
            Some(log::LevelFilter::Warn)
        );
        assert_eq!(
            resolve_override_level(None, Some("debug")),
            Some(log::LevelFilter::Debug)
        );
        assert_eq!(resolve_override_level(None, Some("webdesk=debug")), None);
        assert_eq!(resolve_override_level(None, None), None);
    }

    #[test]
    fn test_log_events_switch() {
        assert!(parse_log_events(Some("")));
        assert!(parse_log_events(Some("TRUE")));
        assert!(!parse_log_events(Some("0")));
        assert!(!parse_log_events(None));
    }
}
