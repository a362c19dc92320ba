use serde::{Deserialize, Serialize};

/// Log level configuration
///
/// Controls the verbosity of log output written to the debug log file.
/// Environment variables `RUST_LOG` and `--log-level` CLI flag take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    #[default]
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Parse a level name as accepted by `--log-level` and `RUST_LOG`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "off" => Some(LogLevel::Off),
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// What the shell does once the last window has closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AllWindowsClosedAction {
    /// `Reopen` on macOS, `Quit` everywhere else
    #[default]
    PlatformDefault,
    /// Terminate the process
    Quit,
    /// Reopen the saved window layout
    Reopen,
    /// Reset the saved layout to the default window, then reopen it
    ResetAndReopen,
}

impl AllWindowsClosedAction {
    /// Resolve `PlatformDefault` for the platform this binary was built for.
    pub fn resolve(self) -> Self {
        match self {
            AllWindowsClosedAction::PlatformDefault => {
                if cfg!(target_os = "macos") {
                    AllWindowsClosedAction::Reopen
                } else {
                    AllWindowsClosedAction::Quit
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_name() {
        assert_eq!(LogLevel::from_name("INFO"), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_name(" warning "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_name("verbose"), None);
    }

    #[test]
    fn test_platform_default_never_resolves_to_itself() {
        let resolved = AllWindowsClosedAction::PlatformDefault.resolve();
        assert_ne!(resolved, AllWindowsClosedAction::PlatformDefault);
        assert_eq!(
            AllWindowsClosedAction::ResetAndReopen.resolve(),
            AllWindowsClosedAction::ResetAndReopen
        );
    }
}
