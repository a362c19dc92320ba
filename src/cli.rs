//! Command-line interface for webdesk.

use crate::config::LogLevel;
use clap::Parser;

/// webdesk - A desktop shell for a hosted web application
#[derive(Parser, Debug)]
#[command(name = "webdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Open a new window instead of restoring or focusing existing ones
    #[arg(long)]
    pub new_window: bool,

    /// URL to open in the new window (default page when omitted)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Log level for the debug log file (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Forget the saved window layout before opening windows
    #[arg(long)]
    pub reset_windows: bool,
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::from_name(value).ok_or_else(|| format!("unknown log level '{}'", value))
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    /// Open a new window on startup, or in the primary instance if one is running
    pub new_window: bool,
    /// URL for the new window
    pub url: Option<String>,
    /// Log level override from `--log-level`
    pub log_level: Option<log::LevelFilter>,
    /// Reset the saved layout before opening windows
    pub reset_windows: bool,
    /// Raw arguments (program name excluded), forwarded to a running instance
    pub args: Vec<String>,
}

/// Result of CLI processing
pub enum CliResult {
    /// Continue with normal application startup
    Continue(RuntimeOptions),
    /// Exit with the given code
    Exit(i32),
}

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        Self {
            new_window: cli.new_window,
            url: cli.url,
            log_level: cli.log_level.map(LogLevel::to_level_filter),
            reset_windows: cli.reset_windows,
            args: Vec::new(),
        }
    }
}

/// Process CLI arguments
pub fn process_cli() -> CliResult {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            return CliResult::Exit(code);
        }
    };

    let mut options = RuntimeOptions::from(cli);
    options.args = std::env::args().skip(1).collect();
    CliResult::Continue(options)
}
