//! Structured output envelope for all CLI commands.
//!
//! Every command produces a result envelope on stdout:
//!
//! ```json
//! {
//!   "ok": true,
//!   "command": "review",
//!   "data": { ... },
//!   "timings": { "durationMs": 1234 }
//! }
//! ```
//!
//! On failure:
//!
//! ```json
//! {
//!   "ok": false,
//!   "command": "review",
//!   "error": {
//!     "code": "TIMEOUT",
//!     "message": "timed out after 10000ms waiting for: #app",
//!     "details": { ... }
//!   }
//! }
//! ```

use std::io::{self, Write};
use std::time::{Duration, Instant};

use clap::ValueEnum;
use jarvis::TraversalReport;
use serde::{Deserialize, Serialize};

use crate::browser::StoredCookie;

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output (default, best for agents)
    #[default]
    Json,
    /// Human-readable text
    Text,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// The main result envelope returned by all commands.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
    /// Whether the command succeeded
    pub ok: bool,

    /// Command name (e.g., "review", "hello", "clone")
    pub command: String,

    /// Command-specific result data (only present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error information (only present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,

    /// Timing information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timings: Option<Timings>,
}

/// Error information for failed commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    /// Error code (e.g., "TIMEOUT", "DRIVER_LAUNCH_FAILED")
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Standardized error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// WebDriver server failed to start or respond
    DriverLaunchFailed,
    /// Navigation to URL failed
    NavigationFailed,
    /// Readiness poll expired
    Timeout,
    /// Session/connection error
    SessionError,
    /// External program could not be spawned
    ScriptFailed,
    /// Configuration file missing or malformed
    ConfigError,
    /// File I/O error
    IoError,
    /// Unknown/internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::DriverLaunchFailed => write!(f, "DRIVER_LAUNCH_FAILED"),
            ErrorCode::NavigationFailed => write!(f, "NAVIGATION_FAILED"),
            ErrorCode::Timeout => write!(f, "TIMEOUT"),
            ErrorCode::SessionError => write!(f, "SESSION_ERROR"),
            ErrorCode::ScriptFailed => write!(f, "SCRIPT_FAILED"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Timing information for the command
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
    /// Total duration in milliseconds
    pub duration_ms: u64,
}

impl From<Duration> for Timings {
    fn from(duration: Duration) -> Self {
        Timings {
            duration_ms: duration.as_millis() as u64,
        }
    }
}

/// Builder for constructing command results
pub struct ResultBuilder<T: Serialize> {
    command: String,
    data: Option<T>,
    error: Option<CommandError>,
    start_time: Option<Instant>,
    timings: Option<Timings>,
}

impl<T: Serialize> ResultBuilder<T> {
    /// Create a new result builder for the given command
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            data: None,
            error: None,
            start_time: Some(Instant::now()),
            timings: None,
        }
    }

    /// Set the successful result data
    pub fn data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Set an error
    pub fn error(mut self, code: ErrorCode, message: impl Into<String>) -> Self {
        self.error = Some(CommandError {
            code,
            message: message.into(),
            details: None,
        });
        self
    }

    /// Set an error with details
    pub fn error_with_details(
        mut self,
        code: ErrorCode,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        self.error = Some(CommandError {
            code,
            message: message.into(),
            details: Some(details),
        });
        self
    }

    /// Override timings (if not using automatic timing from start_time)
    pub fn timings(mut self, timings: Timings) -> Self {
        self.timings = Some(timings);
        self
    }

    /// Build the final result
    pub fn build(self) -> CommandResult<T> {
        let ok = self.error.is_none() && self.data.is_some();

        let timings = self
            .timings
            .or_else(|| self.start_time.map(|start| Timings::from(start.elapsed())));

        CommandResult {
            ok,
            command: self.command,
            data: self.data,
            error: self.error,
            timings,
        }
    }
}

/// Print a command result to stdout in the specified format
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{json}");
            }
        }
        OutputFormat::Text => {
            print_result_text(result);
        }
    }
}

/// Print a command result in human-readable text format
fn print_result_text<T: Serialize>(result: &CommandResult<T>) {
    let mut stdout = io::stdout().lock();

    if result.ok {
        if let Some(ref data) = result.data {
            if let Ok(json) = serde_json::to_string_pretty(data) {
                let _ = writeln!(stdout, "{json}");
            }
        }
    } else if let Some(ref error) = result.error {
        let _ = writeln!(stdout, "Error [{}]: {}", error.code, error.message);
        if let Some(ref details) = error.details {
            if let Ok(json) = serde_json::to_string_pretty(details) {
                let _ = writeln!(stdout, "Details: {json}");
            }
        }
    }

    if let Some(ref timings) = result.timings {
        let _ = writeln!(stdout, "Completed in {}ms", timings.duration_ms);
    }
}

/// Print an error to stderr in human-readable format
pub fn print_error_stderr(error: &CommandError) {
    eprintln!("Error [{}]: {}", error.code, error.message);
}

/// A command result with no data (for commands that only produce side effects)
pub type EmptyResult = CommandResult<()>;

/// Result data for launcher actions: the one-line status.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusData {
    pub status: String,
}

/// Result data for `review`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewData {
    pub page: String,
    pub listing_url: String,
    #[serde(flatten)]
    pub report: TraversalReport,
}

/// Result data for `auth login`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub path: String,
    pub cookies: usize,
}

/// Result data for `auth show`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieListData {
    pub path: String,
    pub cookies: Vec<StoredCookie>,
}
