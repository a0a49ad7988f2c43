use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, JarvisError>;

#[derive(Debug, Error)]
pub enum JarvisError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("webdriver binary not found: {0}")]
    DriverNotFound(String),

    #[error("webdriver launch failed: {0}")]
    DriverLaunch(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("{error}: {message}")]
    Remote { error: String, message: String },

    #[error("failed to run {program}")]
    Script {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Portal(#[from] jarvis::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl JarvisError {
    /// True for server errors that mean an element went away between a
    /// query and the interaction with it.
    pub fn is_missing_element(&self) -> bool {
        matches!(
            self,
            JarvisError::Remote { error, .. }
                if error == "no such element" || error == "stale element reference"
        )
    }

    /// Convert this error to a CommandError for structured output
    pub fn to_command_error(&self) -> CommandError {
        let (code, message, details) = match self {
            JarvisError::Config(msg) => (ErrorCode::ConfigError, msg.clone(), None),
            JarvisError::ConfigRead { path, source } => (
                ErrorCode::ConfigError,
                format!("Failed to read config file {}: {source}", path.display()),
                Some(serde_json::json!({ "path": path })),
            ),
            JarvisError::ConfigParse { path, source } => (
                ErrorCode::ConfigError,
                format!("Failed to parse config file {}: {source}", path.display()),
                Some(serde_json::json!({ "path": path })),
            ),
            JarvisError::DriverNotFound(binary) => (
                ErrorCode::DriverLaunchFailed,
                format!("WebDriver binary not found on PATH: {binary}"),
                Some(serde_json::json!({ "binary": binary })),
            ),
            JarvisError::DriverLaunch(msg) => (ErrorCode::DriverLaunchFailed, msg.clone(), None),
            JarvisError::Session(msg) => (ErrorCode::SessionError, msg.clone(), None),
            JarvisError::Remote { error, message } => (
                ErrorCode::SessionError,
                format!("{error}: {message}"),
                Some(serde_json::json!({ "error": error })),
            ),
            JarvisError::Script { program, source } => (
                ErrorCode::ScriptFailed,
                format!("Failed to run {program}: {source}"),
                Some(serde_json::json!({ "program": program })),
            ),
            JarvisError::Portal(err) => match err {
                jarvis::Error::ReadinessTimeout {
                    selector,
                    waited_ms,
                } => (
                    ErrorCode::Timeout,
                    err.to_string(),
                    Some(serde_json::json!({
                        "selector": selector.to_string(),
                        "waitedMs": waited_ms,
                    })),
                ),
                jarvis::Error::Navigation { url, source } => (
                    ErrorCode::NavigationFailed,
                    format!("Navigation to {url} failed: {source}"),
                    Some(serde_json::json!({ "url": url })),
                ),
                jarvis::Error::Driver(source) => (
                    ErrorCode::SessionError,
                    format!("Driver call failed: {source}"),
                    None,
                ),
            },
            JarvisError::Io(err) => (ErrorCode::IoError, err.to_string(), None),
            JarvisError::Json(err) => {
                (ErrorCode::InternalError, format!("JSON error: {err}"), None)
            }
            JarvisError::Anyhow(err) => (ErrorCode::InternalError, err.to_string(), None),
        };

        CommandError {
            code,
            message,
            details,
        }
    }
}
