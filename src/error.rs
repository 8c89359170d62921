//! Error types for the launcher, the codec and the command clients.

use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while decoding an argument vector.
#[derive(Error, Debug, PartialEq)]
pub enum CliError {
    #[error("Invalid number '{value}' for option -{flag}: {source}")]
    InvalidNumber {
        flag: char,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Unknown command '{0}', expected one of stop, ping, reload, reports, usage")]
    UnknownCommand(String),
}

/// Errors raised by the command clients.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Server answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ClientError {
    /// True when the server could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, ClientError::Transport(e) if e.is_connect())
    }
}

/// Errors raised when starting the server process.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("No server jar configured. Use --jar or RAML_TESTER_JAR")]
    MissingJar,

    #[error("Server jar not found: {0}")]
    JarNotFound(PathBuf),

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server stopped before it was started")]
    NotStarted,

    #[error("Server does not answer on port {port}: {source}")]
    NoAnswer {
        port: u16,
        #[source]
        source: ClientError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
