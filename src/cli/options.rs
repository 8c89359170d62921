use std::fmt;
use std::str::FromStr;

use crate::error::CliError;

/// Port the server listens on when none is given.
pub const DEFAULT_PORT: u16 = 8099;

/// Mock directory used when `-m` carries no value.
pub const DEFAULT_MOCK_DIR: &str = "mock-files";

/// Format of the report files the server writes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    /// Passed to the server verbatim.
    Other(String),
}

impl ReportFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "text" => ReportFormat::Text,
            "json" => ReportFormat::Json,
            other => ReportFormat::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Other(s) => s,
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for launching the server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    pub port: u16,
    /// Upstream URL requests are forwarded to.
    pub target: Option<String>,
    pub mock_dir: Option<String>,
    /// Location of the RAML definition.
    pub raml: Option<String>,
    pub base_uri: Option<String>,
    /// Where failing requests and responses are written.
    pub save_dir: Option<String>,
    pub format: ReportFormat,
    /// Ignore X-headers during validation.
    pub ignore_x: bool,
    /// Detach from the server once it reports it has started.
    pub async_mode: bool,
    pub min_delay: u64,
    pub max_delay: u64,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            target: None,
            mock_dir: None,
            raml: None,
            base_uri: None,
            save_dir: None,
            format: ReportFormat::Text,
            ignore_x: false,
            async_mode: false,
            min_delay: 0,
            max_delay: 0,
        }
    }
}

/// A command understood by a running server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Stop,
    Ping,
    Reload,
    Reports,
    Usage,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Stop,
        Command::Ping,
        Command::Reload,
        Command::Reports,
        Command::Usage,
    ];

    /// Name used on the wire and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Stop => "stop",
            Command::Ping => "ping",
            Command::Reload => "reload",
            Command::Reports => "reports",
            Command::Usage => "usage",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Command::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| CliError::UnknownCommand(s.to_string()))
    }
}

/// Options for sending a command to a running server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub port: u16,
    pub command: Command,
    pub clear_reports: bool,
    pub clear_usage: bool,
}

impl ClientOptions {
    pub fn new(command: Command) -> Self {
        Self {
            port: DEFAULT_PORT,
            command,
            clear_reports: false,
            clear_usage: false,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Result of decoding one argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCli {
    None,
    Server(ServerOptions),
    Client(ClientOptions),
}
