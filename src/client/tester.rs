//! Client for test suites: bounded by a timeout, strict about status codes,
//! and decoding `reports` and `usage` into typed records.

use std::time::Duration;

use log::{debug, error};

use super::{command_url, Transport};
use crate::cli::options::{Command, DEFAULT_PORT};
use crate::error::ClientError;
use crate::report::{Report, ReportsPayload, UsagePayload};
use crate::utils::server_base;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Where the server runs and how long a call may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesterConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
}

pub struct TesterClient<T = reqwest::Client> {
    transport: T,
    config: TesterConfig,
}

impl TesterClient {
    pub fn new(config: TesterConfig) -> Self {
        Self::with_transport(reqwest::Client::new(), config)
    }
}

impl<T: Transport> TesterClient<T> {
    pub fn with_transport(transport: T, config: TesterConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &TesterConfig {
        &self.config
    }

    pub async fn ping(&self) -> Result<String, ClientError> {
        self.send(Command::Ping.as_str(), false, false, RequestOptions::default())
            .await
    }

    /// Reloads the RAML definition and drops collected reports and usage.
    pub async fn reload(&self) -> Result<String, ClientError> {
        self.send(Command::Reload.as_str(), true, true, RequestOptions::default())
            .await
    }

    pub async fn clear_reports(&self) -> Result<String, ClientError> {
        self.send(Command::Ping.as_str(), true, false, RequestOptions::default())
            .await
    }

    pub async fn clear_usage(&self) -> Result<String, ClientError> {
        self.send(Command::Ping.as_str(), false, true, RequestOptions::default())
            .await
    }

    pub async fn reports(&self) -> Result<Vec<Report>, ClientError> {
        let body = self
            .send(Command::Reports.as_str(), false, false, RequestOptions::default())
            .await?;
        let payload: ReportsPayload = serde_json::from_str(&body).map_err(invalid)?;
        payload.into_reports().map_err(invalid)
    }

    pub async fn usage(&self) -> Result<UsagePayload, ClientError> {
        let body = self
            .send(Command::Usage.as_str(), false, false, RequestOptions::default())
            .await?;
        serde_json::from_str(&body).map_err(invalid)
    }

    /// Sends an arbitrary path below the command prefix, query included.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<String, ClientError> {
        self.send(path, false, false, options).await
    }

    async fn send(
        &self,
        path: &str,
        clear_reports: bool,
        clear_usage: bool,
        options: RequestOptions,
    ) -> Result<String, ClientError> {
        let base = server_base(&self.config.host, self.config.port)?;
        let url = command_url(&base, path, clear_reports, clear_usage)?;
        let timeout = options.timeout.unwrap_or(self.config.timeout);
        debug!("Requesting {} (timeout {:?})", url, timeout);
        let response = self.transport.get(url, Some(timeout)).await?;
        if !response.is_success() {
            return Err(ClientError::Status {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response.body)
    }
}

fn invalid(e: serde_json::Error) -> ClientError {
    error!("Server sent a malformed payload: {}", e);
    ClientError::Payload(e)
}
