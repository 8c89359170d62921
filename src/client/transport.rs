use std::future::Future;
use std::time::Duration;

use log::debug;
use url::Url;

use crate::error::ClientError;

/// Status and body of one command response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a single GET against a running server.
pub trait Transport: Send + Sync {
    fn get(
        &self,
        url: Url,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<RawResponse, ClientError>> + Send;
}

impl Transport for reqwest::Client {
    fn get(
        &self,
        url: Url,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<RawResponse, ClientError>> + Send {
        async move {
            debug!("GET {}", url);
            let mut request = reqwest::Client::get(self, url);
            if let Some(timeout) = timeout {
                request = request.timeout(timeout);
            }
            let response = request.send().await.map_err(|e| timed_out(e, timeout))?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| timed_out(e, timeout))?;
            debug!("Response status: {}, body length: {} bytes", status, body.len());
            Ok(RawResponse { status, body })
        }
    }
}

fn timed_out(e: reqwest::Error, timeout: Option<Duration>) -> ClientError {
    match timeout {
        Some(timeout) if e.is_timeout() => ClientError::Timeout(timeout),
        _ => ClientError::Transport(e),
    }
}
