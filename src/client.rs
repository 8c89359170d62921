//! Clients for the `/@@@proxy/<command>` control endpoints of a running server.

pub mod tester;
pub mod transport;

use log::info;
use url::Url;

use crate::cli::options::{ClientOptions, Command};
use crate::error::ClientError;
use crate::utils::server_base;

pub use tester::{RequestOptions, TesterClient, TesterConfig, DEFAULT_TIMEOUT};
pub use transport::{RawResponse, Transport};

/// Path prefix of all control commands.
pub const COMMAND_PATH: &str = "/@@@proxy";

/// Builds `<base>/@@@proxy/<command>`, adding the clear flags only when set.
pub fn command_url(
    base: &Url,
    command: &str,
    clear_reports: bool,
    clear_usage: bool,
) -> Result<Url, ClientError> {
    let mut url = base.join(&format!("{}/{}", COMMAND_PATH, command))?;
    if clear_reports || clear_usage {
        let mut query = url.query_pairs_mut();
        if clear_reports {
            query.append_pair("clear-reports", "true");
        }
        if clear_usage {
            query.append_pair("clear-usage", "true");
        }
    }
    Ok(url)
}

/// Sends commands and hands back the raw response body, whatever the status.
/// No timeout is applied; the call lasts as long as the server takes.
pub struct CommandClient<T = reqwest::Client> {
    transport: T,
    host: String,
}

impl CommandClient {
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_transport(reqwest::Client::new(), host)
    }
}

impl<T: Transport> CommandClient<T> {
    pub fn with_transport(transport: T, host: impl Into<String>) -> Self {
        Self {
            transport,
            host: host.into(),
        }
    }

    pub async fn stop(&self, opts: &ClientOptions) -> Result<String, ClientError> {
        self.run(Command::Stop, opts).await
    }

    pub async fn ping(&self, opts: &ClientOptions) -> Result<String, ClientError> {
        self.run(Command::Ping, opts).await
    }

    pub async fn reload(&self, opts: &ClientOptions) -> Result<String, ClientError> {
        self.run(Command::Reload, opts).await
    }

    /// Reports as the server sent them, unparsed.
    pub async fn reports(&self, opts: &ClientOptions) -> Result<String, ClientError> {
        self.run(Command::Reports, opts).await
    }

    /// Usage as the server sent it, unparsed.
    pub async fn usage(&self, opts: &ClientOptions) -> Result<String, ClientError> {
        self.run(Command::Usage, opts).await
    }

    async fn run(&self, command: Command, opts: &ClientOptions) -> Result<String, ClientError> {
        let opts = ClientOptions {
            command,
            ..opts.clone()
        };
        self.command(None, &opts).await
    }

    /// Sends `opts.command`, or `url` in its place when given.
    pub async fn command(
        &self,
        url: Option<&str>,
        opts: &ClientOptions,
    ) -> Result<String, ClientError> {
        let command = url.unwrap_or(opts.command.as_str());
        let url = command_url(
            &server_base(&self.host, opts.port)?,
            command,
            opts.clear_reports,
            opts.clear_usage,
        )?;
        info!("Sending command '{}' to {}", command, url);
        let response = self.transport.get(url, None).await?;
        Ok(response.body)
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::fake::FakeTransport;
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8099").unwrap()
    }

    #[test]
    fn url_without_flags_has_no_query() {
        let url = command_url(&base(), "ping", false, false).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8099/@@@proxy/ping");
    }

    #[test]
    fn url_with_both_flags() {
        let url = command_url(&base(), "reload", true, true).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8099/@@@proxy/reload?clear-reports=true&clear-usage=true"
        );
    }

    #[test]
    fn url_with_clear_usage_only() {
        let url = command_url(&base(), "ping", false, true).unwrap();
        assert_eq!(url.query(), Some("clear-usage=true"));
    }

    #[tokio::test]
    async fn aliases_fix_the_command() {
        let client = CommandClient::with_transport(FakeTransport::default(), "localhost");
        for _ in 0..5 {
            client.transport.push(200, "ok");
        }
        let opts = ClientOptions::new(Command::Ping).with_port(9000);
        client.stop(&opts).await.unwrap();
        client.ping(&opts).await.unwrap();
        client.reload(&opts).await.unwrap();
        client.reports(&opts).await.unwrap();
        client.usage(&opts).await.unwrap();
        assert_eq!(
            client.transport.urls(),
            vec![
                "http://localhost:9000/@@@proxy/stop",
                "http://localhost:9000/@@@proxy/ping",
                "http://localhost:9000/@@@proxy/reload",
                "http://localhost:9000/@@@proxy/reports",
                "http://localhost:9000/@@@proxy/usage",
            ]
        );
    }

    #[tokio::test]
    async fn no_timeout_and_raw_body() {
        let body = r#"[{"requestViolations":["X"],"responseViolations":[]}]"#;
        let client = CommandClient::with_transport(FakeTransport::answering(200, body), "localhost");
        let opts = ClientOptions::new(Command::Reports);
        assert_eq!(client.reports(&opts).await.unwrap(), body);
        assert_eq!(client.transport.calls.lock().unwrap()[0].1, None);
    }

    #[tokio::test]
    async fn error_status_still_returns_body() {
        let client = CommandClient::with_transport(FakeTransport::answering(500, "boom"), "localhost");
        let opts = ClientOptions::new(Command::Reload);
        assert_eq!(client.reload(&opts).await.unwrap(), "boom");
    }

    #[tokio::test]
    async fn url_override_and_flags() {
        let client = CommandClient::with_transport(FakeTransport::answering(200, "ok"), "localhost");
        let mut opts = ClientOptions::new(Command::Ping);
        opts.clear_reports = true;
        client.command(Some("reports/clear"), &opts).await.unwrap();
        assert_eq!(
            client.transport.urls(),
            vec!["http://localhost:8099/@@@proxy/reports/clear?clear-reports=true"]
        );
    }

    #[tokio::test]
    async fn transport_failure_is_returned() {
        let fake = FakeTransport::default();
        fake.push_err(ClientError::Timeout(Duration::from_millis(5)));
        let client = CommandClient::with_transport(fake, "localhost");
        let err = client
            .ping(&ClientOptions::new(Command::Ping))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout(_)));
    }
}
