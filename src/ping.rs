use log::{debug, info};
use tokio::time::{interval, Duration};

use crate::cli::options::ClientOptions;
use crate::client::{CommandClient, Transport};
use crate::error::ClientError;

/// Pings until the server answers or `attempts` run out, one try per `every`.
/// Returns the answer, or the last failure.
pub async fn wait_for_pong<T: Transport>(
    client: &CommandClient<T>,
    opts: &ClientOptions,
    attempts: u32,
    every: Duration,
) -> Result<String, ClientError> {
    let mut interval = interval(every);
    let mut last_error = None;

    for attempt in 1..=attempts.max(1) {
        interval.tick().await;

        match client.ping(opts).await {
            Ok(answer) => {
                info!("Server on port {} answered ping: {}", opts.port, answer);
                return Ok(answer);
            }
            Err(e) => {
                debug!("Ping attempt {}/{} failed: {}", attempt, attempts, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or(ClientError::Timeout(every * attempts)))
}
