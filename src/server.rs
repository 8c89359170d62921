use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use log::{debug, error, info};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::cli::codec::render_server_args;
use crate::cli::options::{ClientOptions, Command as ProxyCommand, ServerOptions};
use crate::client::{CommandClient, Transport};
use crate::error::LaunchError;
use crate::ping::wait_for_pong;
use crate::utils::is_started_line;

pub const DEFAULT_JAVA: &str = "java";

const PONG_ATTEMPTS: u32 = 10;
const PONG_EVERY: Duration = Duration::from_millis(200);

/// Starts the tester server jar with a Java runtime.
#[derive(Debug, Clone)]
pub struct ServerLauncher {
    java: String,
    jar: PathBuf,
}

impl ServerLauncher {
    pub fn new(java: impl Into<String>, jar: impl Into<PathBuf>) -> Self {
        Self {
            java: java.into(),
            jar: jar.into(),
        }
    }

    /// Arguments handed to the Java runtime.
    pub fn command_line(&self, server_args: &[String]) -> Vec<String> {
        let mut args = vec!["-jar".to_string(), self.jar.display().to_string()];
        args.extend(server_args.iter().cloned());
        args
    }

    /// Runs the server without options, which makes it print its usage.
    pub fn help(&self) -> Result<ServerProcess, LaunchError> {
        self.spawn(&[])
    }

    pub fn start(&self, opts: &ServerOptions) -> Result<ServerProcess, LaunchError> {
        info!("Starting server on port {}", opts.port);
        self.spawn(&render_server_args(opts))
    }

    fn spawn(&self, server_args: &[String]) -> Result<ServerProcess, LaunchError> {
        if !self.jar.is_file() {
            return Err(LaunchError::JarNotFound(self.jar.clone()));
        }
        let args = self.command_line(server_args);
        debug!("Executing {} {}", self.java, args.join(" "));

        let mut child = Command::new(&self.java)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: self.java.clone(),
                source,
            })?;

        let (tx, lines) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            pipe_lines(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            pipe_lines(stderr, tx);
        }

        Ok(ServerProcess { child, lines })
    }
}

/// Stops whatever server listens on `opts.port`, then starts a new one.
///
/// Without `async_mode` the output goes to `out` until the server exits and
/// its exit status is returned. In `async_mode` forwarding stops once the
/// server reports it has started and answers a ping; the process is left
/// running and `None` is returned.
pub async fn start_replacing<T, F>(
    client: &CommandClient<T>,
    launcher: &ServerLauncher,
    opts: &ServerOptions,
    mut out: F,
) -> Result<Option<ExitStatus>, LaunchError>
where
    T: Transport,
    F: FnMut(&str),
{
    let control = ClientOptions::new(ProxyCommand::Stop).with_port(opts.port);

    match client.stop(&control).await {
        Ok(answer) => info!("Stopped running server: {}", answer),
        Err(e) => debug!("No server to stop on port {}: {}", opts.port, e),
    }

    let mut server = launcher.start(opts)?;
    if !opts.async_mode {
        return server.forward(out).await.map(Some);
    }

    if !server.forward_until_started(&mut out).await {
        return Err(LaunchError::NotStarted);
    }
    wait_for_pong(client, &control, PONG_ATTEMPTS, PONG_EVERY)
        .await
        .map_err(|source| LaunchError::NoAnswer {
            port: opts.port,
            source,
        })?;
    Ok(None)
}

/// Forwards every line of `reader` until EOF or until nobody listens.
fn pipe_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read server output: {}", e);
                    break;
                }
            }
        }
    });
}

/// A running server and its merged stdout/stderr lines.
pub struct ServerProcess {
    child: Child,
    lines: mpsc::UnboundedReceiver<String>,
}

impl ServerProcess {
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Next output line; `None` once both streams are closed.
    pub async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }

    /// Hands every output line to `out` and waits for the process to exit.
    pub async fn forward<F: FnMut(&str)>(mut self, mut out: F) -> Result<ExitStatus, LaunchError> {
        while let Some(line) = self.lines.recv().await {
            out(&line);
        }
        let status = self.child.wait().await?;
        info!("Server exited with {}", status);
        Ok(status)
    }

    /// Hands output lines to `out` until the server reports it has started.
    /// Returns false if the output ended first.
    pub async fn forward_until_started<F: FnMut(&str)>(&mut self, mut out: F) -> bool {
        while let Some(line) = self.lines.recv().await {
            out(&line);
            if is_started_line(&line) {
                return true;
            }
        }
        false
    }

    pub async fn kill(&mut self) -> Result<(), LaunchError> {
        self.child.kill().await?;
        Ok(())
    }
}
