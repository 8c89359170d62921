//! Launcher and control client for the RAML tester proxy server.
//!
//! The server itself is a separate Java artifact. This crate starts it,
//! sends it `/@@@proxy/<command>` requests and turns its reports into
//! test assertions.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod matchers;
pub mod ping;
pub mod report;
pub mod server;
pub mod utils;

pub use cli::{parse_cli, render_server_cli, ClientOptions, Command, ParsedCli, ServerOptions};
pub use client::{CommandClient, TesterClient, TesterConfig};
pub use error::{ClientError, CliError, LaunchError};
pub use matchers::{assert_fully_used, assert_no_violations, FullyUsed, Matcher, NoViolations};
pub use report::{dirty_reports, unused_elements, Report, UsageCategory, UsageReport};
pub use server::{start_replacing, ServerLauncher, ServerProcess};
