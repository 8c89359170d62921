use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use env_logger::Env;
use log::error;

use raml_tester::cli::{parse_cli, Cli, ClientOptions, ParsedCli, ServerOptions};
use raml_tester::client::CommandClient;
use raml_tester::config;
use raml_tester::error::LaunchError;
use raml_tester::server::{start_replacing, ServerLauncher, DEFAULT_JAVA};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    // Command-line settings win over saved ones.
    let mut config = config::load_config();
    let java = cli
        .java
        .clone()
        .or_else(|| config.java.clone())
        .unwrap_or_else(|| DEFAULT_JAVA.to_string());
    let jar = cli.jar.clone().or_else(|| config.jar.clone());
    let host = cli
        .host
        .clone()
        .or_else(|| config.host.clone())
        .unwrap_or_else(|| "localhost".to_string());

    if cli.save_config {
        config.java = Some(java.clone());
        config.jar = jar.clone();
        config.host = Some(host.clone());
        if let Err(e) = config::save_config(&config) {
            eprintln!("Failed to save configuration: {}", e);
            process::exit(1);
        }
        println!("Configuration saved successfully.");
    }

    let parsed = match parse_cli(&cli.args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match parsed {
        ParsedCli::None if cli.save_config => {}
        ParsedCli::None => {
            show_help(&java, jar).await;
            process::exit(1);
        }
        ParsedCli::Server(opts) => start_server(&java, jar, &host, opts).await,
        ParsedCli::Client(opts) => execute_command(&host, opts).await,
    }
}

fn launcher(java: &str, jar: Option<PathBuf>) -> ServerLauncher {
    match jar {
        Some(jar) => ServerLauncher::new(java, jar),
        None => {
            eprintln!("{}", LaunchError::MissingJar);
            process::exit(1);
        }
    }
}

/// Prints our own usage, followed by the server's when a jar is known.
async fn show_help(java: &str, jar: Option<PathBuf>) {
    let _ = Cli::command().print_help();
    let Some(jar) = jar else {
        return;
    };
    println!();
    match ServerLauncher::new(java, jar).help() {
        Ok(server) => {
            if let Err(e) = server.forward(|line| println!("{}", line)).await {
                error!("Failed to show server help: {}", e);
            }
        }
        Err(e) => error!("Failed to show server help: {}", e),
    }
}

async fn start_server(java: &str, jar: Option<PathBuf>, host: &str, opts: ServerOptions) {
    let launcher = launcher(java, jar);
    let client = CommandClient::new(host);

    match start_replacing(&client, &launcher, &opts, |line| println!("{}", line)).await {
        Ok(None) => {}
        Ok(Some(status)) if status.success() => {}
        Ok(Some(status)) => process::exit(status.code().unwrap_or(1)),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn execute_command(host: &str, opts: ClientOptions) {
    let client = CommandClient::new(host);
    match client.command(None, &opts).await {
        Ok(result) => println!("{}", result),
        Err(e) if e.is_connect() => {
            eprintln!("Could not connect to proxy, start a new one.");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Problem executing command: {}", e);
            process::exit(1);
        }
    }
}
