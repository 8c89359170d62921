//! Mapping between flat argument vectors and typed options.
//!
//! Options are single-dash, single-letter, with the value glued on
//! (`-p9090`, `-d100-500`). Unknown letters are skipped so the server can
//! grow new flags without breaking older launchers.

use itertools::Itertools;

use super::options::{
    ClientOptions, Command, ParsedCli, ReportFormat, ServerOptions, DEFAULT_MOCK_DIR,
};
use crate::error::CliError;

/// One entry of the server option table. The order of [`ServerFlag::ALL`]
/// is the order options are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerFlag {
    Port,
    Target,
    MockDir,
    Raml,
    BaseUri,
    SaveDir,
    Format,
    IgnoreX,
    Async,
    Delay,
}

impl ServerFlag {
    pub const ALL: [ServerFlag; 10] = [
        ServerFlag::Port,
        ServerFlag::Target,
        ServerFlag::MockDir,
        ServerFlag::Raml,
        ServerFlag::BaseUri,
        ServerFlag::SaveDir,
        ServerFlag::Format,
        ServerFlag::IgnoreX,
        ServerFlag::Async,
        ServerFlag::Delay,
    ];

    pub fn key(self) -> char {
        match self {
            ServerFlag::Port => 'p',
            ServerFlag::Target => 't',
            ServerFlag::MockDir => 'm',
            ServerFlag::Raml => 'r',
            ServerFlag::BaseUri => 'b',
            ServerFlag::SaveDir => 's',
            ServerFlag::Format => 'f',
            ServerFlag::IgnoreX => 'i',
            ServerFlag::Async => 'a',
            ServerFlag::Delay => 'd',
        }
    }

    pub fn from_key(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Switches (`-i`, `-a`) ignore anything glued to them.
    fn apply(self, opts: &mut ServerOptions, value: &str) -> Result<(), CliError> {
        match self {
            ServerFlag::Port => opts.port = parse_number(self, value)?,
            ServerFlag::Target => opts.target = Some(value.to_string()),
            ServerFlag::MockDir => {
                let dir = if value.is_empty() { DEFAULT_MOCK_DIR } else { value };
                opts.mock_dir = Some(dir.to_string());
            }
            ServerFlag::Raml => opts.raml = Some(value.to_string()),
            ServerFlag::BaseUri => opts.base_uri = Some(value.to_string()),
            ServerFlag::SaveDir => opts.save_dir = Some(value.to_string()),
            ServerFlag::Format => opts.format = ReportFormat::parse(value),
            ServerFlag::IgnoreX => opts.ignore_x = true,
            ServerFlag::Async => opts.async_mode = true,
            ServerFlag::Delay => match value.split_once('-') {
                Some((min, max)) => {
                    opts.min_delay = parse_number(self, min)?;
                    opts.max_delay = parse_number(self, max)?;
                }
                None => {
                    let delay = parse_number(self, value)?;
                    opts.min_delay = delay;
                    opts.max_delay = delay;
                }
            },
        }
        Ok(())
    }

    fn render(self, opts: &ServerOptions) -> Option<String> {
        let value = match self {
            ServerFlag::Port => opts.port.to_string(),
            ServerFlag::Target => opts.target.clone()?,
            ServerFlag::MockDir => opts.mock_dir.clone()?,
            ServerFlag::Raml => opts.raml.clone()?,
            ServerFlag::BaseUri => opts.base_uri.clone()?,
            ServerFlag::SaveDir => opts.save_dir.clone()?,
            ServerFlag::Format => opts.format.to_string(),
            ServerFlag::IgnoreX => return opts.ignore_x.then(|| format!("-{}", self.key())),
            ServerFlag::Async => return opts.async_mode.then(|| format!("-{}", self.key())),
            ServerFlag::Delay => format!("{}-{}", opts.min_delay, opts.max_delay),
        };
        Some(format!("-{}{}", self.key(), value))
    }
}

fn parse_number<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    flag: ServerFlag,
    value: &str,
) -> Result<T, CliError> {
    value.parse().map_err(|source| CliError::InvalidNumber {
        flag: flag.key(),
        value: value.to_string(),
        source,
    })
}

/// Splits every dash-prefixed argument into its option letter and value.
fn options<S: AsRef<str>>(args: &[S]) -> impl Iterator<Item = (char, &str)> {
    args.iter().filter_map(|arg| {
        let rest = arg.as_ref().strip_prefix('-')?;
        let key = rest.chars().next()?;
        Some((key, &rest[key.len_utf8()..]))
    })
}

/// Decodes an argument vector. A leading dash selects server mode, a bare
/// word selects client mode with that word as the command.
pub fn parse_cli<S: AsRef<str>>(args: &[S]) -> Result<ParsedCli, CliError> {
    match args.first() {
        None => Ok(ParsedCli::None),
        Some(first) if first.as_ref().starts_with('-') => {
            parse_server_cli(args).map(ParsedCli::Server)
        }
        Some(_) => parse_client_cli(args).map(ParsedCli::Client),
    }
}

pub fn parse_server_cli<S: AsRef<str>>(args: &[S]) -> Result<ServerOptions, CliError> {
    let mut opts = ServerOptions::default();
    for (key, value) in options(args) {
        if let Some(flag) = ServerFlag::from_key(key) {
            flag.apply(&mut opts, value)?;
        }
    }
    Ok(opts)
}

pub fn parse_client_cli<S: AsRef<str>>(args: &[S]) -> Result<ClientOptions, CliError> {
    let command: Command = args
        .first()
        .map(|a| a.as_ref())
        .unwrap_or_default()
        .parse()?;
    let mut opts = ClientOptions::new(command);
    for (key, value) in options(args) {
        match key {
            'r' => opts.clear_reports = true,
            'u' => opts.clear_usage = true,
            'p' => opts.port = parse_number(ServerFlag::Port, value)?,
            _ => {}
        }
    }
    Ok(opts)
}

/// Renders server options as the arguments the server jar expects.
pub fn render_server_args(opts: &ServerOptions) -> Vec<String> {
    ServerFlag::ALL
        .into_iter()
        .filter_map(|flag| flag.render(opts))
        .collect()
}

/// Same as [`render_server_args`], joined with single spaces.
pub fn render_server_cli(opts: &ServerOptions) -> String {
    render_server_args(opts).into_iter().join(" ")
}
