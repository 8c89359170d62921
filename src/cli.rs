pub mod codec;
pub mod options;

use std::path::PathBuf;

use clap::Parser;

pub use codec::{parse_cli, render_server_args, render_server_cli, ServerFlag};
pub use options::{ClientOptions, Command, ParsedCli, ReportFormat, ServerOptions, DEFAULT_PORT};

/// Command-line interface definition.
///
/// Launcher settings come first; everything after them is handed to the
/// option codec untouched.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    after_help = "Start a server:   raml-tester -r<raml> (-t<target> | -m<mock dir> -b<base uri>) [-p<port>] [-s<save dir>] [-f<format>] [-i] [-a] [-d<min>-<max>]\n\
                  Send a command:   raml-tester <stop|ping|reload|reports|usage> [-r] [-u] [-p<port>]"
)]
pub struct Cli {
    /// Path to the server jar (overrides saved configuration)
    #[arg(long, env = "RAML_TESTER_JAR")]
    pub jar: Option<PathBuf>,

    /// Java executable used to run the server (default: java)
    #[arg(long, env = "RAML_TESTER_JAVA")]
    pub java: Option<String>,

    /// Host a running server is reached on (default: localhost)
    #[arg(long)]
    pub host: Option<String>,

    /// Save --jar, --java and --host as defaults
    #[arg(long)]
    pub save_config: bool,

    /// Server options or a command with its options
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
