use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Launcher defaults stored on disk.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jar: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// Get the configuration file path in a cross-platform way.
fn get_config_path() -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("org", "raml-tester", "raml-tester-cli")?;
    let config_dir = proj_dirs.config_dir();
    fs::create_dir_all(config_dir).ok()?;
    Some(config_dir.join("config.json"))
}

/// Load the configuration from disk.
pub fn load_config() -> Config {
    get_config_path()
        .map(|path| load_config_from(&path))
        .unwrap_or_default()
}

/// Save the configuration to disk.
pub fn save_config(config: &Config) -> io::Result<()> {
    match get_config_path() {
        Some(path) => save_config_to(config, &path),
        None => Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no configuration directory available",
        )),
    }
}

/// A missing or unreadable file yields the defaults.
pub fn load_config_from(path: &std::path::Path) -> Config {
    fs::read_to_string(path)
        .ok()
        .and_then(|data| serde_json::from_str(&data).ok())
        .unwrap_or_default()
}

pub fn save_config_to(config: &Config, path: &std::path::Path) -> io::Result<()> {
    let data = serde_json::to_string_pretty(config)?;
    fs::write(path, data)
}
