//! Parses config file
use std::{
    env,
    fs::OpenOptions,
    io::Read,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Where extracted folders go. Defaults to next to the input file.
    pub output_dir: Option<String>,
    pub export_sheets: bool,
    pub export_sprites: bool,
    pub write_metadata: bool,
    /// Force decoded sheets to full alpha.
    pub opaque: bool,
    /// Reject files without RIFF/LIST framing tags.
    pub strict_header: bool,
    /// Decode and encode images on multiple threads.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: None,
            export_sheets: true,
            export_sprites: true,
            write_metadata: true,
            opaque: false,
            strict_header: false,
            parallel: true,
        }
    }
}

pub static CONFIG_FILE_NAME: &str = "mklk-rip.toml";

/// Parse `mklk-rip.toml` in the same folder as the binary, or use defaults when there is none.
pub fn parse_config() -> eyre::Result<Config> {
    let path = match env::current_exe() {
        Ok(path) => path
            .parent()
            .map(|parent| parent.join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
        Err(_) => PathBuf::from(CONFIG_FILE_NAME),
    };

    if !path.exists() {
        debug!("No config at `{}`, using defaults", path.display());
        return Ok(Config::default());
    }

    parse_config_from_file(path.as_path())
}

pub fn parse_config_from_file(path: &Path) -> eyre::Result<Config> {
    let mut file = OpenOptions::new().read(true).open(path.as_os_str())?;
    let mut buffer = String::new();

    file.read_to_string(&mut buffer)?;

    let config = parse_config_from_str(&buffer)?;

    debug!("Loaded config from `{}`: {config:?}", path.display());

    Ok(config)
}

pub fn parse_config_from_str(s: &str) -> eyre::Result<Config> {
    let config: Config = toml::from_str(s)?;

    Ok(config)
}
