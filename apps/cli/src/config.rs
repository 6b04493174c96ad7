//! Configuration loading
//!
//! An optional TOML file at `<config dir>/rechner/config.toml` (or an
//! explicit `--config` path) adjusts the session defaults. Missing file or
//! missing keys fall back field-wise to the defaults; a file that exists but
//! does not parse is a startup error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::debug;

use rechner_engine::AngleMode;

const DEFAULT_HISTORY_SIZE: usize = 1000;
const DEFAULT_PROMPT: &str = "> ";

/// On-disk shape of the configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct FileConfig {
    /// "radians" or "degrees"
    angle_mode: Option<String>,
    history_size: Option<usize>,
    prompt: Option<String>,
}

/// Resolved session configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub angle_mode: AngleMode,
    pub history_size: usize,
    pub prompt: String,
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            angle_mode: AngleMode::Radians,
            history_size: DEFAULT_HISTORY_SIZE,
            prompt: DEFAULT_PROMPT.to_string(),
            history_file: state_dir().map(|dir| dir.join("history")),
        }
    }
}

fn state_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rechner"))
}

impl Config {
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = Config::default();

        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => state_dir()
                .map(|dir| dir.join("config.toml"))
                .filter(|path| path.exists()),
        };

        let Some(path) = path else {
            return Ok(config);
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let file: FileConfig = toml::from_str(&text)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        debug!(path = %path.display(), "configuration file loaded");

        if let Some(mode) = file.angle_mode {
            config.angle_mode = match mode.as_str() {
                "radians" => AngleMode::Radians,
                "degrees" => AngleMode::Degrees,
                other => bail!(
                    "unknown angle-mode '{}' in {}, expected 'radians' or 'degrees'",
                    other,
                    path.display()
                ),
            };
        }
        if let Some(size) = file.history_size {
            config.history_size = size;
        }
        if let Some(prompt) = file.prompt {
            config.prompt = prompt;
        }

        Ok(config)
    }
}
