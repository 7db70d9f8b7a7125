use anyhow::{Context, Result};
use directories::BaseDirs;
use std::path::PathBuf;

/// All computed paths used by claude-switch
#[derive(Debug, Clone)]
pub struct Paths {
    /// ~/.claude
    pub config_dir: PathBuf,
    /// ~/.claude/settings.json
    pub settings_file: PathBuf,
    /// ~/.claude/settings.json.backup
    pub backup_file: PathBuf,
    /// ~/.claude/.zai_token
    pub token_file: PathBuf,
}

impl Paths {
    /// Resolve paths under `config_dir`, or `~/.claude` when not given
    pub fn new(config_dir: Option<PathBuf>) -> Result<Self> {
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => {
                let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;
                base_dirs.home_dir().join(".claude")
            }
        };
        Ok(Self::from_config_dir(config_dir))
    }

    pub fn from_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        let settings_file = config_dir.join("settings.json");
        let backup_file = config_dir.join("settings.json.backup");
        let token_file = config_dir.join(".zai_token");

        Self {
            config_dir,
            settings_file,
            backup_file,
            token_file,
        }
    }
}
