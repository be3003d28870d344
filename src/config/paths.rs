use crate::config::ConfigError;
use std::path::PathBuf;

pub const STATE_DIR: &str = ".assistant-onboard";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const ASSISTANTS_DIR: &str = "assistants";

pub fn default_state_root() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os("HOME").ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home).join(STATE_DIR))
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(default_state_root()?.join(CONFIG_FILE_NAME))
}
