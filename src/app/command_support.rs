use crate::config::{default_state_root, load_settings, ConfigError, Settings, ASSISTANTS_DIR};
use std::fs;
use std::path::PathBuf;

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

/// Resolves `~/.assistant-onboard` and creates the directories commands write into.
pub fn ensure_state_root() -> Result<PathBuf, String> {
    let root = default_state_root().map_err(map_config_err)?;
    for dir in [root.clone(), root.join(ASSISTANTS_DIR), root.join("logs")] {
        fs::create_dir_all(&dir)
            .map_err(|e| format!("failed to create {}: {e}", dir.display()))?;
    }
    Ok(root)
}

pub fn load_cli_settings() -> Result<Settings, String> {
    load_settings().map_err(map_config_err)
}
