use super::{default_config_path, ConfigError, Settings};

/// Loads `~/.assistant-onboard/config.yaml`, falling back to built-in
/// defaults when the file does not exist.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let path = default_config_path()?;
    let settings = if path.exists() {
        Settings::from_path(&path)?
    } else {
        Settings::default()
    };
    settings.validate()?;
    Ok(settings)
}
