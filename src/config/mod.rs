pub mod error;
pub mod load;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use load::load_settings;
pub use paths::{
    default_config_path, default_state_root, ASSISTANTS_DIR, CONFIG_FILE_NAME, STATE_DIR,
};
pub use settings::{ServiceConfig, ServiceKind, Settings};
