#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write assistant record {path}: {source}")]
    WriteRecord {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode assistant record: {0}")]
    Encode(#[from] serde_yaml::Error),
    #[error("invalid creation request: {0}")]
    InvalidRequest(String),
    #[error("username taken")]
    UsernameTaken { username: String },
    #[error("failed to generate randomness: {0}")]
    Randomness(String),
    #[error("failed to spawn creation worker: {0}")]
    Spawn(String),
    #[error("creation request failed: {0}")]
    Request(String),
    #[error("{0}")]
    Rejected(String),
    #[error("creation worker disconnected before reporting a result")]
    Disconnected,
}
