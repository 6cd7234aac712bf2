use thiserror::Error;

#[derive(Error, Debug)]
pub enum AliasError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delimited source parse failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A boundary feature has no neighborhood record. Names are extracted from
    /// the same collection the writer re-reads, so this means the cache changed
    /// underneath the run.
    #[error("No neighborhood record for feature named {0:?}")]
    UnmatchedFeature(String),
}

pub type Result<T> = std::result::Result<T, AliasError>;
