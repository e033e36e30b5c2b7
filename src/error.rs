use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed data URL: {0}")]
    MalformedDataUrl(String),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
