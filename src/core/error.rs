use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// A collaborator handed the search inconsistent data. Distinct from
    /// "nothing matched", which is an empty result.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
