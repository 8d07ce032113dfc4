use deployscope_api::BoxError;
use std::path::PathBuf;
use thiserror::Error;

/// Conditions that abort resolution of a whole deployment.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed to read manifest of {root} in deployment {unit}: {source}")]
    ManifestUnreadable {
        unit: String,
        root: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("Failed to mount {path} for deployment {unit}: {source}")]
    Mount {
        unit: String,
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("Failed to index {path} for deployment {unit}: {source}")]
    Indexing {
        unit: String,
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("Failed to register external module {reference} for deployment {unit}: {source}")]
    ExternalRegistration {
        unit: String,
        reference: String,
        #[source]
        source: BoxError,
    },
    #[error("Unknown deployment unit: {0}")]
    UnknownUnit(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
