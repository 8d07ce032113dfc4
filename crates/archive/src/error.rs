use deployscope_api::BoxError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Deployment not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to mount {path}: {source}")]
    Mount {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
