/// Error type for collaborator operations
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not an archive: {0}")]
    NotAnArchive(String),
    #[error("Malformed manifest in {path}: {reason}")]
    MalformedManifest { path: String, reason: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
