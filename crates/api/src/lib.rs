pub mod collaborator;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use collaborator::{
    ContentIndexer, ExternalModuleGateway, FileSystemView, ManifestSource, MountProvider,
};
pub use error::{ApiError, BoxError};
pub use models::{BrowsableRoot, ModuleReference, MountKind};
