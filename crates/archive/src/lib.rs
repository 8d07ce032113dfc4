//! Filesystem implementations of the resolver's collaborators.

pub mod error;
pub mod external;
pub mod index;
pub mod manifest;
pub mod mount;
pub mod structure;

pub use error::ScanError;
pub use external::FsExternalModules;
pub use index::PackageIndexer;
pub use manifest::JarManifestSource;
pub use mount::FsMountProvider;
pub use structure::DeploymentScanner;
