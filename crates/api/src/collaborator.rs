//! Collaborator contracts consumed by the classpath resolver.
//!
//! The resolver never touches archives directly. It relies on:
//! - a manifest source (attribute lookup on a mounted root)
//! - a mount provider (turning a path into a browsable root)
//! - an external module gateway (absolute-path classpath entries)
//! - content indexers (run once per synthesized root)
//! - a filesystem view (existence probes and canonical paths)

use crate::error::BoxError;
use crate::models::{BrowsableRoot, ModuleReference};
use std::path::{Path, PathBuf};

// ==================== Manifest ====================

/// Reads main-section manifest attributes of a mounted root.
pub trait ManifestSource: Send + Sync {
    /// Returns `Ok(None)` when the root has no manifest or the manifest lacks
    /// the attribute. An error means the manifest exists but cannot be read.
    fn attribute(&self, root: &BrowsableRoot, name: &str) -> Result<Option<String>, BoxError>;
}

// ==================== Mount ====================

/// Turns a filesystem location into a browsable root.
pub trait MountProvider: Send + Sync {
    /// `relative_name` is the location relative to the top-level deployment
    /// root; providers may serve a pre-registered overlay for it instead of
    /// the raw file.
    fn mount(&self, path: &Path, relative_name: &str) -> Result<BrowsableRoot, BoxError>;
}

// ==================== External modules ====================

/// Validates and registers classpath entries that use absolute paths.
pub trait ExternalModuleGateway: Send + Sync {
    fn is_valid(&self, path: &str) -> bool;

    /// Only called after `is_valid` accepted the path.
    fn register(&self, path: &str) -> Result<ModuleReference, BoxError>;
}

// ==================== Indexing ====================

/// Side-effecting content indexer, invoked once per synthesized root.
pub trait ContentIndexer: Send + Sync {
    fn name(&self) -> &str;

    fn index(&self, root: &BrowsableRoot) -> Result<(), BoxError>;
}

// ==================== Filesystem ====================

/// Read-only probes over the filesystem the deployment is mounted on.
pub trait FileSystemView: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// Resolves symlinks and relative segments.
    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf>;
}
