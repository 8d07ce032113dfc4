//! Classpath reference resolution against the filesystem view.
//!
//! Relative references are tried against an ordered list of bases: the
//! parent of the declaring root first, then the parent of the enclosing
//! deployment's root. The first base producing an existing location wins.

use deployscope_api::FileSystemView;
use std::path::{Path, PathBuf};

use crate::fs::{canonical_or_raw, normalize_lexically};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Absolute-path reference, handed to the external module gateway
    External(String),
    /// Existing location inside the top-level deployment (canonical)
    Internal(PathBuf),
    /// No base yields an existing location
    Unresolvable,
    /// The first existing location escapes the top-level deployment
    OutOfBounds(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolutionBase {
    DeclaringRoot,
    DeploymentRoot,
}

const RESOLUTION_ORDER: [ResolutionBase; 2] =
    [ResolutionBase::DeclaringRoot, ResolutionBase::DeploymentRoot];

pub struct PathResolver<'a> {
    fs: &'a dyn FileSystemView,
}

impl<'a> PathResolver<'a> {
    pub fn new(fs: &'a dyn FileSystemView) -> Self {
        Self { fs }
    }

    /// `boundary` must already be canonical.
    pub fn resolve(
        &self,
        reference: &str,
        declaring_root: &Path,
        deployment_root: &Path,
        boundary: &Path,
    ) -> Classification {
        if reference.starts_with('/') {
            return Classification::External(reference.to_string());
        }

        for base in RESOLUTION_ORDER {
            let anchor = match base {
                ResolutionBase::DeclaringRoot => declaring_root,
                ResolutionBase::DeploymentRoot => deployment_root,
            };
            let Some(parent) = anchor.parent() else {
                continue;
            };
            let candidate = normalize_lexically(&parent.join(reference));
            if !self.fs.exists(&candidate) {
                continue;
            }

            let canonical = canonical_or_raw(self.fs, &candidate);
            return if is_strictly_inside(&canonical, boundary) {
                Classification::Internal(canonical)
            } else {
                Classification::OutOfBounds(canonical)
            };
        }

        Classification::Unresolvable
    }
}

/// True when `boundary` is a proper ancestor of `path`.
fn is_strictly_inside(path: &Path, boundary: &Path) -> bool {
    path.ancestors().skip(1).any(|ancestor| ancestor == boundary)
}
