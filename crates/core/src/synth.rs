//! On-demand modules for content roots that no unit exposes yet.

use deployscope_api::{ContentIndexer, FileSystemView, ModuleReference, MountProvider};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{ResolveError, Result};
use crate::fs::{canonical_or_raw, relative_name};
use crate::model::{DeploymentTree, ModuleId, ModuleOrigin};

/// Builds `<prefix><deployment>.<relative path>` and escapes the characters
/// the module name grammar reserves.
pub fn module_identifier(prefix: &str, deployment: &str, relative_path: &str) -> ModuleReference {
    let raw = format!("{prefix}{deployment}.{relative_path}");
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '\\' || c == ':' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    ModuleReference::new(escaped)
}

/// Canonical root path -> module, for one top-level deployment.
#[derive(Debug, Default)]
pub struct SynthesizedModuleRegistry {
    by_path: IndexMap<PathBuf, ModuleId>,
}

impl SynthesizedModuleRegistry {
    /// Starts from the modules already present in the tree.
    pub fn seeded(tree: &DeploymentTree, fs: &dyn FileSystemView) -> Self {
        let mut registry = Self::default();
        for (id, module) in tree.modules() {
            let path = canonical_or_raw(fs, tree.root(module.root()).path());
            registry.by_path.entry(path).or_insert(id);
        }
        registry
    }

    pub fn get(&self, path: &Path) -> Option<ModuleId> {
        self.by_path.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

pub struct ModuleSynthesizer<'a> {
    mounts: &'a dyn MountProvider,
    indexers: &'a [Arc<dyn ContentIndexer>],
    prefix: &'a str,
}

impl<'a> ModuleSynthesizer<'a> {
    pub fn new(
        mounts: &'a dyn MountProvider,
        indexers: &'a [Arc<dyn ContentIndexer>],
        prefix: &'a str,
    ) -> Self {
        Self {
            mounts,
            indexers,
            prefix,
        }
    }

    /// Mounts `candidate`, indexes it and registers a module for it.
    ///
    /// Callers consult `registry` first; a path already registered must not
    /// reach this function.
    pub fn synthesize(
        &self,
        tree: &mut DeploymentTree,
        registry: &mut SynthesizedModuleRegistry,
        candidate: &Path,
        boundary: &Path,
    ) -> Result<ModuleId> {
        debug_assert!(registry.get(candidate).is_none());

        let deployment = tree.unit(tree.top_level()).name().to_string();
        let relative_path = relative_name(candidate, boundary).unwrap_or_else(|| {
            candidate
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        });

        let mount = self
            .mounts
            .mount(candidate, &relative_path)
            .map_err(|source| ResolveError::Mount {
                unit: deployment.clone(),
                path: candidate.to_path_buf(),
                source,
            })?;

        for indexer in self.indexers {
            debug!("Indexing {} with {}", candidate.display(), indexer.name());
            indexer
                .index(&mount)
                .map_err(|source| ResolveError::Indexing {
                    unit: deployment.clone(),
                    path: candidate.to_path_buf(),
                    source,
                })?;
        }

        let reference = module_identifier(self.prefix, &deployment, &relative_path);
        info!("Created module {} for {}", reference, candidate.display());

        let id = tree.push_module(mount, reference, relative_path, ModuleOrigin::Synthesized);
        registry.by_path.insert(candidate.to_path_buf(), id);
        Ok(id)
    }
}
