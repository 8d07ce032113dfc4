use deployscope_api::FileSystemView;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::fs::canonical_or_raw;
use crate::model::{DeploymentTree, UnitId};

/// Content roots of a tree classified for one resolution pass.
#[derive(Debug, Default, Clone)]
pub struct RootCatalog {
    /// Visible without a dependency edge (libraries, container-provided roots)
    pub accessible: HashSet<PathBuf>,
    /// Roots that start a nested deployable unit
    pub sub_deployments: HashMap<PathBuf, UnitId>,
}

impl RootCatalog {
    /// Classifies the top-level unit's roots. When `resolving` is a nested
    /// unit, its own module roots are folded into the accessible set.
    pub fn build(tree: &DeploymentTree, resolving: UnitId, fs: &dyn FileSystemView) -> Self {
        let mut catalog = Self::default();
        let top = tree.top_level();

        for root_id in tree.unit(top).roots() {
            let root = tree.root(*root_id);
            let path = canonical_or_raw(fs, root.path());
            if let Some(unit) = root.sub_deployment() {
                catalog.sub_deployments.insert(path, unit);
            } else if root.is_module_root() {
                catalog.accessible.insert(path);
            }
        }

        if resolving != top {
            for root_id in tree.unit(resolving).roots() {
                let root = tree.root(*root_id);
                if root.is_module_root() {
                    catalog.accessible.insert(canonical_or_raw(fs, root.path()));
                }
            }
        }

        catalog
    }

    pub fn is_accessible(&self, path: &Path) -> bool {
        self.accessible.contains(path)
    }

    pub fn sub_deployment(&self, path: &Path) -> Option<UnitId> {
        self.sub_deployments.get(path).copied()
    }
}
