use deployscope_archive::{
    DeploymentScanner, FsExternalModules, FsMountProvider, JarManifestSource, PackageIndexer,
    ScanError,
};
use deployscope_core::{ResolveError, ResolvedDeployment, Resolver, ResolverConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Resolver wired to the filesystem collaborators, plus the scanner that
/// turns deployment paths into trees.
pub struct Runtime {
    resolver: Resolver,
    scanner: DeploymentScanner,
    indexer: Arc<PackageIndexer>,
    external: Arc<FsExternalModules>,
}

impl Runtime {
    pub fn indexer(&self) -> &PackageIndexer {
        &self.indexer
    }

    pub fn external_modules(&self) -> &FsExternalModules {
        &self.external
    }

    pub fn resolve_path(&self, path: &Path) -> Result<ResolvedDeployment, RuntimeError> {
        let tree = self.scanner.scan(path)?;
        Ok(self.resolver.resolve(tree)?)
    }

    /// Scans every path and resolves the resulting trees in parallel.
    /// One result per input path, in input order.
    pub fn resolve_paths(
        &self,
        paths: &[PathBuf],
    ) -> Vec<Result<ResolvedDeployment, RuntimeError>> {
        let mut trees = Vec::new();
        let mut slots = Vec::with_capacity(paths.len());
        for path in paths {
            match self.scanner.scan(path) {
                Ok(tree) => {
                    trees.push(tree);
                    slots.push(None);
                }
                Err(e) => {
                    error!("Failed to scan {}: {}", path.display(), e);
                    slots.push(Some(Err(e.into())));
                }
            }
        }

        let mut resolved = self.resolver.resolve_many(trees).into_iter();
        slots
            .into_iter()
            .filter_map(|slot| {
                slot.or_else(|| resolved.next().map(|r| r.map_err(RuntimeError::from)))
            })
            .collect()
    }
}

/// Bootstraps the default runtime: jar manifests, filesystem mounts with
/// the configured overlays, the external module registry and package
/// indexing.
pub fn build_default_runtime(config: ResolverConfig) -> Runtime {
    let mounts = Arc::new(FsMountProvider::with_overlays(config.overlays.clone()));
    let external = Arc::new(FsExternalModules::new(&config.external));
    let indexer = Arc::new(PackageIndexer::new());
    let scanner = DeploymentScanner::new(mounts.clone(), config.structure.clone());

    let resolver = Resolver::builder(Arc::new(JarManifestSource), mounts, external.clone())
        .add_indexer(indexer.clone())
        .with_config(config)
        .build();

    Runtime {
        resolver,
        scanner,
        indexer,
        external,
    }
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> impl Drop {
    deployscope_core::logging::init_logging(component, to_stderr)
}
