//! Classpath graph resolution.
//!
//! A [`Resolver`] holds the collaborators and configuration and is shared
//! freely. Each top-level deployment gets its own [`ResolutionContext`],
//! which owns the tree and all mutable state of the traversal. Holding the
//! context by value is what keeps passes over one tree exclusive; unrelated
//! trees resolve in parallel with no shared state.

mod context;

pub use context::ResolutionContext;

use deployscope_api::{
    ContentIndexer, ExternalModuleGateway, FileSystemView, ManifestSource, MountProvider,
};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::info;

use crate::config::ResolverConfig;
use crate::error::Result;
use crate::fs::LocalFileSystem;
use crate::model::{DeploymentTree, ResolvedDeployment};

pub struct Resolver {
    config: ResolverConfig,
    manifests: Arc<dyn ManifestSource>,
    mounts: Arc<dyn MountProvider>,
    external: Arc<dyn ExternalModuleGateway>,
    indexers: Vec<Arc<dyn ContentIndexer>>,
    fs: Arc<dyn FileSystemView>,
}

impl Resolver {
    pub fn builder(
        manifests: Arc<dyn ManifestSource>,
        mounts: Arc<dyn MountProvider>,
        external: Arc<dyn ExternalModuleGateway>,
    ) -> ResolverBuilder {
        ResolverBuilder {
            config: ResolverConfig::default(),
            manifests,
            mounts,
            external,
            indexers: Vec::new(),
            fs: Arc::new(LocalFileSystem),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Starts a resolution pass over `tree`.
    pub fn context(&self, tree: DeploymentTree) -> ResolutionContext<'_> {
        ResolutionContext::new(self, tree)
    }

    /// Resolves the top-level unit and then every sub-deployment.
    pub fn resolve(&self, tree: DeploymentTree) -> Result<ResolvedDeployment> {
        self.context(tree).resolve_all()
    }

    /// Resolves unrelated deployments in parallel. Results keep input order.
    pub fn resolve_many(&self, trees: Vec<DeploymentTree>) -> Vec<Result<ResolvedDeployment>> {
        info!("Resolving {} deployments", trees.len());
        trees.into_par_iter().map(|tree| self.resolve(tree)).collect()
    }
}

pub struct ResolverBuilder {
    config: ResolverConfig,
    manifests: Arc<dyn ManifestSource>,
    mounts: Arc<dyn MountProvider>,
    external: Arc<dyn ExternalModuleGateway>,
    indexers: Vec<Arc<dyn ContentIndexer>>,
    fs: Arc<dyn FileSystemView>,
}

impl ResolverBuilder {
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Add an indexer run over every synthesized root
    pub fn add_indexer(mut self, indexer: Arc<dyn ContentIndexer>) -> Self {
        self.indexers.push(indexer);
        self
    }

    pub fn with_file_system(mut self, fs: Arc<dyn FileSystemView>) -> Self {
        self.fs = fs;
        self
    }

    pub fn build(self) -> Resolver {
        let indexers = if self.config.index_content {
            self.indexers
        } else {
            Vec::new()
        };
        Resolver {
            config: self.config,
            manifests: self.manifests,
            mounts: self.mounts,
            external: self.external,
            indexers,
            fs: self.fs,
        }
    }
}
