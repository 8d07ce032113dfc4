use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::Resolver;
use crate::catalog::RootCatalog;
use crate::error::{ResolveError, Result};
use crate::fs::{canonical_or_raw, relative_name};
use crate::manifest::ManifestReferenceReader;
use crate::model::{
    DependencyTarget, DeploymentTree, Diagnostic, DiagnosticKind, ResolvedDeployment, RootId,
    UnitId,
};
use crate::path::{Classification, PathResolver};
use crate::synth::{ModuleSynthesizer, SynthesizedModuleRegistry, module_identifier};

/// Mutable state of the classpath traversal for one top-level deployment.
pub struct ResolutionContext<'r> {
    resolver: &'r Resolver,
    tree: DeploymentTree,
    registry: SynthesizedModuleRegistry,
    boundary: PathBuf,
    worklist: VecDeque<(DependencyTarget, RootId)>,
    diagnostics: Vec<Diagnostic>,
}

/// Per-pass inputs that stay fixed while the worklist drains
struct Pass {
    unit: UnitId,
    deployment_root: RootId,
    deployment_root_path: PathBuf,
    catalog: RootCatalog,
}

impl<'r> ResolutionContext<'r> {
    pub(super) fn new(resolver: &'r Resolver, tree: DeploymentTree) -> Self {
        let fs = resolver.fs.as_ref();
        let boundary = canonical_or_raw(fs, tree.boundary());
        let registry = SynthesizedModuleRegistry::seeded(&tree, fs);
        Self {
            resolver,
            tree,
            registry,
            boundary,
            worklist: VecDeque::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn tree(&self) -> &DeploymentTree {
        &self.tree
    }

    pub fn registry(&self) -> &SynthesizedModuleRegistry {
        &self.registry
    }

    /// Top-level unit first, then each sub-deployment in declaration order.
    pub fn resolve_all(mut self) -> Result<ResolvedDeployment> {
        let units: Vec<UnitId> = self.tree.units().map(|(id, _)| id).collect();
        for unit in units {
            self.run_pass(unit)?;
        }
        Ok(self.finish())
    }

    pub fn resolve_unit_named(self, name: &str) -> Result<Self> {
        let unit = self
            .tree
            .find_unit(name)
            .ok_or_else(|| ResolveError::UnknownUnit(name.to_string()))?;
        self.resolve_unit(unit)
    }

    /// Runs one pass for `unit`: every classpath reference reachable from
    /// its roots becomes a dependency edge, a diagnostic or a new module.
    ///
    /// A fatal error drops the context together with whatever the failed
    /// pass already recorded.
    pub fn resolve_unit(mut self, unit: UnitId) -> Result<Self> {
        self.run_pass(unit)?;
        Ok(self)
    }

    fn run_pass(&mut self, unit: UnitId) -> Result<()> {
        let resolver = self.resolver;
        let fs = resolver.fs.as_ref();
        let deployment_root = self.tree.unit(unit).deployment_root();
        let pass = Pass {
            unit,
            deployment_root,
            deployment_root_path: self.tree.root(deployment_root).path().to_path_buf(),
            catalog: RootCatalog::build(&self.tree, unit, fs),
        };

        let modules_before = self.registry.len();
        let target = DependencyTarget::Unit(unit);
        self.worklist.clear();
        self.worklist
            .extend(self.tree.unit(unit).roots().iter().map(|root| (target, *root)));

        while let Some((target, root)) = self.worklist.pop_front() {
            // Sibling sub-deployments are resolved in their own pass
            if self.tree.root(root).sub_deployment().is_some() && root != pass.deployment_root {
                continue;
            }
            self.process_root(&pass, target, root)?;
        }

        info!(
            "Resolved class path of {}: {} dependencies, {} new modules",
            self.tree.unit(unit).name(),
            self.tree.unit(unit).dependencies().len(),
            self.registry.len() - modules_before
        );
        Ok(())
    }

    pub fn finish(self) -> ResolvedDeployment {
        ResolvedDeployment::from_tree(&self.tree, self.diagnostics)
    }

    fn process_root(&mut self, pass: &Pass, target: DependencyTarget, root: RootId) -> Result<()> {
        let resolver = self.resolver;
        let reader = ManifestReferenceReader::new(
            resolver.manifests.as_ref(),
            &resolver.config().class_path_attribute,
        );
        let declaring_path = self.tree.root(root).path().to_path_buf();

        let references = reader
            .read_references(self.tree.root(root).mount())
            .map_err(|source| ResolveError::ManifestUnreadable {
                unit: self.tree.unit(pass.unit).name().to_string(),
                root: declaring_path.clone(),
                source,
            })?;

        let path_resolver = PathResolver::new(resolver.fs.as_ref());
        for reference in references {
            let classification = path_resolver.resolve(
                &reference,
                &declaring_path,
                &pass.deployment_root_path,
                &self.boundary,
            );
            match classification {
                Classification::External(path) => {
                    self.link_external(pass, target, &path, &declaring_path)?
                }
                Classification::Unresolvable => {
                    self.ignore(DiagnosticKind::Unresolvable, &reference, &declaring_path, None)
                }
                Classification::OutOfBounds(candidate) => self.ignore(
                    DiagnosticKind::OutOfBounds,
                    &reference,
                    &declaring_path,
                    Some(candidate),
                ),
                Classification::Internal(candidate) => {
                    self.link_internal(pass, target, root, &candidate)?
                }
            }
        }
        Ok(())
    }

    fn link_external(
        &mut self,
        pass: &Pass,
        target: DependencyTarget,
        path: &str,
        declaring: &Path,
    ) -> Result<()> {
        let resolver = self.resolver;
        let gateway = resolver.external.as_ref();
        if !gateway.is_valid(path) {
            self.ignore(DiagnosticKind::ExternalRejected, path, declaring, None);
            return Ok(());
        }

        let reference =
            gateway
                .register(path)
                .map_err(|source| ResolveError::ExternalRegistration {
                    unit: self.tree.unit(pass.unit).name().to_string(),
                    reference: path.to_string(),
                    source,
                })?;
        debug!(
            "Resource {} added as external module {} for {}",
            path,
            reference,
            declaring.display()
        );
        self.tree.append_dependency(target, reference);
        Ok(())
    }

    fn link_internal(
        &mut self,
        pass: &Pass,
        target: DependencyTarget,
        declaring: RootId,
        candidate: &Path,
    ) -> Result<()> {
        let resolver = self.resolver;
        if pass.catalog.is_accessible(candidate) {
            debug!(
                "Class-Path entry {} in {} ignored, target is already accessible",
                candidate.display(),
                self.tree.root(declaring).path().display()
            );
            return Ok(());
        }

        if let Some(sub) = pass.catalog.sub_deployment(candidate) {
            // The sibling may not be resolved yet; its identifier only
            // depends on where its root sits in the deployment.
            let sub_root = self.tree.root(self.tree.unit(sub).deployment_root()).path();
            let sub_root = canonical_or_raw(resolver.fs.as_ref(), sub_root);
            let relative = relative_name(&sub_root, &self.boundary)
                .unwrap_or_else(|| self.tree.unit(sub).name().to_string());
            let reference = module_identifier(
                &resolver.config().module_prefix,
                self.tree.unit(self.tree.top_level()).name(),
                &relative,
            );
            self.tree.append_dependency(target, reference);
            return Ok(());
        }

        if let Some(module) = self.registry.get(candidate) {
            let reference = self.tree.module(module).reference().clone();
            debug!("Class-Path entry {} reuses module {}", candidate.display(), reference);
            self.tree.append_dependency(target, reference);
            return Ok(());
        }

        let synthesizer = ModuleSynthesizer::new(
            resolver.mounts.as_ref(),
            &resolver.indexers,
            &resolver.config().module_prefix,
        );
        let module =
            synthesizer.synthesize(&mut self.tree, &mut self.registry, candidate, &self.boundary)?;
        let module_root = self.tree.module(module).root();
        let reference = self.tree.module(module).reference().clone();

        self.tree.attach_class_path_root(declaring, module_root);
        self.tree.append_dependency(target, reference);
        // Transitive classpath entries of the new module
        self.worklist
            .push_back((DependencyTarget::Module(module), module_root));
        Ok(())
    }

    fn ignore(
        &mut self,
        kind: DiagnosticKind,
        reference: &str,
        declaring: &Path,
        candidate: Option<PathBuf>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            reference: reference.to_string(),
            declaring_root: declaring.to_path_buf(),
            candidate,
        };
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}
