use deployscope_api::ModuleReference;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::tree::{DeploymentTree, ModuleOrigin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No candidate location exists
    Unresolvable,
    /// The candidate lies outside the top-level deployment
    OutOfBounds,
    /// The external module gateway refused an absolute path
    ExternalRejected,
}

/// A classpath entry that was ignored. Resolution carried on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub reference: String,
    pub declaring_root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<PathBuf>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let why = match self.kind {
            DiagnosticKind::Unresolvable => "does not resolve to any location",
            DiagnosticKind::OutOfBounds => "points outside the deployment",
            DiagnosticKind::ExternalRejected => "is not a valid external location",
        };
        write!(
            f,
            "Class-Path entry {} in {} ignored: {}",
            self.reference,
            self.declaring_root.display(),
            why
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitDependencies {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub dependencies: Vec<ModuleReference>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesizedModuleSummary {
    pub identifier: ModuleReference,
    pub path: PathBuf,
    pub relative_path: String,
    pub origin: ModuleOrigin,
    pub dependencies: Vec<ModuleReference>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassPathAttachment {
    pub declaring_root: PathBuf,
    pub synthesized: Vec<PathBuf>,
}

/// What the module-loading stage consumes for one top-level deployment.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedDeployment {
    pub name: String,
    /// Top-level unit first, then sub-deployments in declaration order
    pub units: Vec<UnitDependencies>,
    /// Modules to register before loading, in creation order
    pub synthesized: Vec<SynthesizedModuleSummary>,
    pub class_path_roots: Vec<ClassPathAttachment>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolvedDeployment {
    pub fn from_tree(tree: &DeploymentTree, diagnostics: Vec<Diagnostic>) -> Self {
        let units = tree
            .units()
            .map(|(_, unit)| UnitDependencies {
                name: unit.name().to_string(),
                parent: unit.parent().map(|p| tree.unit(p).name().to_string()),
                dependencies: unit.dependencies().to_vec(),
            })
            .collect();

        let mut synthesized = Vec::new();
        for (_, module) in tree.modules() {
            synthesized.push(SynthesizedModuleSummary {
                identifier: module.reference().clone(),
                path: tree.root(module.root()).path().to_path_buf(),
                relative_path: module.relative_path().to_string(),
                origin: module.origin(),
                dependencies: module.dependencies().to_vec(),
            });
        }

        let mut class_path_roots = Vec::new();
        let mut declaring: Vec<_> = tree.units().flat_map(|(_, u)| u.roots().iter().copied()).collect();
        declaring.extend(tree.modules().map(|(_, m)| m.root()));
        declaring.sort();
        declaring.dedup();
        for id in declaring {
            let root = tree.root(id);
            if root.class_path_roots().is_empty() {
                continue;
            }
            class_path_roots.push(ClassPathAttachment {
                declaring_root: root.path().to_path_buf(),
                synthesized: root
                    .class_path_roots()
                    .iter()
                    .map(|r| tree.root(*r).path().to_path_buf())
                    .collect(),
            });
        }

        Self {
            name: tree.unit(tree.top_level()).name().to_string(),
            units,
            synthesized,
            class_path_roots,
            diagnostics,
        }
    }

    pub fn unit(&self, name: &str) -> Option<&UnitDependencies> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Only the modules created during resolution
    pub fn created_modules(&self) -> impl Iterator<Item = &SynthesizedModuleSummary> {
        self.synthesized
            .iter()
            .filter(|m| m.origin == ModuleOrigin::Synthesized)
    }
}
