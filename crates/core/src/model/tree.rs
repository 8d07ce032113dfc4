//! Arena holding one top-level deployment and everything nested in it.
//!
//! Units, content roots and modules are addressed by index. The arena is
//! owned by exactly one resolution context at a time, so mutation needs no
//! locking.

use deployscope_api::{BrowsableRoot, ModuleReference};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub(crate) usize);

/// Who receives the dependency edges discovered in a root's manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTarget {
    Unit(UnitId),
    Module(ModuleId),
}

#[derive(Debug, Clone)]
pub struct ContentRoot {
    pub(crate) mount: BrowsableRoot,
    pub(crate) module_root: bool,
    pub(crate) boundary_of: Option<UnitId>,
    pub(crate) owner: DependencyTarget,
    pub(crate) class_path_roots: Vec<RootId>,
}

impl ContentRoot {
    pub fn path(&self) -> &Path {
        self.mount.path()
    }

    pub fn mount(&self) -> &BrowsableRoot {
        &self.mount
    }

    pub fn is_module_root(&self) -> bool {
        self.module_root
    }

    /// Set when this root starts a nested deployable unit
    pub fn sub_deployment(&self) -> Option<UnitId> {
        self.boundary_of
    }

    pub fn owner(&self) -> DependencyTarget {
        self.owner
    }

    /// Roots synthesized because of this root's classpath references
    pub fn class_path_roots(&self) -> &[RootId] {
        &self.class_path_roots
    }
}

#[derive(Debug, Clone)]
pub struct ArchiveUnit {
    pub(crate) name: String,
    pub(crate) parent: Option<UnitId>,
    pub(crate) roots: Vec<RootId>,
    pub(crate) dependencies: Vec<ModuleReference>,
}

impl ArchiveUnit {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<UnitId> {
        self.parent
    }

    /// The unit's own root; always the first entry of `roots`
    pub fn deployment_root(&self) -> RootId {
        self.roots[0]
    }

    pub fn roots(&self) -> &[RootId] {
        &self.roots
    }

    pub fn dependencies(&self) -> &[ModuleReference] {
        &self.dependencies
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleOrigin {
    /// Registered before classpath resolution ran
    Registered,
    /// Created on demand for a classpath reference
    Synthesized,
}

#[derive(Debug, Clone)]
pub struct SynthesizedModule {
    pub(crate) reference: ModuleReference,
    pub(crate) root: RootId,
    pub(crate) relative_path: String,
    pub(crate) origin: ModuleOrigin,
    pub(crate) dependencies: Vec<ModuleReference>,
}

impl SynthesizedModule {
    pub fn reference(&self) -> &ModuleReference {
        &self.reference
    }

    pub fn root(&self) -> RootId {
        self.root
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn origin(&self) -> ModuleOrigin {
        self.origin
    }

    pub fn dependencies(&self) -> &[ModuleReference] {
        &self.dependencies
    }
}

#[derive(Debug, Clone)]
pub struct DeploymentTree {
    units: Vec<ArchiveUnit>,
    roots: Vec<ContentRoot>,
    modules: Vec<SynthesizedModule>,
}

impl DeploymentTree {
    /// Creates a tree holding only the top-level unit.
    pub fn new(name: impl Into<String>, deployment_root: BrowsableRoot, module_root: bool) -> Self {
        let top = UnitId(0);
        let mut tree = Self {
            units: vec![ArchiveUnit {
                name: name.into(),
                parent: None,
                roots: Vec::new(),
                dependencies: Vec::new(),
            }],
            roots: Vec::new(),
            modules: Vec::new(),
        };
        tree.add_resource_root(top, deployment_root, module_root);
        tree
    }

    pub fn top_level(&self) -> UnitId {
        UnitId(0)
    }

    /// Containment limit for internal classpath references
    pub fn boundary(&self) -> &Path {
        self.root(self.unit(self.top_level()).deployment_root())
            .path()
    }

    pub fn add_resource_root(
        &mut self,
        unit: UnitId,
        mount: BrowsableRoot,
        module_root: bool,
    ) -> RootId {
        let id = self.push_root(ContentRoot {
            mount,
            module_root,
            boundary_of: None,
            owner: DependencyTarget::Unit(unit),
            class_path_roots: Vec::new(),
        });
        self.units[unit.0].roots.push(id);
        id
    }

    /// Adds a nested deployable unit below the top-level unit. Its
    /// deployment root also becomes a resource root of the top-level unit.
    pub fn add_sub_deployment(
        &mut self,
        name: impl Into<String>,
        deployment_root: BrowsableRoot,
        module_root: bool,
    ) -> UnitId {
        let top = self.top_level();
        let unit = UnitId(self.units.len());
        self.units.push(ArchiveUnit {
            name: name.into(),
            parent: Some(top),
            roots: Vec::new(),
            dependencies: Vec::new(),
        });
        let root = self.push_root(ContentRoot {
            mount: deployment_root,
            module_root,
            boundary_of: Some(unit),
            owner: DependencyTarget::Unit(unit),
            class_path_roots: Vec::new(),
        });
        self.units[unit.0].roots.push(root);
        self.units[top.0].roots.push(root);
        unit
    }

    /// Registers a module created by an earlier deployment stage.
    pub fn add_additional_module(
        &mut self,
        reference: impl Into<ModuleReference>,
        mount: BrowsableRoot,
    ) -> ModuleId {
        let relative_path = mount
            .path()
            .strip_prefix(self.boundary())
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|_| mount.name());
        self.push_module(mount, reference.into(), relative_path, ModuleOrigin::Registered)
    }

    pub fn unit(&self, id: UnitId) -> &ArchiveUnit {
        &self.units[id.0]
    }

    pub fn units(&self) -> impl Iterator<Item = (UnitId, &ArchiveUnit)> {
        self.units.iter().enumerate().map(|(i, u)| (UnitId(i), u))
    }

    pub fn find_unit(&self, name: &str) -> Option<UnitId> {
        self.units().find(|(_, u)| u.name == name).map(|(id, _)| id)
    }

    pub fn root(&self, id: RootId) -> &ContentRoot {
        &self.roots[id.0]
    }

    pub fn module(&self, id: ModuleId) -> &SynthesizedModule {
        &self.modules[id.0]
    }

    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &SynthesizedModule)> {
        self.modules.iter().enumerate().map(|(i, m)| (ModuleId(i), m))
    }

    pub fn dependencies_of(&self, target: DependencyTarget) -> &[ModuleReference] {
        match target {
            DependencyTarget::Unit(id) => self.unit(id).dependencies(),
            DependencyTarget::Module(id) => self.module(id).dependencies(),
        }
    }

    pub(crate) fn append_dependency(&mut self, target: DependencyTarget, reference: ModuleReference) {
        match target {
            DependencyTarget::Unit(id) => self.units[id.0].dependencies.push(reference),
            DependencyTarget::Module(id) => self.modules[id.0].dependencies.push(reference),
        }
    }

    pub(crate) fn attach_class_path_root(&mut self, declaring: RootId, synthesized: RootId) {
        self.roots[declaring.0].class_path_roots.push(synthesized);
    }

    pub(crate) fn push_module(
        &mut self,
        mount: BrowsableRoot,
        reference: ModuleReference,
        relative_path: String,
        origin: ModuleOrigin,
    ) -> ModuleId {
        let id = ModuleId(self.modules.len());
        let root = self.push_root(ContentRoot {
            mount,
            module_root: true,
            boundary_of: None,
            owner: DependencyTarget::Module(id),
            class_path_roots: Vec::new(),
        });
        self.modules.push(SynthesizedModule {
            reference,
            root,
            relative_path,
            origin,
            dependencies: Vec::new(),
        });
        id
    }

    fn push_root(&mut self, root: ContentRoot) -> RootId {
        let id = RootId(self.roots.len());
        self.roots.push(root);
        id
    }
}
