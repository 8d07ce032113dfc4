pub mod outcome;
pub mod tree;

pub use outcome::{
    ClassPathAttachment, Diagnostic, DiagnosticKind, ResolvedDeployment, SynthesizedModuleSummary,
    UnitDependencies,
};
pub use tree::{
    ArchiveUnit, ContentRoot, DependencyTarget, DeploymentTree, ModuleId, ModuleOrigin, RootId,
    SynthesizedModule, UnitId,
};
