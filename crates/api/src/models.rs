use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque handle naming a module a unit depends on.
///
/// It may identify a pre-existing module, a sibling sub-deployment's
/// eventual module, a synthesized module or an external module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleReference(String);

impl ModuleReference {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleReference {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ModuleReference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// How the content behind a mounted root is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MountKind {
    /// Exploded directory, browsed in place
    Directory,
    /// Compressed archive (jar, war, ...)
    Archive,
}

/// A mounted, browsable view of an archive's classes and resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrowsableRoot {
    /// Location the root is known by inside the deployment
    pub path: PathBuf,
    /// Location the content is actually read from (differs when an overlay is mounted)
    pub content: PathBuf,
    pub kind: MountKind,
}

impl BrowsableRoot {
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            content: path.clone(),
            path,
            kind: MountKind::Directory,
        }
    }

    pub fn archive(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            content: path.clone(),
            path,
            kind: MountKind::Archive,
        }
    }

    /// Same root, content served from `content` instead
    pub fn with_content(mut self, content: impl Into<PathBuf>) -> Self {
        self.content = content.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last path segment, used as the root's display name
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}
