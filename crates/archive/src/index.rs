use dashmap::DashMap;
use deployscope_api::{BoxError, BrowsableRoot, ContentIndexer, MountKind};
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipArchive;

/// Records the Java packages each indexed root provides.
#[derive(Debug, Default)]
pub struct PackageIndexer {
    packages: DashMap<PathBuf, Vec<String>>,
}

impl PackageIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn packages(&self, root: &Path) -> Option<Vec<String>> {
        self.packages.get(root).map(|p| p.value().clone())
    }

    pub fn indexed_roots(&self) -> usize {
        self.packages.len()
    }

    fn archive_packages(path: &Path) -> Result<BTreeSet<String>, BoxError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)?;
        let mut packages = BTreeSet::new();

        for i in 0..archive.len() {
            let entry = archive.by_index(i)?;
            if let Some(package) = package_of(entry.name()) {
                packages.insert(package);
            }
        }
        Ok(packages)
    }

    fn directory_packages(path: &Path) -> Result<BTreeSet<String>, BoxError> {
        let mut packages = BTreeSet::new();
        for entry in WalkDir::new(path) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(path) else {
                continue;
            };
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join("/");
            if let Some(package) = package_of(&name) {
                packages.insert(package);
            }
        }
        Ok(packages)
    }
}

/// Package of a top-level class entry such as `com/example/Test.class`.
fn package_of(entry: &str) -> Option<String> {
    if !entry.ends_with(".class") || entry.contains('$') {
        return None;
    }
    let slash = entry.rfind('/')?;
    let package = entry[..slash].replace('/', ".");
    if package.starts_with("META-INF") || package.starts_with("WEB-INF") {
        return None;
    }
    Some(package)
}

impl ContentIndexer for PackageIndexer {
    fn name(&self) -> &str {
        "packages"
    }

    fn index(&self, root: &BrowsableRoot) -> Result<(), BoxError> {
        let packages = match root.kind {
            MountKind::Archive => Self::archive_packages(&root.content)?,
            MountKind::Directory => Self::directory_packages(&root.content)?,
        };
        self.packages
            .insert(root.path.clone(), packages.into_iter().collect());
        Ok(())
    }
}
