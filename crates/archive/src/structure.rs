//! Builds a [`DeploymentTree`] from a deployment on disk.
//!
//! Layout of an exploded top-level deployment:
//! - `<library_directory>/*.jar` are library roots, visible to every unit
//! - top-level entries with a sub-deployment extension are nested units
//! - a nested unit with a `WEB-INF` directory contributes `WEB-INF/classes`
//!   and `WEB-INF/lib/*.jar`; its own root is not a module root
//!
//! A top-level archive file is a single unit with one module root.

use deployscope_api::{BrowsableRoot, MountProvider};
use deployscope_core::config::StructureConfig;
use deployscope_core::fs::relative_name;
use deployscope_core::model::{DeploymentTree, UnitId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, ScanError};

pub struct DeploymentScanner {
    mounts: Arc<dyn MountProvider>,
    config: StructureConfig,
}

impl DeploymentScanner {
    pub fn new(mounts: Arc<dyn MountProvider>, config: StructureConfig) -> Self {
        Self { mounts, config }
    }

    pub fn scan(&self, path: &Path) -> Result<DeploymentTree> {
        let root = path
            .canonicalize()
            .map_err(|_| ScanError::NotFound(path.to_path_buf()))?;
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());

        if root.is_file() {
            let mount = self.mount(&root, &root)?;
            return Ok(DeploymentTree::new(name, mount, true));
        }

        let mut tree = DeploymentTree::new(name, self.mount(&root, &root)?, false);
        let top = tree.top_level();

        let lib = root.join(&self.config.library_directory);
        for jar in self.jars_in(&lib)? {
            let mount = self.mount(&jar, &root)?;
            tree.add_resource_root(top, mount, true);
        }

        for entry in sorted_children(&root)? {
            if entry == lib || !self.is_sub_deployment(&entry) {
                continue;
            }
            self.add_sub_deployment(&mut tree, &root, &entry)?;
        }

        Ok(tree)
    }

    fn add_sub_deployment(
        &self,
        tree: &mut DeploymentTree,
        boundary: &Path,
        path: &Path,
    ) -> Result<UnitId> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let web_inf = path.join(&self.config.web_inf);
        let is_web = web_inf.is_dir() || path.extension().is_some_and(|e| e == "war");

        let mount = self.mount(path, boundary)?;
        let unit = tree.add_sub_deployment(name.clone(), mount, !is_web);
        debug!("Found sub-deployment {} (web: {})", name, is_web);

        if web_inf.is_dir() {
            let classes = web_inf.join("classes");
            if classes.is_dir() {
                let mount = self.mount(&classes, boundary)?;
                tree.add_resource_root(unit, mount, true);
            }
            for jar in self.jars_in(&web_inf.join("lib"))? {
                let mount = self.mount(&jar, boundary)?;
                tree.add_resource_root(unit, mount, true);
            }
        }
        Ok(unit)
    }

    fn is_sub_deployment(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.config
            .sub_deployment_extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    }

    fn jars_in(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        Ok(sorted_children(dir)?
            .into_iter()
            .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "jar"))
            .collect())
    }

    fn mount(&self, path: &Path, boundary: &Path) -> Result<BrowsableRoot> {
        let relative = relative_name(path, boundary).unwrap_or_default();
        self.mounts
            .mount(path, &relative)
            .map_err(|source| ScanError::Mount {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        children.push(entry?.into_path());
    }
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mount::FsMountProvider;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_jar(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        zip.start_file("x.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"x").unwrap();
        zip.finish().unwrap();
    }

    fn scanner() -> DeploymentScanner {
        DeploymentScanner::new(Arc::new(FsMountProvider::new()), StructureConfig::default())
    }

    #[test]
    fn test_scan_exploded_ear() {
        let dir = tempdir().unwrap();
        let ear = dir.path().join("app.ear");
        write_jar(&ear.join("lib/a.jar"));
        write_jar(&ear.join("lib/b.jar"));
        write_jar(&ear.join("ejb.jar"));
        write_jar(&ear.join("util/plain.jar"));
        std::fs::create_dir_all(ear.join("web.war/WEB-INF/classes")).unwrap();
        write_jar(&ear.join("web.war/WEB-INF/lib/w.jar"));

        let tree = scanner().scan(&ear).unwrap();
        let top = tree.unit(tree.top_level());
        assert_eq!(top.name(), "app.ear");
        // deployment root, two libraries, two sub-deployment roots
        assert_eq!(top.roots().len(), 5);

        let names: Vec<_> = tree.units().map(|(_, u)| u.name().to_string()).collect();
        assert_eq!(names, vec!["app.ear", "ejb.jar", "web.war"]);

        let ejb = tree.find_unit("ejb.jar").unwrap();
        assert!(tree.root(tree.unit(ejb).deployment_root()).is_module_root());

        let web = tree.find_unit("web.war").unwrap();
        let web_unit = tree.unit(web);
        assert!(!tree.root(web_unit.deployment_root()).is_module_root());
        assert_eq!(web_unit.roots().len(), 3);
        assert!(
            web_unit.roots()[1..]
                .iter()
                .all(|r| tree.root(*r).is_module_root())
        );
    }

    #[test]
    fn test_scan_single_archive() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("standalone.jar");
        write_jar(&jar);

        let tree = scanner().scan(&jar).unwrap();
        assert_eq!(tree.units().count(), 1);
        let top = tree.unit(tree.top_level());
        assert_eq!(top.name(), "standalone.jar");
        assert!(tree.root(top.deployment_root()).is_module_root());
    }

    #[test]
    fn test_scan_missing_path() {
        let dir = tempdir().unwrap();
        let err = scanner().scan(&dir.path().join("nope.ear")).unwrap_err();
        assert!(matches!(err, ScanError::NotFound(_)));
    }
}
