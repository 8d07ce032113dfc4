#![allow(dead_code)]

use deployscope_api::{
    BoxError, BrowsableRoot, ContentIndexer, ExternalModuleGateway, FileSystemView,
    ManifestSource, ModuleReference, MountProvider,
};
use deployscope_core::Resolver;
use deployscope_core::fs::LocalFileSystem;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// On-disk layout: `<tmp>/app.ear/...`
pub struct Fixture {
    _dir: TempDir,
    pub outer: PathBuf,
    pub ear: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let outer = dir.path().canonicalize().unwrap();
        let ear = outer.join("app.ear");
        fs::create_dir_all(&ear).unwrap();
        Self {
            _dir: dir,
            outer,
            ear,
        }
    }

    /// Creates an empty file below the deployment
    pub fn file(&self, rel: &str) -> PathBuf {
        touch(&self.ear.join(rel))
    }

    /// Creates an empty file next to the deployment
    pub fn outside(&self, rel: &str) -> PathBuf {
        touch(&self.outer.join(rel))
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.ear.join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }
}

fn touch(path: &Path) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
    path.to_path_buf()
}

#[derive(Default)]
pub struct StubManifests {
    entries: HashMap<PathBuf, Result<String, String>>,
}

impl StubManifests {
    pub fn class_path(mut self, root: &Path, value: &str) -> Self {
        self.entries.insert(root.to_path_buf(), Ok(value.to_string()));
        self
    }

    pub fn broken(mut self, root: &Path) -> Self {
        self.entries
            .insert(root.to_path_buf(), Err("invalid manifest header".to_string()));
        self
    }
}

impl ManifestSource for StubManifests {
    fn attribute(&self, root: &BrowsableRoot, name: &str) -> Result<Option<String>, BoxError> {
        assert_eq!(name, "Class-Path");
        match self.entries.get(root.path()) {
            Some(Ok(value)) => Ok(Some(value.clone())),
            Some(Err(e)) => Err(e.clone().into()),
            None => Ok(None),
        }
    }
}

#[derive(Default)]
pub struct RecordingMounts {
    pub mounted: Mutex<Vec<PathBuf>>,
}

impl RecordingMounts {
    pub fn count(&self) -> usize {
        self.mounted.lock().unwrap().len()
    }
}

impl MountProvider for RecordingMounts {
    fn mount(&self, path: &Path, _relative_name: &str) -> Result<BrowsableRoot, BoxError> {
        self.mounted.lock().unwrap().push(path.to_path_buf());
        Ok(BrowsableRoot::archive(path))
    }
}

#[derive(Default)]
pub struct StubGateway {
    pub valid: Vec<String>,
    pub registered: Mutex<Vec<String>>,
}

impl StubGateway {
    pub fn accepting(paths: &[&str]) -> Self {
        Self {
            valid: paths.iter().map(|p| p.to_string()).collect(),
            registered: Mutex::new(Vec::new()),
        }
    }
}

impl ExternalModuleGateway for StubGateway {
    fn is_valid(&self, path: &str) -> bool {
        self.valid.iter().any(|p| p == path)
    }

    fn register(&self, path: &str) -> Result<ModuleReference, BoxError> {
        self.registered.lock().unwrap().push(path.to_string());
        Ok(ModuleReference::new(format!("deployment.external.{path}")))
    }
}

#[derive(Default)]
pub struct CountingIndexer {
    pub count: AtomicUsize,
}

impl ContentIndexer for CountingIndexer {
    fn name(&self) -> &str {
        "counting"
    }

    fn index(&self, _root: &BrowsableRoot) -> Result<(), BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Local filesystem that remembers every probed path
#[derive(Default)]
pub struct ProbeLog {
    pub probed: Mutex<Vec<PathBuf>>,
}

impl FileSystemView for ProbeLog {
    fn exists(&self, path: &Path) -> bool {
        self.probed.lock().unwrap().push(path.to_path_buf());
        LocalFileSystem.exists(path)
    }

    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf> {
        self.probed.lock().unwrap().push(path.to_path_buf());
        LocalFileSystem.canonicalize(path)
    }
}

pub struct Harness {
    pub manifests: Arc<StubManifests>,
    pub mounts: Arc<RecordingMounts>,
    pub gateway: Arc<StubGateway>,
    pub indexer: Arc<CountingIndexer>,
    pub fs: Arc<ProbeLog>,
}

impl Harness {
    pub fn new(manifests: StubManifests) -> Self {
        Self::with_gateway(manifests, StubGateway::default())
    }

    pub fn with_gateway(manifests: StubManifests, gateway: StubGateway) -> Self {
        Self {
            manifests: Arc::new(manifests),
            mounts: Arc::new(RecordingMounts::default()),
            gateway: Arc::new(gateway),
            indexer: Arc::new(CountingIndexer::default()),
            fs: Arc::new(ProbeLog::default()),
        }
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::builder(
            self.manifests.clone(),
            self.mounts.clone(),
            self.gateway.clone(),
        )
        .add_indexer(self.indexer.clone())
        .with_file_system(self.fs.clone())
        .build()
    }

    pub fn indexed(&self) -> usize {
        self.indexer.count.load(Ordering::SeqCst)
    }
}
