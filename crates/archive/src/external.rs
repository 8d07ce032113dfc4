use dashmap::DashMap;
use deployscope_api::{BoxError, ExternalModuleGateway, ModuleReference};
use deployscope_core::config::ExternalConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Registry of filesystem locations outside any deployment.
///
/// Shared by every deployment the process resolves: the same absolute path
/// always maps to the same module.
#[derive(Debug)]
pub struct FsExternalModules {
    allowed_roots: Vec<PathBuf>,
    prefix: String,
    registered: DashMap<String, ModuleReference>,
}

impl FsExternalModules {
    pub fn new(config: &ExternalConfig) -> Self {
        let allowed_roots = config
            .allowed_roots
            .iter()
            .map(|p| p.canonicalize().unwrap_or_else(|_| p.clone()))
            .collect();
        Self {
            allowed_roots,
            prefix: config.module_prefix.clone(),
            registered: DashMap::new(),
        }
    }

    pub fn registered(&self) -> Vec<ModuleReference> {
        let mut modules: Vec<_> = self.registered.iter().map(|e| e.value().clone()).collect();
        modules.sort();
        modules
    }
}

impl ExternalModuleGateway for FsExternalModules {
    fn is_valid(&self, path: &str) -> bool {
        let path = Path::new(path);
        if !path.is_absolute() {
            return false;
        }
        let Ok(canonical) = path.canonicalize() else {
            debug!("External Class-Path entry {} does not exist", path.display());
            return false;
        };
        self.allowed_roots.is_empty()
            || self
                .allowed_roots
                .iter()
                .any(|root| canonical.starts_with(root))
    }

    fn register(&self, path: &str) -> Result<ModuleReference, BoxError> {
        let module = self
            .registered
            .entry(path.to_string())
            .or_insert_with(|| {
                let module = ModuleReference::new(format!("{}{}", self.prefix, path));
                info!("Registered external module {}", module);
                module
            })
            .value()
            .clone();
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_allow_list() {
        let allowed = tempdir().unwrap();
        let other = tempdir().unwrap();
        let inside = allowed.path().join("a.jar");
        let outside = other.path().join("b.jar");
        std::fs::write(&inside, b"").unwrap();
        std::fs::write(&outside, b"").unwrap();

        let gateway = FsExternalModules::new(&ExternalConfig {
            allowed_roots: vec![allowed.path().to_path_buf()],
            ..ExternalConfig::default()
        });

        assert!(gateway.is_valid(inside.to_str().unwrap()));
        assert!(!gateway.is_valid(outside.to_str().unwrap()));
        assert!(!gateway.is_valid("relative/a.jar"));
        assert!(!gateway.is_valid(allowed.path().join("missing.jar").to_str().unwrap()));
    }

    #[test]
    fn test_register_is_idempotent() {
        let gateway = FsExternalModules::new(&ExternalConfig::default());
        let first = gateway.register("/opt/lib/a.jar").unwrap();
        let second = gateway.register("/opt/lib/a.jar").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.as_str(), "deployment.external./opt/lib/a.jar");
        assert_eq!(gateway.registered().len(), 1);
    }
}
