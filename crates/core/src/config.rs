use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Manifest attribute holding classpath references
    pub class_path_attribute: String,
    /// Prefix of every deployment-derived module identifier
    pub module_prefix: String,
    pub structure: StructureConfig,
    pub external: ExternalConfig,
    /// Relative path inside the deployment -> replacement content
    pub overlays: BTreeMap<String, PathBuf>,
    /// Run content indexers over synthesized roots
    pub index_content: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            class_path_attribute: "Class-Path".to_string(),
            module_prefix: "deployment.".to_string(),
            structure: StructureConfig::default(),
            external: ExternalConfig::default(),
            overlays: BTreeMap::new(),
            index_content: true,
        }
    }
}

impl ResolverConfig {
    /// Loads a JSON configuration file. Absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Layout rules used when scanning an exploded deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    pub library_directory: String,
    pub sub_deployment_extensions: Vec<String>,
    pub web_inf: String,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            library_directory: "lib".to_string(),
            sub_deployment_extensions: vec!["war".to_string(), "jar".to_string(), "rar".to_string()],
            web_inf: "WEB-INF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalConfig {
    /// Absolute classpath entries must live under one of these. Empty allows any.
    pub allowed_roots: Vec<PathBuf>,
    pub module_prefix: String,
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self {
            allowed_roots: Vec::new(),
            module_prefix: "deployment.external.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "module_prefix": "app.", "structure": {{ "library_directory": "libs" }} }}"#
        )
        .unwrap();

        let config = ResolverConfig::load(file.path()).unwrap();
        assert_eq!(config.module_prefix, "app.");
        assert_eq!(config.class_path_attribute, "Class-Path");
        assert_eq!(config.structure.library_directory, "libs");
        assert_eq!(config.structure.web_inf, "WEB-INF");
        assert!(config.index_content);
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(ResolverConfig::load(file.path()).is_err());
    }
}
