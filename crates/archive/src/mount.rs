use deployscope_api::{ApiError, BoxError, BrowsableRoot, MountProvider};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

/// Mounts directories in place and validates archives before exposing them.
///
/// Overlays replace the content of a root, keyed by its path relative to
/// the top-level deployment.
#[derive(Debug, Default, Clone)]
pub struct FsMountProvider {
    overlays: BTreeMap<String, PathBuf>,
}

impl FsMountProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overlays(overlays: BTreeMap<String, PathBuf>) -> Self {
        Self { overlays }
    }

    fn mount_content(path: &Path, content: &Path) -> Result<BrowsableRoot, BoxError> {
        if content.is_dir() {
            return Ok(BrowsableRoot::directory(path).with_content(content));
        }
        if !content.is_file() {
            return Err(ApiError::InvalidArgument(format!(
                "{} does not exist",
                content.display()
            ))
            .into());
        }

        // Opening the central directory catches truncated or non-zip files early
        let file = File::open(content)?;
        ZipArchive::new(file)
            .map_err(|e| ApiError::NotAnArchive(format!("{}: {}", content.display(), e)))?;
        Ok(BrowsableRoot::archive(path).with_content(content))
    }
}

impl MountProvider for FsMountProvider {
    fn mount(&self, path: &Path, relative_name: &str) -> Result<BrowsableRoot, BoxError> {
        match self.overlays.get(relative_name) {
            Some(overlay) => {
                debug!("Mounting overlay {} for {}", overlay.display(), relative_name);
                Self::mount_content(path, overlay)
            }
            None => Self::mount_content(path, path),
        }
    }
}
