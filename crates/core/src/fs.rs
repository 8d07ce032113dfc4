use deployscope_api::FileSystemView;
use std::path::{Component, Path, PathBuf};

/// Probes the local filesystem directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystemView for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

/// Canonical form of `path`, or the path itself when it cannot be resolved.
pub fn canonical_or_raw(fs: &dyn FileSystemView, path: &Path) -> PathBuf {
    fs.canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Drops `.` segments and folds `..` into the preceding segment without
/// touching the filesystem. `..` never climbs above the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.file_name().is_some() {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `path` relative to `base`, always with `/` separators.
pub fn relative_name(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_parent_segments() {
        assert_eq!(
            normalize_lexically(Path::new("/d/app.ear/web.war/../lib/./a.jar")),
            PathBuf::from("/d/app.ear/lib/a.jar")
        );
        assert_eq!(
            normalize_lexically(Path::new("/d/../../../x.jar")),
            PathBuf::from("/x.jar")
        );
        assert_eq!(
            normalize_lexically(Path::new("../a/../../b")),
            PathBuf::from("../../b")
        );
    }

    #[test]
    fn test_relative_name_uses_forward_slashes() {
        assert_eq!(
            relative_name(Path::new("/d/app.ear/lib/a.jar"), Path::new("/d/app.ear")),
            Some("lib/a.jar".to_string())
        );
        assert_eq!(relative_name(Path::new("/elsewhere"), Path::new("/d")), None);
    }
}
