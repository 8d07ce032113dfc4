//! `META-INF/MANIFEST.MF` access for jar archives and exploded directories.

use deployscope_api::{ApiError, BoxError, BrowsableRoot, ManifestSource, MountKind};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

pub struct JarManifestSource;

impl JarManifestSource {
    fn read_manifest(&self, root: &BrowsableRoot) -> Result<Option<String>, BoxError> {
        match root.kind {
            MountKind::Directory => {
                let path = root.content.join(MANIFEST_PATH);
                if !path.is_file() {
                    return Ok(None);
                }
                Ok(Some(std::fs::read_to_string(path)?))
            }
            MountKind::Archive => read_archive_manifest(&root.content),
        }
    }
}

impl ManifestSource for JarManifestSource {
    fn attribute(&self, root: &BrowsableRoot, name: &str) -> Result<Option<String>, BoxError> {
        let Some(content) = self.read_manifest(root)? else {
            return Ok(None);
        };
        let attributes = parse_main_attributes(&content).map_err(|reason| {
            ApiError::MalformedManifest {
                path: root.path.display().to_string(),
                reason,
            }
        })?;
        Ok(attributes
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value))
    }
}

fn read_archive_manifest(path: &Path) -> Result<Option<String>, BoxError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut entry = match archive.by_name(MANIFEST_PATH) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(Some(content))
}

/// Parses the main section of a manifest: `Name: value` lines up to the
/// first blank line, where a line starting with one space continues the
/// previous value.
pub fn parse_main_attributes(content: &str) -> Result<Vec<(String, String)>, String> {
    let mut attributes: Vec<(String, String)> = Vec::new();

    for (number, line) in content.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            break;
        }

        if let Some(rest) = line.strip_prefix(' ') {
            let Some((_, value)) = attributes.last_mut() else {
                return Err(format!("line {}: continuation without a header", number + 1));
            };
            value.push_str(rest);
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(format!("line {}: missing ':' separator", number + 1));
        };
        if key.is_empty() || key.contains(' ') {
            return Err(format!("line {}: invalid header name {:?}", number + 1, key));
        }
        let value = value.strip_prefix(' ').unwrap_or(value);
        attributes.push((key.to_string(), value.to_string()));
    }

    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_jar(path: &Path, manifest: Option<&str>) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        if let Some(manifest) = manifest {
            zip.start_file(MANIFEST_PATH, options).unwrap();
            zip.write_all(manifest.as_bytes()).unwrap();
        }
        zip.start_file("com/example/Test.class", options).unwrap();
        zip.write_all(&[0xCA, 0xFE, 0xBA, 0xBE]).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_parse_continuation_lines() {
        let manifest = "Manifest-Version: 1.0\r\nClass-Path: lib/a.jar lib/\r\n b.jar\r\n\r\nName: x\r\nClass-Path: ignored\r\n";
        let attributes = parse_main_attributes(manifest).unwrap();
        assert_eq!(
            attributes,
            vec![
                ("Manifest-Version".to_string(), "1.0".to_string()),
                ("Class-Path".to_string(), "lib/a.jar lib/b.jar".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_main_attributes("not a header\n").is_err());
        assert!(parse_main_attributes(" leading continuation\n").is_err());
    }

    #[test]
    fn test_archive_attribute() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("a.jar");
        write_jar(&jar, Some("Manifest-Version: 1.0\nclass-path: b.jar\n"));

        let source = JarManifestSource;
        let value = source
            .attribute(&BrowsableRoot::archive(&jar), "Class-Path")
            .unwrap();
        assert_eq!(value.as_deref(), Some("b.jar"));
    }

    #[test]
    fn test_archive_without_manifest() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("a.jar");
        write_jar(&jar, None);

        let value = JarManifestSource
            .attribute(&BrowsableRoot::archive(&jar), "Class-Path")
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_directory_manifest_and_corrupt_archive() {
        let dir = tempdir().unwrap();
        let war = dir.path().join("web.war");
        std::fs::create_dir_all(war.join("META-INF")).unwrap();
        std::fs::write(war.join(MANIFEST_PATH), "Class-Path: x.jar\n").unwrap();

        let value = JarManifestSource
            .attribute(&BrowsableRoot::directory(&war), "Class-Path")
            .unwrap();
        assert_eq!(value.as_deref(), Some("x.jar"));

        let corrupt = dir.path().join("corrupt.jar");
        std::fs::write(&corrupt, b"definitely not a zip").unwrap();
        assert!(
            JarManifestSource
                .attribute(&BrowsableRoot::archive(&corrupt), "Class-Path")
                .is_err()
        );
    }
}
