use deployscope_api::{BoxError, BrowsableRoot, ManifestSource};

/// Extracts classpath references from a root's manifest.
pub struct ManifestReferenceReader<'a> {
    source: &'a dyn ManifestSource,
    attribute: &'a str,
}

impl<'a> ManifestReferenceReader<'a> {
    pub fn new(source: &'a dyn ManifestSource, attribute: &'a str) -> Self {
        Self { source, attribute }
    }

    /// Reads the manifest again on every call. Missing manifest or attribute
    /// yields no references; an unreadable manifest is an error.
    pub fn read_references(&self, root: &BrowsableRoot) -> Result<Vec<String>, BoxError> {
        let Some(value) = self.source.attribute(root, self.attribute)? else {
            return Ok(Vec::new());
        };
        Ok(split_class_path(&value).map(str::to_string).collect())
    }
}

/// Whitespace-delimited entries of a classpath attribute value.
///
/// `.` is dropped: a root referencing itself adds nothing.
pub fn split_class_path(value: &str) -> impl Iterator<Item = &str> {
    value
        .split_whitespace()
        .filter(|item| !item.is_empty() && *item != ".")
}
