//! A single virtual file.
//!
//! A [`FileRecord`] is a slash-normalized virtual path, text content and a
//! metadata map. The directory, name and extension components are computed
//! from the path, never stored; mutating one component rewrites the path
//! while preserving the other two.

use crate::value::{Metadata, Value};

// ============================================================================
// Path normalization
// ============================================================================

/// Normalize a raw path into virtual form.
///
/// Backslashes become `/`, empty and `.` segments are dropped, and any
/// trailing slash disappears. The result has no empty segments.
pub fn normalize_path(raw: &str) -> String {
    raw.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Split a normalized directory string into its segments.
///
/// The empty (root) directory has no segments.
pub fn split_segments(dir: &str) -> Vec<&str> {
    if dir.is_empty() {
        Vec::new()
    } else {
        dir.split('/').collect()
    }
}

/// Join a directory and a file name, skipping the separator at the root.
fn join_path(dir: &str, file_name: &str) -> String {
    if dir.is_empty() {
        file_name.to_owned()
    } else {
        format!("{dir}/{file_name}")
    }
}

// ============================================================================
// FileRecord
// ============================================================================

/// A virtual file: path, text content and metadata.
///
/// Paths are virtual and slash-normalized; two records may share a path
/// (collections impose no uniqueness).
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    path: String,
    pub content: String,
    pub metadata: Metadata,
}

impl FileRecord {
    /// Create a record with empty metadata.
    pub fn new(path: impl AsRef<str>, content: impl Into<String>) -> Self {
        Self {
            path: normalize_path(path.as_ref()),
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    /// Builder-style metadata entry.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Insert or overwrite one metadata entry.
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// The full virtual path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Replace the full path (re-normalized).
    pub fn set_path(&mut self, path: impl AsRef<str>) {
        self.path = normalize_path(path.as_ref());
    }

    /// All path segments but the last, joined with `/`.
    ///
    /// Empty for a root-level file.
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }

    /// The last path segment, extension included.
    pub fn file_name(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[idx + 1..],
            None => &self.path,
        }
    }

    /// The last path segment minus its extension.
    pub fn name(&self) -> &str {
        let file_name = self.file_name();
        match file_name.rfind('.') {
            Some(idx) => &file_name[..idx],
            None => file_name,
        }
    }

    /// The suffix after the last `.` of the file name, empty if none.
    pub fn extension(&self) -> &str {
        let file_name = self.file_name();
        match file_name.rfind('.') {
            Some(idx) => &file_name[idx + 1..],
            None => "",
        }
    }

    /// Rewrite the directory component, keeping name and extension.
    pub fn set_directory(&mut self, dir: impl AsRef<str>) {
        let dir = normalize_path(dir.as_ref());
        self.path = join_path(&dir, self.file_name());
    }

    /// Rewrite the name component, keeping directory and extension.
    pub fn set_name(&mut self, name: impl AsRef<str>) {
        let file_name = match self.extension() {
            "" => name.as_ref().to_owned(),
            ext => format!("{}.{ext}", name.as_ref()),
        };
        self.path = join_path(&self.directory().to_owned(), &file_name);
    }

    /// Rewrite the extension component, keeping directory and name.
    ///
    /// An empty extension removes the suffix entirely.
    pub fn set_extension(&mut self, extension: impl AsRef<str>) {
        let file_name = match extension.as_ref() {
            "" => self.name().to_owned(),
            ext => format!("{}.{ext}", self.name()),
        };
        self.path = join_path(&self.directory().to_owned(), &file_name);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("a/b/c.txt"), "a/b/c.txt");
        assert_eq!(normalize_path("a\\b\\c.txt"), "a/b/c.txt");
        assert_eq!(normalize_path("./a/./b.txt"), "a/b.txt");
        assert_eq!(normalize_path("a//b.txt"), "a/b.txt");
        assert_eq!(normalize_path("a/b/"), "a/b");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn test_components() {
        let record = FileRecord::new("posts/2024/hello.md", "");
        assert_eq!(record.directory(), "posts/2024");
        assert_eq!(record.file_name(), "hello.md");
        assert_eq!(record.name(), "hello");
        assert_eq!(record.extension(), "md");
    }

    #[test]
    fn test_components_root_file() {
        let record = FileRecord::new("index.html", "");
        assert_eq!(record.directory(), "");
        assert_eq!(record.name(), "index");
        assert_eq!(record.extension(), "html");
    }

    #[test]
    fn test_components_no_extension() {
        let record = FileRecord::new("docs/LICENSE", "");
        assert_eq!(record.name(), "LICENSE");
        assert_eq!(record.extension(), "");
    }

    #[test]
    fn test_set_directory_preserves_name_and_extension() {
        let mut record = FileRecord::new("drafts/post.md", "");
        record.set_directory("published/2024");
        assert_eq!(record.path(), "published/2024/post.md");

        record.set_directory("");
        assert_eq!(record.path(), "post.md");
    }

    #[test]
    fn test_set_name_preserves_directory_and_extension() {
        let mut record = FileRecord::new("posts/old.md", "");
        record.set_name("new");
        assert_eq!(record.path(), "posts/new.md");
    }

    #[test]
    fn test_set_extension_preserves_directory_and_name() {
        let mut record = FileRecord::new("posts/hello.md", "");
        record.set_extension("html");
        assert_eq!(record.path(), "posts/hello.html");

        record.set_extension("");
        assert_eq!(record.path(), "posts/hello");

        record.set_extension("txt");
        assert_eq!(record.path(), "posts/hello.txt");
    }

    #[test]
    fn test_set_path_renormalizes() {
        let mut record = FileRecord::new("a.txt", "");
        record.set_path(".\\out\\b.txt");
        assert_eq!(record.path(), "out/b.txt");
    }

    #[test]
    fn test_mutation_keeps_path_well_formed() {
        let mut record = FileRecord::new("a/b.txt", "");
        record.set_directory("x//y/");
        assert_eq!(record.path(), "x/y/b.txt");
        assert!(!record.path().contains("//"));
    }

    #[test]
    fn test_with_meta_builder() {
        let record = FileRecord::new("a.txt", "body")
            .with_meta("title", "A")
            .with_meta("draft", true);
        assert_eq!(record.metadata["title"], Value::from("A"));
        assert_eq!(record.metadata["draft"], Value::Bool(true));
    }

    #[test]
    fn test_clone_is_deep() {
        let mut original = FileRecord::new("a.txt", "body").with_meta("k", "v");
        let copy = original.clone();

        original.content.push_str(" more");
        original.set_meta("k", "changed");

        assert_eq!(copy.content, "body");
        assert_eq!(copy.metadata["k"], Value::from("v"));
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments(""), Vec::<&str>::new());
        assert_eq!(split_segments("a"), vec!["a"]);
        assert_eq!(split_segments("a/b/c"), vec!["a", "b", "c"]);
    }
}
