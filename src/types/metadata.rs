use std::collections::HashMap;

use super::Value;

/// Parsed frontmatter: top-level keys mapped to their values.
pub type Frontmatter = HashMap<String, Value>;

/// A read-only snapshot of one file's metadata.
///
/// Built once per file and shared by every step of every chain evaluated for
/// that file, so a single routing decision never mixes two snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMetadata {
    name: String,
    path: String,
    frontmatter: Option<Frontmatter>,
    tags: Option<Vec<String>>,
}

impl FileMetadata {
    /// Create a snapshot for a file at the vault root. The path defaults to the name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            ..Self::default()
        }
    }

    /// Set the file's stable path (including its name).
    #[must_use]
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set a frontmatter key. Creates the frontmatter if the file had none.
    #[must_use]
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value.into());
        self
    }

    /// Insert a frontmatter key (mutable reference version).
    pub fn insert(&mut self, key: &str, value: Value) {
        self.frontmatter
            .get_or_insert_with(HashMap::new)
            .insert(key.to_owned(), value);
    }

    /// Replace the whole frontmatter.
    #[must_use]
    pub fn with_frontmatter(mut self, frontmatter: Frontmatter) -> Self {
        self.frontmatter = Some(frontmatter);
        self
    }

    /// Append a tag, keeping the order tags were added in.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(tag.into());
        self
    }

    /// Replace the whole tag list.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn frontmatter(&self) -> Option<&Frontmatter> {
        self.frontmatter.as_ref()
    }

    #[must_use]
    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    /// Look up a single frontmatter value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.frontmatter.as_ref()?.get(key)
    }
}
