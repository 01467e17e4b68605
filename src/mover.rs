//! Turning a selected destination into a concrete move.
//!
//! Nothing here touches the filesystem. The host's mover creates the folders
//! listed by [`MovePlan::folder_chain()`] and renames the file to
//! [`MovePlan::target()`].

use std::fmt;

use crate::types::FileMetadata;

/// A pending move of one file into its destination folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    source: String,
    folder: String,
    target: String,
}

impl MovePlan {
    /// Normalize `destination` (trailing `/` removed) and compute the file's new path.
    #[must_use]
    pub fn new(file: &FileMetadata, destination: &str) -> Self {
        let folder = destination.trim_end_matches('/').to_owned();
        let target = if folder.is_empty() {
            file.name().to_owned()
        } else {
            format!("{folder}/{}", file.name())
        };
        Self {
            source: file.path().to_owned(),
            folder,
            target,
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The destination folder, without a trailing `/`.
    #[must_use]
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// The file's path after the move.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Every folder on the way to [`folder()`](Self::folder), outermost first.
    #[must_use]
    pub fn folder_chain(&self) -> Vec<&str> {
        if self.folder.is_empty() {
            return Vec::new();
        }
        let mut out: Vec<&str> = self
            .folder
            .match_indices('/')
            .map(|(i, _)| &self.folder[..i])
            .filter(|prefix| !prefix.is_empty() && !prefix.ends_with('/'))
            .collect();
        out.push(&self.folder);
        out
    }

    /// Whether the file already sits at its target path.
    #[must_use]
    pub fn is_in_place(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for MovePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
