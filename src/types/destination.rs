use std::fmt;

/// The destination chosen for a file, with the chain that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Destination {
    chain: String,
    position: usize,
    path: String,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (chain #{} '{}')", self.path, self.position, self.chain)
    }
}

impl Destination {
    pub fn new(chain: impl Into<String>, position: usize, path: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            position,
            path: path.into(),
        }
    }

    /// Name of the chain that matched.
    #[must_use]
    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// Position of that chain in the list it was selected from.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn into_path(self) -> String {
        self.path
    }
}
