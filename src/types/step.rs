use std::fmt;

use serde::{Deserialize, Serialize};

/// Which file attribute a step inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// A frontmatter field named by the step's `key`.
    Yaml,
    /// The file's tags, tried in order.
    Tag,
    /// The full file name.
    Name,
}

/// One matching/rendering unit within a [`RuleChain`](super::RuleChain).
///
/// `pattern` is a regular expression matched against the selected attribute;
/// `folder` is a template whose `$1`, `$2`, ... placeholders are replaced with
/// the pattern's capture groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub pattern: String,
    pub folder: String,
    #[serde(default)]
    pub optional: bool,
}

impl RuleStep {
    /// Mark this step optional: a miss contributes nothing instead of failing the chain.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Intermediate builder for a step. Created by [`match_name()`], [`match_tag()`]
/// or [`match_yaml()`]; [`to()`](StepBuilder::to) supplies the folder template.
#[derive(Debug, Clone)]
pub struct StepBuilder {
    kind: StepKind,
    key: Option<String>,
    pattern: String,
}

impl StepBuilder {
    #[must_use]
    pub fn to(self, folder: &str) -> RuleStep {
        RuleStep {
            kind: self.kind,
            key: self.key,
            pattern: self.pattern,
            folder: folder.to_owned(),
            optional: false,
        }
    }
}

/// Start a step that matches `pattern` against the file name.
#[must_use]
pub fn match_name(pattern: &str) -> StepBuilder {
    StepBuilder {
        kind: StepKind::Name,
        key: None,
        pattern: pattern.to_owned(),
    }
}

/// Start a step that matches `pattern` against each tag in turn.
#[must_use]
pub fn match_tag(pattern: &str) -> StepBuilder {
    StepBuilder {
        kind: StepKind::Tag,
        key: None,
        pattern: pattern.to_owned(),
    }
}

/// Start a step that matches `pattern` against the frontmatter field `key`.
#[must_use]
pub fn match_yaml(key: &str, pattern: &str) -> StepBuilder {
    StepBuilder {
        kind: StepKind::Yaml,
        key: Some(key.to_owned()),
        pattern: pattern.to_owned(),
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Yaml => write!(f, "yaml"),
            StepKind::Tag => write!(f, "tag"),
            StepKind::Name => write!(f, "name"),
        }
    }
}

impl fmt::Display for RuleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        match (self.kind, self.key.as_deref()) {
            (_, Some(key)) if is_bare_key(key) => write!(f, " {key}")?,
            (_, Some(key)) => write!(f, " {}", Quoted(key))?,
            // `_` marks a yaml step with no key; other kinds simply omit it
            (StepKind::Yaml, None) => write!(f, " _")?,
            (_, None) => {}
        }
        write!(f, " {} -> {}", Quoted(&self.pattern), Quoted(&self.folder))?;
        if self.optional {
            write!(f, " optional")?;
        }
        Ok(())
    }
}

pub(crate) fn is_bare_key(key: &str) -> bool {
    if key == "_" {
        return false;
    }
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Writes a string literal in the chain notation.
pub(crate) struct Quoted<'a>(pub(crate) &'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for c in self.0.chars() {
            match c {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, "\\n")?,
                '\t' => write!(f, "\\t")?,
                c => write!(f, "{c}")?,
            }
        }
        write!(f, "\"")
    }
}
