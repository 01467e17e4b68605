//! Compiled, memoized step patterns.
//!
//! Patterns are user-authored, so a pattern that fails to compile is not an
//! error: it is reported once and replaced by a sentinel [`Matcher`] that
//! never matches. The sentinel is cached under the same pattern string, so a
//! bad pattern is neither recompiled nor reported again.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use regex::Regex;
use tracing::warn;

/// The capture groups of one successful step match.
///
/// Group 0 (the whole match) is not included: index 0 holds capture group 1.
/// A group that did not participate in the match is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepMatch {
    groups: Vec<Option<String>>,
}

impl StepMatch {
    pub(crate) fn new(groups: Vec<Option<String>>) -> Self {
        Self { groups }
    }

    #[must_use]
    pub fn groups(&self) -> &[Option<String>] {
        &self.groups
    }

    /// Text of capture group `n` (1-based), if it participated.
    #[must_use]
    pub fn group(&self, n: usize) -> Option<&str> {
        self.groups.get(n.checked_sub(1)?)?.as_deref()
    }
}

#[derive(Debug, Clone)]
enum Kind {
    Regex(Regex),
    Never { reason: Arc<str> },
}

/// An executable pattern. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Matcher {
    kind: Kind,
}

impl Matcher {
    /// A matcher that reports no match for any input.
    #[must_use]
    pub fn never(reason: &str) -> Self {
        Self {
            kind: Kind::Never {
                reason: Arc::from(reason),
            },
        }
    }

    /// Whether this is the sentinel standing in for an invalid pattern.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        matches!(self.kind, Kind::Never { .. })
    }

    /// Why the pattern was rejected, for sentinels.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.kind {
            Kind::Regex(_) => None,
            Kind::Never { reason } => Some(reason),
        }
    }

    /// Number of capture groups, not counting the whole match.
    #[must_use]
    pub fn group_count(&self) -> usize {
        match &self.kind {
            Kind::Regex(re) => re.captures_len() - 1,
            Kind::Never { .. } => 0,
        }
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match &self.kind {
            Kind::Regex(re) => re.is_match(text),
            Kind::Never { .. } => false,
        }
    }

    /// Search `text` and return the capture groups of the leftmost match.
    #[must_use]
    pub fn captures(&self, text: &str) -> Option<StepMatch> {
        let Kind::Regex(re) = &self.kind else {
            return None;
        };
        let caps = re.captures(text)?;
        let groups = caps
            .iter()
            .skip(1)
            .map(|m| m.map(|m| m.as_str().to_owned()))
            .collect();
        Some(StepMatch::new(groups))
    }
}

/// An invalid pattern and the compiler's reason for rejecting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDiagnostic {
    pub pattern: String,
    pub message: String,
}

/// Memoizes compiled patterns by their exact source string.
///
/// Entries are never evicted; the cache is bounded by the number of distinct
/// patterns configured. Safe to share between threads: a miss takes the write
/// lock and inserts only if the entry is still absent.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: RwLock<HashMap<String, Matcher>>,
}

impl PatternCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the matcher for `pattern`, compiling it on first use.
    pub fn compile(&self, pattern: &str) -> Matcher {
        if let Some(found) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pattern)
        {
            return found.clone();
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(pattern.to_owned())
            .or_insert_with(|| match Regex::new(pattern) {
                Ok(re) => Matcher {
                    kind: Kind::Regex(re),
                },
                Err(err) => {
                    warn!(pattern, error = %err, "invalid pattern, steps using it will never match");
                    Matcher::never(&err.to_string())
                }
            })
            .clone()
    }

    /// Whether `pattern` has been compiled (successfully or not).
    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(pattern)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every invalid pattern seen so far, sorted by pattern.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<PatternDiagnostic> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<PatternDiagnostic> = entries
            .iter()
            .filter_map(|(pattern, matcher)| {
                matcher.error().map(|message| PatternDiagnostic {
                    pattern: pattern.clone(),
                    message: message.to_owned(),
                })
            })
            .collect();
        out.sort_by(|a, b| a.pattern.cmp(&b.pattern));
        out
    }
}
