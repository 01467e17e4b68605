use std::fmt;

use serde::{Deserialize, Serialize};

use super::step::{Quoted, RuleStep};

/// An ordered, user-authored routing rule.
///
/// Each matching step appends its rendered folder to the destination, in step
/// order. A chain has no identity beyond its position in the owning list; the
/// `name` is a display label only.
///
/// # Example
///
/// ```
/// use automover::{RuleChain, match_tag, match_yaml};
///
/// let chain = RuleChain::new("Projects")
///     .step(match_tag(r"#proj/(\w+)").to("Projects/$1"))
///     .step(match_yaml("Status", "Active").to("Active").optional());
/// assert_eq!(chain.steps.len(), 2);
/// assert!(chain.active);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleChain {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<RuleStep>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// When set, every step of this chain is treated as optional.
    #[serde(default)]
    pub continue_on_failure: bool,
}

fn default_active() -> bool {
    true
}

impl Default for RuleChain {
    fn default() -> Self {
        Self::new("New Rule")
    }
}

impl RuleChain {
    /// Create an active chain with no steps.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            steps: Vec::new(),
            active: true,
            continue_on_failure: false,
        }
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: RuleStep) -> Self {
        self.steps.push(step);
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[must_use]
    pub fn with_continue_on_failure(mut self, continue_on_failure: bool) -> Self {
        self.continue_on_failure = continue_on_failure;
        self
    }

    /// Whether a miss on `step` should be skipped rather than fail the chain.
    pub(crate) fn tolerates_miss(&self, step: &RuleStep) -> bool {
        step.optional || self.continue_on_failure
    }
}

impl fmt::Display for RuleChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain {}", Quoted(&self.name))?;
        if !self.active {
            write!(f, " disabled")?;
        }
        if self.continue_on_failure {
            write!(f, " continue_on_failure")?;
        }
        write!(f, ":")?;
        for step in &self.steps {
            write!(f, "\n    {step}")?;
        }
        Ok(())
    }
}
