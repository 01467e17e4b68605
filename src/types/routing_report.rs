use std::fmt;
use std::time::Duration;

use super::destination::Destination;

/// What happened to one chain while a destination was being selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// The chain is inactive; its steps were not evaluated.
    Skipped,
    /// The required step at this index did not match.
    Failed { step: usize },
    /// Every step ran. An empty path means the chain contributed nothing.
    Completed { path: String },
}

/// One visited chain, in selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTrace {
    pub position: usize,
    pub name: String,
    pub outcome: ChainOutcome,
}

/// Detailed selection report returned by
/// [`Router::route_detailed()`](crate::Router::route_detailed).
///
/// Chains after the winning one are not listed: selection stops at the first
/// non-empty destination.
#[derive(Debug, Clone)]
#[must_use]
pub struct RoutingReport {
    destination: Option<Destination>,
    visited: Vec<ChainTrace>,
    duration: Duration,
}

impl RoutingReport {
    pub(crate) fn new(
        destination: Option<Destination>,
        visited: Vec<ChainTrace>,
        duration: Duration,
    ) -> Self {
        Self {
            destination,
            visited,
            duration,
        }
    }

    /// The selected destination, same as [`Router::route()`](crate::Router::route).
    #[must_use]
    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Every chain the selector looked at, in list order.
    #[must_use]
    pub fn visited(&self) -> &[ChainTrace] {
        &self.visited
    }

    /// Wall-clock duration of the selection.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for ChainOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainOutcome::Skipped => write!(f, "skipped"),
            ChainOutcome::Failed { step } => write!(f, "failed at step {step}"),
            ChainOutcome::Completed { path } if path.is_empty() => write!(f, "empty"),
            ChainOutcome::Completed { path } => write!(f, "-> {path}"),
        }
    }
}

impl fmt::Display for RoutingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.destination {
            Some(d) => write!(f, "destination: {}", d.path())?,
            None => write!(f, "destination: none")?,
        }
        let visited: Vec<String> = self
            .visited
            .iter()
            .map(|t| format!("{} {}", t.name, t.outcome))
            .collect();
        write!(f, ", visited: [{}]", visited.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
