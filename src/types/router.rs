use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::chain::RuleChain;
use super::destination::Destination;
use super::error::ChainIssue;
use super::metadata::FileMetadata;
use super::routing_report::RoutingReport;
use super::step::RuleStep;
use crate::mover::MovePlan;
use crate::pattern::{PatternCache, StepMatch};

/// The matching engine: selects a destination folder for a file from an
/// ordered list of [`RuleChain`]s.
///
/// A `Router` borrows the chains for the duration of each call and never
/// mutates them. Its only state is the shared [`PatternCache`], so a router is
/// cheap to clone and can be used from several threads at once.
///
/// # Example
///
/// ```
/// use automover::{FileMetadata, Router, RuleChain, match_name};
///
/// let chains = vec![
///     RuleChain::new("Never").with_active(false).step(match_name(".*").to("Never")),
///     RuleChain::new("Journal").step(match_name(r"^(\d{4})-.*\.md$").to("Journal/$1")),
/// ];
///
/// let router = Router::new();
/// let file = FileMetadata::new("2024-01-01.md");
/// assert_eq!(router.select_destination(&chains, &file).as_deref(), Some("Journal/2024"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Router {
    cache: Arc<PatternCache>,
}

impl Router {
    /// Create a router with its own, empty pattern cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a router that compiles patterns through `cache`.
    #[must_use]
    pub fn with_cache(cache: Arc<PatternCache>) -> Self {
        Self { cache }
    }

    #[must_use]
    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// Match one step against a file. `None` means the step did not match,
    /// including when the attribute it inspects is missing.
    #[must_use]
    pub fn evaluate_step(&self, step: &RuleStep, file: &FileMetadata) -> Option<StepMatch> {
        crate::evaluate::evaluate_step(&self.cache, step, file)
    }

    /// Build the path a single chain produces for a file.
    ///
    /// Returns `None` if a required step did not match. A chain whose steps
    /// all contributed nothing returns `Some("")`, which callers treat as no
    /// destination. The chain's `active` flag is not consulted here.
    #[must_use]
    pub fn evaluate_chain(&self, chain: &RuleChain, file: &FileMetadata) -> Option<String> {
        crate::evaluate::evaluate_chain(&self.cache, chain, file)
    }

    /// Return the path from the first active chain that produces a non-empty
    /// one, or `None` if no chain does.
    #[must_use]
    pub fn select_destination(&self, chains: &[RuleChain], file: &FileMetadata) -> Option<String> {
        self.route(chains, file).map(Destination::into_path)
    }

    /// Same selection as [`select_destination()`](Self::select_destination),
    /// also naming the chain that produced the path.
    #[must_use]
    pub fn route(&self, chains: &[RuleChain], file: &FileMetadata) -> Option<Destination> {
        crate::evaluate::select(&self.cache, chains, file)
    }

    /// Select a destination and record what happened to every visited chain.
    pub fn route_detailed(&self, chains: &[RuleChain], file: &FileMetadata) -> RoutingReport {
        crate::evaluate::select_detailed(&self.cache, chains, file)
    }

    /// Route a batch of files, one after another, and return the moves to
    /// perform. Files without a destination, or already in place, are left out.
    pub fn plan_moves<'a, I>(&self, chains: &[RuleChain], files: I) -> Vec<MovePlan>
    where
        I: IntoIterator<Item = &'a FileMetadata>,
    {
        let mut plans = Vec::new();
        let mut seen = 0_usize;

        for file in files {
            seen += 1;
            let Some(destination) = self.route(chains, file) else {
                continue;
            };
            let plan = MovePlan::new(file, destination.path());
            if plan.is_in_place() {
                debug!(file = file.path(), "already in destination folder");
                continue;
            }
            plans.push(plan);
        }

        info!(files = seen, moves = plans.len(), "planned moves");
        plans
    }

    /// Lint chains for problems that make steps silently ineffective.
    ///
    /// Compiles every pattern through the cache as a side effect.
    #[must_use]
    pub fn check(&self, chains: &[RuleChain]) -> Vec<ChainIssue> {
        crate::check::check(&self.cache, chains)
    }
}

impl fmt::Display for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Router({} cached patterns, {} invalid)",
            self.cache.len(),
            self.cache.diagnostics().len()
        )
    }
}
