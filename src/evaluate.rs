use std::time::Instant;

use tracing::{debug, trace};

use crate::pattern::{PatternCache, StepMatch};
use crate::render::{push_segment, render};
use crate::types::{
    ChainOutcome, ChainTrace, Destination, FileMetadata, RoutingReport, RuleChain, RuleStep,
    StepKind,
};

pub(crate) fn evaluate_step(
    cache: &PatternCache,
    step: &RuleStep,
    file: &FileMetadata,
) -> Option<StepMatch> {
    let matcher = cache.compile(&step.pattern);
    match step.kind {
        StepKind::Name => matcher.captures(file.name()),
        StepKind::Tag => file
            .tags()?
            .iter()
            .find_map(|tag| matcher.captures(tag)),
        StepKind::Yaml => {
            let key = step.key.as_deref().filter(|k| !k.is_empty())?;
            let text = file.get(key)?.as_match_text()?;
            matcher.captures(&text)
        }
    }
}

/// Run every step of `chain` in order. Does not look at `chain.active`.
pub(crate) fn run_chain(
    cache: &PatternCache,
    chain: &RuleChain,
    file: &FileMetadata,
) -> ChainOutcome {
    let mut path = String::new();

    for (index, step) in chain.steps.iter().enumerate() {
        match evaluate_step(cache, step, file) {
            Some(m) => push_segment(&mut path, &render(&step.folder, m.groups())),
            None if chain.tolerates_miss(step) => {
                trace!(chain = %chain.name, step = index, "step missed, skipping");
            }
            None => {
                debug!(chain = %chain.name, step = index, file = file.name(), "required step did not match");
                return ChainOutcome::Failed { step: index };
            }
        }
    }

    ChainOutcome::Completed { path }
}

pub(crate) fn evaluate_chain(
    cache: &PatternCache,
    chain: &RuleChain,
    file: &FileMetadata,
) -> Option<String> {
    match run_chain(cache, chain, file) {
        ChainOutcome::Completed { path } => Some(path),
        ChainOutcome::Failed { .. } | ChainOutcome::Skipped => None,
    }
}

pub(crate) fn select(
    cache: &PatternCache,
    chains: &[RuleChain],
    file: &FileMetadata,
) -> Option<Destination> {
    for (position, chain) in chains.iter().enumerate() {
        if !chain.active {
            trace!(chain = %chain.name, "inactive chain skipped");
            continue;
        }
        if let Some(path) = evaluate_chain(cache, chain, file).filter(|p| !p.is_empty()) {
            debug!(chain = %chain.name, file = file.name(), destination = %path, "chain matched");
            return Some(Destination::new(&chain.name, position, path));
        }
    }

    None
}

pub(crate) fn select_detailed(
    cache: &PatternCache,
    chains: &[RuleChain],
    file: &FileMetadata,
) -> RoutingReport {
    let start = Instant::now();
    let mut visited = Vec::new();
    let mut destination = None;

    for (position, chain) in chains.iter().enumerate() {
        let outcome = if chain.active {
            run_chain(cache, chain, file)
        } else {
            ChainOutcome::Skipped
        };

        if let ChainOutcome::Completed { path } = &outcome {
            if !path.is_empty() {
                destination = Some(Destination::new(&chain.name, position, path.clone()));
            }
        }

        visited.push(ChainTrace {
            position,
            name: chain.name.clone(),
            outcome,
        });

        if destination.is_some() {
            break;
        }
    }

    RoutingReport::new(destination, visited, start.elapsed())
}
