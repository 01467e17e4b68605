//! Cascading rule-chain matching for automatic note filing.
//!
//! Given an ordered list of [`RuleChain`]s and a snapshot of one file's
//! metadata ([`FileMetadata`]), a [`Router`] finds the first active chain
//! whose required steps all match and builds a destination folder from the
//! steps' regex captures. Moving the file, deciding when to run, and
//! persisting settings belong to the host; this crate only computes paths.

mod check;
mod error;
mod evaluate;
pub mod mover;
pub mod parse;
pub mod pattern;
mod render;
#[cfg(feature = "binary-cache")]
pub mod serial;
pub mod settings;
mod types;

pub use error::AutomoverError;
pub use mover::MovePlan;
pub use parse::{parse_chains, parse_chains_file, ParseError};
pub use pattern::{Matcher, PatternCache, PatternDiagnostic, StepMatch};
pub use render::render;
#[cfg(feature = "binary-cache")]
pub use serial::{
    decode_chains, encode_chains, source_digest_matches, DeserializeError, SerializeError,
};
pub use settings::{Settings, SettingsError};
pub use types::{
    match_name, match_tag, match_yaml, ChainIssue, ChainOutcome, ChainTrace, Destination,
    FileMetadata, Frontmatter, RoutingReport, Router, RuleChain, RuleStep, StepBuilder, StepKind,
    Value,
};
