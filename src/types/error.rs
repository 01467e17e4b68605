use thiserror::Error;

/// A configuration problem found by [`Router::check()`](crate::Router::check).
///
/// Findings are advisory: evaluation never fails because of them, but the
/// affected step or chain will not behave the way its author likely intended.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainIssue {
    #[error("chain '{chain}' step {step}: invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        chain: String,
        step: usize,
        pattern: String,
        message: String,
    },

    #[error("chain '{chain}' step {step}: yaml step has no key and will never match")]
    MissingKey { chain: String, step: usize },

    #[error(
        "chain '{chain}' step {step}: folder uses '{placeholder}' but the pattern has {groups} capture group(s)"
    )]
    UnboundPlaceholder {
        chain: String,
        step: usize,
        placeholder: String,
        groups: usize,
    },

    /// A placeholder past the last group whose prefix names a real group,
    /// such as `$10` with fewer than ten groups: the `$1` pass rewrites it.
    #[error(
        "chain '{chain}' step {step}: folder uses '{placeholder}' but the pattern has {groups} capture group(s), so '{shadowed_by}' is substituted into its prefix"
    )]
    ShadowedPlaceholder {
        chain: String,
        step: usize,
        placeholder: String,
        shadowed_by: String,
        groups: usize,
    },

    #[error("chain '{chain}' has no steps and can never produce a destination")]
    EmptyChain { chain: String },
}
