mod error;
mod grammar;

use std::path::Path;

pub use error::ParseError;

use crate::RuleChain;

/// Parse rule chains written in the chain notation.
///
/// ```
/// let chains = automover::parse_chains(r#"
/// chain "Journal":
///     name "^(\d{4})-" -> "Journal/$1"
/// "#).unwrap();
/// assert_eq!(chains[0].steps[0].pattern, r"^(\d{4})-");
/// ```
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid notation.
pub fn parse_chains(input: &str) -> Result<Vec<RuleChain>, ParseError> {
    use winnow::Parser;
    grammar::parse_chain_list
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}

/// Read a file and parse the rule chains it contains.
///
/// # Errors
///
/// Returns [`AutomoverError`](crate::AutomoverError) on I/O or parse failure.
pub fn parse_chains_file(path: impl AsRef<Path>) -> Result<Vec<RuleChain>, crate::AutomoverError> {
    let input = std::fs::read_to_string(path)?;
    Ok(parse_chains(&input)?)
}
