use thiserror::Error;

use crate::parse::ParseError;
use crate::settings::SettingsError;

/// Unified error type covering notation parsing, settings and I/O.
///
/// Returned by convenience entry points like
/// [`parse_chains_file()`](crate::parse_chains_file). The matching engine
/// itself never fails; see [`Router`](crate::Router).
#[derive(Debug, Error)]
pub enum AutomoverError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}
