use thiserror::Error;

use crate::parse::ParseError;

/// Unified error type covering notation parsing, snapshots, and I/O.
///
/// Tree edits never fail; they report "nothing happened" through their
/// return values instead.
#[derive(Debug, Error)]
pub enum WhenTreeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "snapshot")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "snapshot")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}
