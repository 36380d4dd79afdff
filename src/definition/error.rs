//! Definition loading errors.

use crate::builder::BuildError;
use thiserror::Error;

/// Errors that can occur when turning a definition into a machine.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The document is not a valid definition
    #[error("Failed to parse machine definition: {0}")]
    Parse(String),

    /// The definition could not be written out
    #[error("Failed to serialize machine definition: {0}")]
    Serialization(String),

    /// A state names a behaviour nobody registered
    #[error("State '{state}' uses unregistered behavior '{behavior}'")]
    UnknownBehavior { state: String, behavior: String },

    /// The definition parsed but describes an invalid machine
    #[error(transparent)]
    Build(#[from] BuildError),
}
