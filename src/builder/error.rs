//! Build errors for state machine and transition builders.

use crate::core::ConfigError;
use thiserror::Error;

/// Errors that can occur when building state machines and transitions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Entry state not specified. Call .entry(name) before .build()")]
    MissingEntryPoint,

    #[error("Transition source state not specified. Call .from(name)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(name)")]
    MissingToState,

    #[error("No state named '{name}'")]
    UnknownState { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{} configuration errors: {}", .0.len(), summarize(.0))]
    Multiple(Vec<BuildError>),
}

impl BuildError {
    /// Collapse accumulated errors, keeping a lone error as itself.
    pub(crate) fn from_errors(mut errors: Vec<BuildError>) -> Self {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            Self::Multiple(errors)
        }
    }

    /// Every individual error, flattening `Multiple`.
    pub fn errors(&self) -> Vec<&BuildError> {
        match self {
            Self::Multiple(errors) => errors.iter().flat_map(BuildError::errors).collect(),
            single => vec![single],
        }
    }
}

fn summarize(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
