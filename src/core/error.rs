//! Configuration errors raised while assembling or driving a state machine.
//!
//! Every variant indicates a wiring bug in the host. None of them are
//! recovered from at runtime.

use super::condition::Operator;
use super::field::FieldKind;
use thiserror::Error;

/// Errors caused by an invalid machine configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Field '{name}' is already registered")]
    DuplicateField { name: String },

    #[error("Field '{name}' is not registered")]
    UnknownField { name: String },

    #[error("Field '{name}' is {found:?}, expected {expected:?}")]
    FieldKindMismatch {
        name: String,
        expected: FieldKind,
        found: FieldKind,
    },

    #[error("Operator {operator:?} cannot be applied to {kind:?} fields")]
    InvalidOperator { operator: Operator, kind: FieldKind },

    #[error("Condition on '{field}' declares {declared:?} but its literal is {literal:?}")]
    LiteralKindMismatch {
        field: String,
        declared: FieldKind,
        literal: FieldKind,
    },

    #[error("State '{name}' is already defined")]
    DuplicateState { name: String },

    #[error("State id {id} does not exist in this machine")]
    UnknownState { id: usize },

    #[error("Transition from state {source_id} was added to state {owner}")]
    TransitionSourceMismatch { source_id: usize, owner: usize },

    #[error("Entry point cannot change after the machine has started")]
    EntryPointAfterStart,

    #[error("Entry point not set. Call set_entry_point() before start()")]
    MissingEntryPoint,

    #[error("State machine has not been started")]
    NotStarted,

    #[error("State machine is already running")]
    AlreadyStarted,

    #[error("State machine has been shut down")]
    Stopped,
}
