//! Core state machine types.
//!
//! This module contains the building blocks the machine is assembled from:
//! - Typed fields and their registry
//! - Conditions over a single field
//! - States, their behaviours and outgoing transitions
//! - Bounded transition history
//!
//! Nothing here drives a tick; see [`crate::machine`] for that.

mod condition;
mod error;
mod field;
mod history;
mod state;
mod transition;

pub use condition::{Operator, TransitionCondition};
pub use error::ConfigError;
pub use field::{FieldKind, FieldRegistry, FieldValue};
pub use history::{TransitionHistory, TransitionKind, TransitionRecord, DEFAULT_HISTORY_CAPACITY};
pub use state::{Behavior, CommandHandler, Passive, State, StateBehavior, StateId};
pub use transition::StateTransition;
