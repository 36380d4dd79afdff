//! Builder for constructing state transitions by state name.

use crate::builder::error::BuildError;
use crate::core::{ConfigError, StateId, StateTransition, TransitionCondition};
use crate::machine::StateMachine;

/// Builder for constructing transitions with a fluent API.
///
/// States are referenced by name and resolved when the owning machine is
/// built, so transitions can be declared before or after their states.
#[derive(Clone, Debug, Default)]
pub struct TransitionBuilder {
    from: Option<String>,
    to: Option<String>,
    conditions: Vec<TransitionCondition>,
    rejected: Vec<ConfigError>,
}

impl TransitionBuilder {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source state (required).
    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.from = Some(state.into());
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.to = Some(state.into());
        self
    }

    /// Add a condition. All conditions must hold for the transition to fire.
    pub fn when(mut self, condition: TransitionCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a condition whose construction may have failed.
    ///
    /// The error is kept and reported by `build`.
    pub fn try_when(mut self, condition: Result<TransitionCondition, ConfigError>) -> Self {
        match condition {
            Ok(condition) => self.conditions.push(condition),
            Err(error) => self.rejected.push(error),
        }
        self
    }

    /// Resolve state names against a machine and build the transition.
    pub fn build(self, machine: &StateMachine) -> Result<StateTransition, BuildError> {
        if let Some(error) = self.rejected.into_iter().next() {
            return Err(error.into());
        }
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;
        let source = resolve(machine, from)?;
        let target = resolve(machine, to)?;

        Ok(StateTransition::new(source, target).with_conditions(self.conditions))
    }
}

fn resolve(machine: &StateMachine, name: String) -> Result<StateId, BuildError> {
    machine
        .state_id(&name)
        .ok_or(BuildError::UnknownState { name })
}
