//! Directed, condition-guarded edges between states.

use super::condition::TransitionCondition;
use super::error::ConfigError;
use super::field::FieldRegistry;
use super::state::StateId;
use serde::{Deserialize, Serialize};

/// Edge from `source` to `target`, guarded by a conjunction of conditions.
///
/// A transition with no conditions is unconditional and fires whenever it is
/// evaluated. Register it last among a state's transitions or it will starve
/// the ones after it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    source: StateId,
    target: StateId,
    conditions: Vec<TransitionCondition>,
}

impl StateTransition {
    pub fn new(source: StateId, target: StateId) -> Self {
        Self {
            source,
            target,
            conditions: Vec::new(),
        }
    }

    /// Add a condition. Conditions are AND-ed in insertion order.
    pub fn when(mut self, condition: TransitionCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_conditions(mut self, conditions: impl IntoIterator<Item = TransitionCondition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    pub fn source(&self) -> StateId {
        self.source
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    pub fn conditions(&self) -> &[TransitionCondition] {
        &self.conditions
    }

    pub fn is_unconditional(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Validate every condition against the registry, stopping at the first error.
    pub fn validate(&self, fields: &FieldRegistry) -> Result<(), ConfigError> {
        self.conditions
            .iter()
            .try_for_each(|condition| condition.validate(fields))
    }

    /// True when every condition holds. Short-circuits on the first false one.
    pub fn is_satisfied(&self, fields: &FieldRegistry) -> Result<bool, ConfigError> {
        for condition in &self.conditions {
            if !condition.evaluate(fields)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
