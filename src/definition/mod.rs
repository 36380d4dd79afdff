//! Data-driven machine definitions.
//!
//! A [`MachineDefinition`] describes fields, states, transitions and the
//! entry state as plain data, so machines can be authored in JSON instead of
//! code. Behaviours are code, so a definition names them and a
//! [`BehaviorRegistry`] supplies the implementations.

use crate::builder::{StateMachineBuilder, TransitionBuilder};
use crate::command::CommandableStateMachine;
use crate::core::{Behavior, FieldValue, TransitionCondition};
use crate::machine::StateMachine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod error;

pub use error::DefinitionError;

type BehaviorFactory = Box<dyn Fn() -> Behavior>;

/// Named behaviour factories referenced by definitions.
#[derive(Default)]
pub struct BehaviorRegistry {
    factories: HashMap<String, BehaviorFactory>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory. Each state using the name gets a fresh behaviour.
    pub fn register<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Behavior + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn create(&self, name: &str) -> Option<Behavior> {
        self.factories.get(name).map(|factory| factory())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub default: FieldValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateDefinition {
    pub name: String,
    /// Registry key of the behaviour; states without one are passive
    #[serde(default)]
    pub behavior: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionDefinition {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub conditions: Vec<TransitionCondition>,
}

/// Serializable description of a state machine.
///
/// # Example
///
/// ```rust
/// use commandable_fsm::definition::{BehaviorRegistry, MachineDefinition};
///
/// let json = r#"{
///     "fields": [{ "name": "movementSpeed", "default": { "Float": 0.0 } }],
///     "states": [{ "name": "Idle" }, { "name": "Moving" }],
///     "transitions": [{
///         "from": "Idle",
///         "to": "Moving",
///         "conditions": [{
///             "kind": "Float",
///             "operator": "Greater",
///             "field": "movementSpeed",
///             "literal": { "Float": 0.0 }
///         }]
///     }],
///     "entry": "Idle"
/// }"#;
///
/// let definition = MachineDefinition::from_json(json).unwrap();
/// let mut machine = definition.build(&BehaviorRegistry::new()).unwrap();
/// machine.start().unwrap();
/// machine.set_float_field("movementSpeed", 1.0).unwrap();
/// machine.update(0.1).unwrap();
/// assert_eq!(machine.current_state_name(), Some("Moving"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineDefinition {
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    pub states: Vec<StateDefinition>,
    #[serde(default)]
    pub transitions: Vec<TransitionDefinition>,
    pub entry: String,
    #[serde(default)]
    pub history_capacity: Option<usize>,
}

impl MachineDefinition {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, DefinitionError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DefinitionError::Serialization(e.to_string()))
    }

    /// Translate into a builder, instantiating behaviours from the registry.
    pub fn into_builder(
        self,
        behaviors: &BehaviorRegistry,
    ) -> Result<StateMachineBuilder, DefinitionError> {
        let mut builder = StateMachineBuilder::new().entry(self.entry);
        if let Some(capacity) = self.history_capacity {
            builder = builder.history_capacity(capacity);
        }
        for field in self.fields {
            builder = builder.field(field.name, field.default);
        }
        for state in self.states {
            let behavior = match state.behavior {
                None => Behavior::default(),
                Some(key) => behaviors.create(&key).ok_or_else(|| {
                    DefinitionError::UnknownBehavior {
                        state: state.name.clone(),
                        behavior: key.clone(),
                    }
                })?,
            };
            builder = builder.state(state.name, behavior);
        }
        for transition in self.transitions {
            builder = builder.transition(
                transition.conditions.into_iter().fold(
                    TransitionBuilder::new().from(transition.from).to(transition.to),
                    TransitionBuilder::when,
                ),
            );
        }
        Ok(builder)
    }

    pub fn build(self, behaviors: &BehaviorRegistry) -> Result<StateMachine, DefinitionError> {
        Ok(self.into_builder(behaviors)?.build()?)
    }

    pub fn build_commandable(
        self,
        behaviors: &BehaviorRegistry,
    ) -> Result<CommandableStateMachine, DefinitionError> {
        Ok(self.into_builder(behaviors)?.build_commandable()?)
    }
}
