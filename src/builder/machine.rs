//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::command::CommandableStateMachine;
use crate::core::{Behavior, FieldValue};
use crate::machine::StateMachine;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<BuildError>>;

/// Builder for assembling state machines with a fluent API.
///
/// Assembly happens in a fixed order regardless of call order: fields, then
/// states, then transitions, then the entry point. `build` reports every
/// configuration error it finds rather than stopping at the first one.
///
/// # Example
///
/// ```rust
/// use commandable_fsm::builder::{StateMachineBuilder, TransitionBuilder};
/// use commandable_fsm::core::Behavior;
/// use commandable_fsm::condition;
///
/// let machine = StateMachineBuilder::new()
///     .float_field("movementSpeed", 0.0)
///     .state("Idle", Behavior::default())
///     .state("Moving", Behavior::default())
///     .transition(
///         TransitionBuilder::new()
///             .from("Idle")
///             .to("Moving")
///             .when(condition!(float "movementSpeed" > 0.0)),
///     )
///     .entry("Idle")
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.states().count(), 2);
/// ```
#[derive(Default)]
pub struct StateMachineBuilder {
    fields: Vec<(String, FieldValue)>,
    states: Vec<(String, Behavior)>,
    transitions: Vec<TransitionBuilder>,
    entry: Option<String>,
    history_capacity: Option<usize>,
}

impl StateMachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn int_field(self, name: impl Into<String>, default: i32) -> Self {
        self.field(name, FieldValue::Int(default))
    }

    pub fn float_field(self, name: impl Into<String>, default: f32) -> Self {
        self.field(name, FieldValue::Float(default))
    }

    pub fn bool_field(self, name: impl Into<String>, default: bool) -> Self {
        self.field(name, FieldValue::Bool(default))
    }

    /// Register a field with a tagged default.
    pub fn field(mut self, name: impl Into<String>, default: FieldValue) -> Self {
        self.fields.push((name.into(), default));
        self
    }

    /// Add a state. Names must be unique.
    pub fn state(mut self, name: impl Into<String>, behavior: Behavior) -> Self {
        self.states.push((name.into(), behavior));
        self
    }

    /// Add a transition. Transitions leaving the same state are evaluated in
    /// the order they are added.
    pub fn transition(mut self, transition: TransitionBuilder) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: impl IntoIterator<Item = TransitionBuilder>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Set the entry state (required).
    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    /// Bound the transition history.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    /// Build a plain state machine.
    pub fn build(self) -> Result<StateMachine, BuildError> {
        let mut machine = self.empty_machine();
        self.assemble_into(&mut machine)?;
        Ok(machine)
    }

    /// Build a machine that accepts commands.
    ///
    /// The reserved `"command"` field is registered before any declared
    /// field, so declaring it again is reported as a duplicate.
    pub fn build_commandable(self) -> Result<CommandableStateMachine, BuildError> {
        let mut machine = CommandableStateMachine::from_machine(self.empty_machine())?;
        self.assemble_into(machine.machine_mut())?;
        Ok(machine)
    }

    fn empty_machine(&self) -> StateMachine {
        match self.history_capacity {
            Some(capacity) => StateMachine::with_history_capacity(capacity),
            None => StateMachine::new(),
        }
    }

    fn assemble_into(self, machine: &mut StateMachine) -> Result<(), BuildError> {
        let entry = self.entry.ok_or(BuildError::MissingEntryPoint)?;
        let mut checks: Vec<Check> = Vec::new();

        for (name, default) in &self.fields {
            checks.push(check(machine.fields_mut().register(name, *default)));
        }
        for (name, behavior) in self.states {
            checks.push(check(machine.add_state(name, behavior).map(|_| ())));
        }
        for transition in self.transitions {
            let added = transition
                .build(machine)
                .and_then(|t| machine.add_transition(t).map_err(BuildError::from));
            checks.push(check(added));
        }
        let entry = machine
            .state_id(&entry)
            .ok_or(BuildError::UnknownState { name: entry })
            .and_then(|id| machine.set_entry_point(id).map_err(BuildError::from));
        checks.push(check(entry));

        // Accumulate ALL failures using all_vec
        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(BuildError::from_errors(
                errors.iter().cloned().collect(),
            )),
        }
    }
}

fn check<E: Into<BuildError>>(result: Result<(), E>) -> Check {
    match result {
        Ok(()) => Validation::success(()),
        Err(error) => Validation::fail(error.into()),
    }
}
