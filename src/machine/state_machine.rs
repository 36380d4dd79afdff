//! Tick-driven state machine over an arena of states.

use crate::checkpoint::{Checkpoint, CheckpointError, CHECKPOINT_VERSION};
use crate::command::{Command, CommandArgs};
use crate::core::{
    Behavior, ConfigError, FieldKind, FieldRegistry, FieldValue, State, StateId, StateTransition,
    TransitionHistory, TransitionKind, TransitionRecord,
};
use chrono::Utc;
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Lifecycle phase of a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MachineStatus {
    /// `start` has not been called; the entry point may still change
    Assembling,
    /// `start` has been called; exactly one state is current
    Running,
    /// `shutdown` has been called
    Stopped,
}

/// Finite state machine driven by an external tick.
///
/// The machine owns its fields and states. States live in an arena and are
/// referenced by [`StateId`]; transitions store ids rather than references.
///
/// Each [`update`](Self::update) updates the current state, then evaluates its
/// outgoing transitions in registration order and fires the first one whose
/// conditions all hold. At most one transition fires per tick.
///
/// Fields, states and transitions can be added in any [`MachineStatus`];
/// additions made while running are seen by the next update.
///
/// # Example
///
/// ```rust
/// use commandable_fsm::core::{Behavior, Operator, StateTransition, TransitionCondition};
/// use commandable_fsm::machine::StateMachine;
///
/// let mut machine = StateMachine::new();
/// machine.register_float_field("movementSpeed", 0.0).unwrap();
/// let idle = machine.add_state("Idle", Behavior::default()).unwrap();
/// let moving = machine.add_state("Moving", Behavior::default()).unwrap();
/// machine
///     .add_transition(StateTransition::new(idle, moving).when(TransitionCondition::float(
///         "movementSpeed",
///         Operator::Greater,
///         0.0,
///     )))
///     .unwrap();
/// machine.set_entry_point(idle).unwrap();
/// machine.start().unwrap();
///
/// machine.set_float_field("movementSpeed", 5.0).unwrap();
/// assert_eq!(machine.update(0.1).unwrap(), Some(moving));
/// assert_eq!(machine.current_state_name(), Some("Moving"));
/// ```
#[derive(Debug)]
pub struct StateMachine {
    fields: FieldRegistry,
    states: Vec<State>,
    entry_point: Option<StateId>,
    current: Option<StateId>,
    status: MachineStatus,
    history: TransitionHistory,
    tick: u64,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self::assemble(FieldRegistry::new(), TransitionHistory::new())
    }

    /// Keep at most `capacity` transition records.
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self::assemble(FieldRegistry::new(), TransitionHistory::with_capacity(capacity))
    }

    /// Start assembly from an already populated registry.
    pub fn with_fields(fields: FieldRegistry) -> Self {
        Self::assemble(fields, TransitionHistory::new())
    }

    fn assemble(fields: FieldRegistry, history: TransitionHistory) -> Self {
        Self {
            fields,
            states: Vec::new(),
            entry_point: None,
            current: None,
            status: MachineStatus::Assembling,
            history,
            tick: 0,
        }
    }

    pub fn register_int_field(&mut self, name: &str, default: i32) -> Result<(), ConfigError> {
        self.fields.register_int_field(name, default)
    }

    pub fn register_float_field(&mut self, name: &str, default: f32) -> Result<(), ConfigError> {
        self.fields.register_float_field(name, default)
    }

    pub fn register_bool_field(&mut self, name: &str, default: bool) -> Result<(), ConfigError> {
        self.fields.register_bool_field(name, default)
    }

    pub fn set_int_field(&mut self, name: &str, value: i32) -> Result<(), ConfigError> {
        self.fields.set_int_field(name, value)
    }

    pub fn set_float_field(&mut self, name: &str, value: f32) -> Result<(), ConfigError> {
        self.fields.set_float_field(name, value)
    }

    pub fn set_bool_field(&mut self, name: &str, value: bool) -> Result<(), ConfigError> {
        self.fields.set_bool_field(name, value)
    }

    pub fn get_field(&self, name: &str) -> Result<(FieldKind, FieldValue), ConfigError> {
        self.fields.get_field(name)
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    /// Add a state to the arena. Names are unique per machine.
    pub fn add_state(
        &mut self,
        name: impl Into<String>,
        behavior: Behavior,
    ) -> Result<StateId, ConfigError> {
        let name = name.into();
        if self.state_id(&name).is_some() {
            return Err(ConfigError::DuplicateState { name });
        }
        let id = StateId(self.states.len());
        self.states.push(State::new(id, name, behavior));
        Ok(id)
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index())
    }

    /// Look a state up by name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .find(|state| state.name() == name)
            .map(State::id)
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    /// Append a transition to its source state.
    ///
    /// Both endpoints must exist and every condition must name a registered
    /// field of the declared kind, so register fields first.
    pub fn add_transition(&mut self, transition: StateTransition) -> Result<(), ConfigError> {
        self.check_state(transition.target())?;
        self.check_state(transition.source())?;
        transition.validate(&self.fields)?;
        self.states[transition.source().index()].add_transition(transition)
    }

    pub fn set_entry_point(&mut self, id: StateId) -> Result<(), ConfigError> {
        if self.status != MachineStatus::Assembling {
            return Err(ConfigError::EntryPointAfterStart);
        }
        self.check_state(id)?;
        self.entry_point = Some(id);
        Ok(())
    }

    pub fn entry_point(&self) -> Option<StateId> {
        self.entry_point
    }

    /// Enter the entry point. May only be called once.
    pub fn start(&mut self) -> Result<(), ConfigError> {
        match self.status {
            MachineStatus::Running => return Err(ConfigError::AlreadyStarted),
            MachineStatus::Stopped => return Err(ConfigError::Stopped),
            MachineStatus::Assembling => {}
        }
        let entry = self.entry_point.ok_or(ConfigError::MissingEntryPoint)?;

        self.status = MachineStatus::Running;
        self.enter(entry, None, TransitionKind::Start);
        debug!(state = self.states[entry.index()].name(), "state machine started");
        Ok(())
    }

    /// Advance one tick.
    ///
    /// Returns the state entered if a transition fired. Before `start` and
    /// after `shutdown` this does nothing.
    pub fn update(&mut self, delta_time: f32) -> Result<Option<StateId>, ConfigError> {
        debug_assert!(delta_time >= 0.0, "delta_time must be non-negative");
        let Some(current) = self.running_state() else {
            return Ok(None);
        };
        self.tick += 1;

        self.states[current.index()]
            .behavior_mut()
            .update(delta_time, &mut self.fields);

        let Some(target) = self.first_satisfied(current)? else {
            return Ok(None);
        };

        self.states[current.index()]
            .behavior_mut()
            .exit(&mut self.fields);
        self.enter(target, Some(current), TransitionKind::Fired);
        debug!(
            from = self.states[current.index()].name(),
            to = self.states[target.index()].name(),
            tick = self.tick,
            "transition fired"
        );
        Ok(Some(target))
    }

    /// Leave the current state abnormally and enter `target`.
    ///
    /// The current state receives `interrupt` instead of `exit`.
    pub fn interrupt_to(&mut self, target: StateId) -> Result<(), ConfigError> {
        self.check_state(target)?;
        let current = match self.status {
            MachineStatus::Assembling => return Err(ConfigError::NotStarted),
            MachineStatus::Stopped => return Err(ConfigError::Stopped),
            MachineStatus::Running => self.current.ok_or(ConfigError::NotStarted)?,
        };

        warn!(
            from = self.states[current.index()].name(),
            to = self.states[target.index()].name(),
            "state interrupted"
        );
        self.states[current.index()]
            .behavior_mut()
            .interrupt(&mut self.fields);
        self.enter(target, Some(current), TransitionKind::Interrupted);
        Ok(())
    }

    /// Tear the machine down, interrupting the current state.
    ///
    /// Returns `false` if the machine was not running.
    pub fn shutdown(&mut self) -> bool {
        let Some(current) = self.running_state() else {
            return false;
        };
        self.states[current.index()]
            .behavior_mut()
            .interrupt(&mut self.fields);
        self.current = None;
        self.status = MachineStatus::Stopped;
        debug!(state = self.states[current.index()].name(), "state machine shut down");
        true
    }

    pub fn status(&self) -> MachineStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == MachineStatus::Running
    }

    /// `None` before `start` and after `shutdown`.
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    pub fn current_state_name(&self) -> Option<&str> {
        self.current
            .and_then(|id| self.state(id))
            .map(State::name)
    }

    /// Number of updates processed while running.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    /// Forward a command to the current state if it can handle commands.
    ///
    /// Returns whether a handler received it.
    pub(crate) fn dispatch_command(&mut self, command: Command, args: &CommandArgs) -> bool {
        let Some(current) = self.running_state() else {
            return false;
        };
        let state = &mut self.states[current.index()];
        match state.behavior_mut().command_handler() {
            Some(handler) => {
                handler.process_command(command, args, &mut self.fields);
                true
            }
            None => {
                trace!(?command, "current state does not handle commands");
                false
            }
        }
    }

    pub(crate) fn fields_mut(&mut self) -> &mut FieldRegistry {
        &mut self.fields
    }

    /// Snapshot fields, current state and history.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            current_state: self.current_state_name().map(str::to_string),
            tick: self.tick,
            fields: self
                .fields
                .iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            history: self.history.clone(),
        }
    }

    /// Restore a checkpoint into a freshly assembled machine.
    ///
    /// The machine must not have been started. Field values are restored and,
    /// if the checkpoint recorded a current state, that state is entered and
    /// the machine starts running from it.
    pub fn resume(&mut self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        checkpoint.check_version()?;
        if self.status != MachineStatus::Assembling {
            return Err(CheckpointError::ValidationFailed(
                "cannot resume a machine that has already started".to_string(),
            ));
        }

        for (name, value) in &checkpoint.fields {
            let (kind, _) = self.fields.get_field(name)?;
            if kind != value.kind() {
                return Err(ConfigError::FieldKindMismatch {
                    name: name.clone(),
                    expected: kind,
                    found: value.kind(),
                }
                .into());
            }
        }
        let resumed = checkpoint
            .current_state
            .as_deref()
            .map(|name| {
                self.state_id(name).ok_or_else(|| {
                    CheckpointError::ValidationFailed(format!("unknown state '{name}'"))
                })
            })
            .transpose()?;

        for (name, value) in &checkpoint.fields {
            self.fields.set(name, *value)?;
        }
        self.tick = checkpoint.tick;
        let capacity = self.history.capacity();
        self.history = TransitionHistory::with_capacity(capacity);
        for record in checkpoint.history.iter() {
            self.history.record(record.clone());
        }

        if let Some(state) = resumed {
            self.status = MachineStatus::Running;
            self.enter(state, None, TransitionKind::Start);
            debug!(state = self.states[state.index()].name(), tick = self.tick, "state machine resumed");
        }
        Ok(())
    }

    fn running_state(&self) -> Option<StateId> {
        match self.status {
            MachineStatus::Running => self.current,
            MachineStatus::Assembling | MachineStatus::Stopped => None,
        }
    }

    fn first_satisfied(&self, current: StateId) -> Result<Option<StateId>, ConfigError> {
        for transition in self.states[current.index()].transitions() {
            if transition.is_satisfied(&self.fields)? {
                return Ok(Some(transition.target()));
            }
        }
        Ok(None)
    }

    fn enter(&mut self, target: StateId, from: Option<StateId>, kind: TransitionKind) {
        self.current = Some(target);
        self.history.record(TransitionRecord {
            from: from.map(|id| self.states[id.index()].name().to_string()),
            to: self.states[target.index()].name().to_string(),
            kind,
            tick: self.tick,
            timestamp: Utc::now(),
        });
        self.states[target.index()]
            .behavior_mut()
            .enter(&mut self.fields);
    }

    fn check_state(&self, id: StateId) -> Result<(), ConfigError> {
        if id.index() < self.states.len() {
            Ok(())
        } else {
            Err(ConfigError::UnknownState { id: id.index() })
        }
    }
}

impl Drop for StateMachine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
