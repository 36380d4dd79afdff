//! State machine that also reacts to commands.

use super::queue::QueuedCommand;
use super::{Command, CommandArgs, CommandQueue};
use crate::checkpoint::{Checkpoint, CheckpointError};
use crate::core::{
    Behavior, ConfigError, FieldKind, FieldRegistry, FieldValue, StateId, StateTransition,
};
use crate::machine::StateMachine;
use crossbeam_channel::Receiver;
use tracing::trace;

/// Reserved int field holding the last processed command.
pub const COMMAND_FIELD: &str = "command";

/// A [`StateMachine`] that accepts commands.
///
/// Every command is observed two ways:
/// 1. its integer encoding is written to the reserved [`COMMAND_FIELD`], so
///    transitions can be conditioned on the last command;
/// 2. it is forwarded to the current state if that state's behaviour is
///    [`Behavior::Commandable`].
///
/// # Example
///
/// ```rust
/// use commandable_fsm::command::{Command, CommandArgs, CommandableStateMachine};
/// use commandable_fsm::core::{Behavior, Operator, StateTransition, TransitionCondition};
///
/// let mut machine = CommandableStateMachine::new();
/// let sheathed = machine.add_state("Sheathed", Behavior::default()).unwrap();
/// let armed = machine.add_state("Armed", Behavior::default()).unwrap();
/// machine
///     .add_transition(StateTransition::new(sheathed, armed).when(TransitionCondition::int(
///         "command",
///         Operator::Equal,
///         Command::AttackConfirm.into(),
///     )))
///     .unwrap();
/// machine.set_entry_point(sheathed).unwrap();
/// machine.start().unwrap();
///
/// machine.process_command(Command::AttackConfirm, &CommandArgs::None).unwrap();
/// assert_eq!(machine.update(0.016).unwrap(), Some(armed));
/// ```
#[derive(Debug)]
pub struct CommandableStateMachine {
    machine: StateMachine,
    queue: CommandQueue,
    commands: Receiver<QueuedCommand>,
}

impl Default for CommandableStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandableStateMachine {
    pub fn new() -> Self {
        let fields = FieldRegistry::with_field(COMMAND_FIELD, FieldValue::Int(Command::None.into()));
        Self::wrap(StateMachine::with_fields(fields))
    }

    /// Wrap an assembled machine, registering the reserved command field.
    ///
    /// Fails if the machine already has a field with that name.
    pub fn from_machine(mut machine: StateMachine) -> Result<Self, ConfigError> {
        machine.register_int_field(COMMAND_FIELD, Command::None.into())?;
        Ok(Self::wrap(machine))
    }

    fn wrap(machine: StateMachine) -> Self {
        let (queue, commands) = CommandQueue::channel();
        Self {
            machine,
            queue,
            commands,
        }
    }

    /// Record a command and hand it to the current state.
    ///
    /// The command field is written even when no state is current or the
    /// current state cannot handle commands. Returns whether a state handled it.
    pub fn process_command(
        &mut self,
        command: Command,
        args: &CommandArgs,
    ) -> Result<bool, ConfigError> {
        self.machine
            .fields_mut()
            .set_int_field(COMMAND_FIELD, command.into())?;
        let handled = self.machine.dispatch_command(command, args);
        trace!(?command, handled, "command processed");
        Ok(handled)
    }

    /// The last processed command, `Command::None` until one arrives.
    pub fn last_command(&self) -> Command {
        self.machine
            .fields()
            .int_field(COMMAND_FIELD)
            .ok()
            .and_then(|value| Command::try_from(value).ok())
            .unwrap_or_default()
    }

    /// Producer handle for this machine's command queue.
    ///
    /// Queued commands are applied at the start of the next `update`.
    pub fn command_queue(&self) -> CommandQueue {
        self.queue.clone()
    }

    /// Apply queued commands, then advance one tick.
    pub fn update(&mut self, delta_time: f32) -> Result<Option<StateId>, ConfigError> {
        let pending: Vec<QueuedCommand> = self.commands.try_iter().collect();
        for (command, args) in pending {
            self.process_command(command, &args)?;
        }
        self.machine.update(delta_time)
    }

    pub fn start(&mut self) -> Result<(), ConfigError> {
        self.machine.start()
    }

    pub fn shutdown(&mut self) -> bool {
        self.machine.shutdown()
    }

    pub fn interrupt_to(&mut self, target: StateId) -> Result<(), ConfigError> {
        self.machine.interrupt_to(target)
    }

    pub fn add_state(
        &mut self,
        name: impl Into<String>,
        behavior: Behavior,
    ) -> Result<StateId, ConfigError> {
        self.machine.add_state(name, behavior)
    }

    pub fn add_transition(&mut self, transition: StateTransition) -> Result<(), ConfigError> {
        self.machine.add_transition(transition)
    }

    pub fn set_entry_point(&mut self, id: StateId) -> Result<(), ConfigError> {
        self.machine.set_entry_point(id)
    }

    pub fn register_int_field(&mut self, name: &str, default: i32) -> Result<(), ConfigError> {
        self.machine.register_int_field(name, default)
    }

    pub fn register_float_field(&mut self, name: &str, default: f32) -> Result<(), ConfigError> {
        self.machine.register_float_field(name, default)
    }

    pub fn register_bool_field(&mut self, name: &str, default: bool) -> Result<(), ConfigError> {
        self.machine.register_bool_field(name, default)
    }

    pub fn set_int_field(&mut self, name: &str, value: i32) -> Result<(), ConfigError> {
        self.machine.set_int_field(name, value)
    }

    pub fn set_float_field(&mut self, name: &str, value: f32) -> Result<(), ConfigError> {
        self.machine.set_float_field(name, value)
    }

    pub fn set_bool_field(&mut self, name: &str, value: bool) -> Result<(), ConfigError> {
        self.machine.set_bool_field(name, value)
    }

    pub fn get_field(&self, name: &str) -> Result<(FieldKind, FieldValue), ConfigError> {
        self.machine.get_field(name)
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.machine.current_state()
    }

    pub fn current_state_name(&self) -> Option<&str> {
        self.machine.current_state_name()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.machine.checkpoint()
    }

    pub fn resume(&mut self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        self.machine.resume(checkpoint)
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut StateMachine {
        &mut self.machine
    }
}
