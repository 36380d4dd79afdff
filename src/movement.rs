//! Idle/moving locomotion for a player-controlled entity.
//!
//! Both states push `Move` commands straight into the movement actuator.
//! The actuator reports the resulting speed by writing the
//! [`MOVEMENT_SPEED_FIELD`], which drives the Idle ⇄ Moving transitions.

use crate::command::{Command, CommandArgs, CommandableStateMachine, Vec2};
use crate::core::{
    Behavior, CommandHandler, ConfigError, FieldRegistry, Operator, StateBehavior,
    StateTransition, TransitionCondition,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;

/// Float field holding the entity's current speed.
pub const MOVEMENT_SPEED_FIELD: &str = "movementSpeed";

/// Something that can be moved in a direction: a rigidbody, a character
/// controller, a test double.
pub trait Movable {
    fn move_in(&mut self, direction: Vec2);
}

/// Actuator shared between the host and the states that drive it.
pub type SharedMovable = Rc<RefCell<dyn Movable>>;

fn forward_move(movable: &SharedMovable, command: Command, args: &CommandArgs) {
    if command != Command::Move {
        return;
    }
    if let Some(direction) = args.vector() {
        movable.borrow_mut().move_in(direction);
    }
}

/// Standing still; starts moving the actuator on `Move`.
pub struct IdleState {
    movable: SharedMovable,
}

impl IdleState {
    pub fn new(movable: SharedMovable) -> Self {
        Self { movable }
    }
}

impl StateBehavior for IdleState {}

impl CommandHandler for IdleState {
    fn process_command(&mut self, command: Command, args: &CommandArgs, _fields: &mut FieldRegistry) {
        forward_move(&self.movable, command, args);
    }
}

/// Moving; keeps steering the actuator and halts it when interrupted.
pub struct MovingState {
    movable: SharedMovable,
}

impl MovingState {
    pub fn new(movable: SharedMovable) -> Self {
        Self { movable }
    }
}

impl StateBehavior for MovingState {
    /// Halts the actuator. Also runs when the machine is dropped, so an
    /// actuator the host is still borrowing is skipped rather than panicking.
    fn interrupt(&mut self, _fields: &mut FieldRegistry) {
        match self.movable.try_borrow_mut() {
            Ok(mut movable) => movable.move_in(Vec2::ZERO),
            Err(_) => warn!("movement actuator busy, not halted on interrupt"),
        }
    }
}

impl CommandHandler for MovingState {
    fn process_command(&mut self, command: Command, args: &CommandArgs, _fields: &mut FieldRegistry) {
        forward_move(&self.movable, command, args);
    }
}

/// Assemble the Idle ⇄ Moving machine around an actuator.
///
/// Entry is `Idle`. `Idle → Moving` when speed > 0, `Moving → Idle` when
/// speed == 0.
pub fn locomotion_machine(movable: SharedMovable) -> Result<CommandableStateMachine, ConfigError> {
    let mut machine = CommandableStateMachine::new();
    machine.register_float_field(MOVEMENT_SPEED_FIELD, 0.0)?;

    let idle = machine.add_state("Idle", Behavior::commandable(IdleState::new(Rc::clone(&movable))))?;
    let moving = machine.add_state("Moving", Behavior::commandable(MovingState::new(movable)))?;

    machine.add_transition(StateTransition::new(idle, moving).when(TransitionCondition::float(
        MOVEMENT_SPEED_FIELD,
        Operator::Greater,
        0.0,
    )))?;
    machine.add_transition(StateTransition::new(moving, idle).when(TransitionCondition::float(
        MOVEMENT_SPEED_FIELD,
        Operator::Equal,
        0.0,
    )))?;
    machine.set_entry_point(idle)?;
    Ok(machine)
}
