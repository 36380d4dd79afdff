//! Commandable FSM: a field-driven finite state machine for game entities
//!
//! A machine owns typed fields, an arena of named states and the ordered,
//! condition-guarded transitions between them. The host drives it with one
//! `update(delta_time)` per tick; input reaches it as commands.
//!
//! # Core Concepts
//!
//! - **Fields**: named `int`/`float`/`bool` variables that guard transitions
//! - **Conditions**: one field, one operator, one literal
//! - **Transitions**: conditions AND-ed together; first satisfied wins
//! - **States**: lifecycle hooks supplied by pluggable behaviours
//! - **Commands**: user intents written to the `"command"` field and
//!   forwarded to commandable states
//!
//! # Example
//!
//! ```rust
//! use commandable_fsm::command::{Command, CommandArgs, Vec2};
//! use commandable_fsm::movement::{locomotion_machine, Movable, MOVEMENT_SPEED_FIELD};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! struct Body {
//!     velocity: Vec2,
//! }
//!
//! impl Movable for Body {
//!     fn move_in(&mut self, direction: Vec2) {
//!         self.velocity = direction;
//!     }
//! }
//!
//! let body = Rc::new(RefCell::new(Body { velocity: Vec2::ZERO }));
//! let mut machine = locomotion_machine(body.clone()).unwrap();
//! machine.start().unwrap();
//!
//! machine
//!     .process_command(Command::Move, &CommandArgs::Vector(Vec2::new(1.0, 0.0)))
//!     .unwrap();
//! let speed = body.borrow().velocity.length();
//! machine.set_float_field(MOVEMENT_SPEED_FIELD, speed).unwrap();
//! machine.update(0.016).unwrap();
//!
//! assert_eq!(machine.current_state_name(), Some("Moving"));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod command;
pub mod core;
pub mod definition;
pub mod machine;
pub mod movement;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder, TransitionBuilder};
pub use command::{Command, CommandArgs, CommandPipeline, CommandableStateMachine};
pub use core::{
    Behavior, ConfigError, FieldKind, FieldRegistry, FieldValue, Operator, StateId,
    StateTransition, TransitionCondition,
};
pub use machine::StateMachine;
