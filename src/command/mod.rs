//! Commands: abstract user intents and their payloads.
//!
//! Input arrives as named actions. The [`CommandPipeline`] maps recognised
//! names to a [`Command`] plus [`CommandArgs`] and notifies its observers;
//! a [`CommandableStateMachine`] consumes those pairs.

mod commandable;
mod pipeline;
mod queue;

pub use commandable::{CommandableStateMachine, COMMAND_FIELD};
pub use pipeline::{CommandPipeline, InputBindings, SubscriptionId};
pub use queue::{CommandQueue, QueuedCommand};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of commands an entity can receive.
///
/// The discriminant is the value written to the reserved `"command"` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum Command {
    #[default]
    None = 0,
    Move = 1,
    MoveCamera = 2,
    AttackConfirm = 3,
    Sheathe = 4,
    AbsorbStart = 5,
    AbsorbRelease = 6,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::None,
        Command::Move,
        Command::MoveCamera,
        Command::AttackConfirm,
        Command::Sheathe,
        Command::AbsorbStart,
        Command::AbsorbRelease,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Move => "Move",
            Self::MoveCamera => "MoveCamera",
            Self::AttackConfirm => "AttackConfirm",
            Self::Sheathe => "Sheathe",
            Self::AbsorbStart => "AbsorbStart",
            Self::AbsorbRelease => "AbsorbRelease",
        }
    }
}

impl From<Command> for i32 {
    fn from(command: Command) -> Self {
        command as i32
    }
}

/// An integer that does not encode any [`Command`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{0} is not a valid command encoding")]
pub struct UnknownCommand(pub i32);

impl TryFrom<i32> for Command {
    type Error = UnknownCommand;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Command::ALL
            .into_iter()
            .find(|command| i32::from(*command) == value)
            .ok_or(UnknownCommand(value))
    }
}

/// 2D direction or offset carried by movement commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// Typed payload of a command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CommandArgs {
    #[default]
    None,
    Vector(Vec2),
}

impl CommandArgs {
    pub fn vector(&self) -> Option<Vec2> {
        match self {
            Self::Vector(v) => Some(*v),
            Self::None => None,
        }
    }
}

impl From<Option<Vec2>> for CommandArgs {
    fn from(payload: Option<Vec2>) -> Self {
        payload.map_or(Self::None, Self::Vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_encoding_is_stable() {
        assert_eq!(i32::from(Command::None), 0);
        assert_eq!(i32::from(Command::Move), 1);
        assert_eq!(i32::from(Command::AbsorbRelease), 6);
    }

    #[test]
    fn every_command_decodes_from_its_encoding() {
        for command in Command::ALL {
            assert_eq!(Command::try_from(i32::from(command)), Ok(command));
        }
    }

    #[test]
    fn out_of_range_encoding_is_rejected() {
        assert_eq!(Command::try_from(7), Err(UnknownCommand(7)));
        assert_eq!(Command::try_from(-1), Err(UnknownCommand(-1)));
    }

    #[test]
    fn args_from_payload() {
        let args = CommandArgs::from(Some(Vec2::new(1.0, 0.0)));
        assert_eq!(args.vector(), Some(Vec2::new(1.0, 0.0)));
        assert_eq!(CommandArgs::from(None).vector(), None);
    }

    #[test]
    fn vector_length() {
        assert_eq!(Vec2::new(3.0, 4.0).length(), 5.0);
        assert_eq!(Vec2::ZERO.length(), 0.0);
    }
}
