//! States and the behaviours plugged into them.
//!
//! A [`State`] is a named arena node: it owns its outgoing transitions and a
//! [`Behavior`] that reacts to lifecycle calls. Behaviours are strategy
//! objects rather than subclasses, and the command-handling capability is a
//! tag on [`Behavior`] that the machine checks before dispatching.

use super::error::ConfigError;
use super::field::FieldRegistry;
use super::transition::StateTransition;
use crate::command::{Command, CommandArgs};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a state inside its machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle hooks of a state.
///
/// All hooks default to doing nothing. They receive the owning machine's
/// fields so a state can read its inputs or publish values of its own.
///
/// `interrupt` replaces `exit` when the state is left abnormally: the machine
/// is shut down or forced into another state without a transition firing.
pub trait StateBehavior {
    fn enter(&mut self, _fields: &mut FieldRegistry) {}

    fn exit(&mut self, _fields: &mut FieldRegistry) {}

    fn interrupt(&mut self, _fields: &mut FieldRegistry) {}

    fn update(&mut self, _delta_time: f32, _fields: &mut FieldRegistry) {}
}

/// Behaviour that also reacts directly to commands while its state is current.
pub trait CommandHandler: StateBehavior {
    fn process_command(&mut self, command: Command, args: &CommandArgs, fields: &mut FieldRegistry);
}

/// Behaviour with no hooks, for states that only route transitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passive;

impl StateBehavior for Passive {}

/// Capability-tagged behaviour of a state.
pub enum Behavior {
    Plain(Box<dyn StateBehavior>),
    Commandable(Box<dyn CommandHandler>),
}

impl Behavior {
    pub fn plain(behavior: impl StateBehavior + 'static) -> Self {
        Self::Plain(Box::new(behavior))
    }

    pub fn commandable(behavior: impl CommandHandler + 'static) -> Self {
        Self::Commandable(Box::new(behavior))
    }

    pub fn is_commandable(&self) -> bool {
        matches!(self, Self::Commandable(_))
    }

    /// The command-handling capability, if this behaviour has it.
    pub fn command_handler(&mut self) -> Option<&mut dyn CommandHandler> {
        match self {
            Self::Plain(_) => None,
            Self::Commandable(handler) => {
                let handler: &mut dyn CommandHandler = handler.as_mut();
                Some(handler)
            }
        }
    }

    pub(crate) fn enter(&mut self, fields: &mut FieldRegistry) {
        match self {
            Self::Plain(b) => b.enter(fields),
            Self::Commandable(b) => b.enter(fields),
        }
    }

    pub(crate) fn exit(&mut self, fields: &mut FieldRegistry) {
        match self {
            Self::Plain(b) => b.exit(fields),
            Self::Commandable(b) => b.exit(fields),
        }
    }

    pub(crate) fn interrupt(&mut self, fields: &mut FieldRegistry) {
        match self {
            Self::Plain(b) => b.interrupt(fields),
            Self::Commandable(b) => b.interrupt(fields),
        }
    }

    pub(crate) fn update(&mut self, delta_time: f32, fields: &mut FieldRegistry) {
        match self {
            Self::Plain(b) => b.update(delta_time, fields),
            Self::Commandable(b) => b.update(delta_time, fields),
        }
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self::plain(Passive)
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Behavior::Plain"),
            Self::Commandable(_) => f.write_str("Behavior::Commandable"),
        }
    }
}

/// A named node with a behaviour and ordered outgoing transitions.
#[derive(Debug)]
pub struct State {
    id: StateId,
    name: String,
    behavior: Behavior,
    transitions: Vec<StateTransition>,
}

impl State {
    pub fn new(id: StateId, name: impl Into<String>, behavior: Behavior) -> Self {
        Self {
            id,
            name: name.into(),
            behavior,
            transitions: Vec::new(),
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_commandable(&self) -> bool {
        self.behavior.is_commandable()
    }

    /// Outgoing transitions in evaluation order.
    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    /// Append an outgoing transition. Its source must be this state.
    pub fn add_transition(&mut self, transition: StateTransition) -> Result<(), ConfigError> {
        if transition.source() != self.id {
            return Err(ConfigError::TransitionSourceMismatch {
                source_id: transition.source().index(),
                owner: self.id.index(),
            });
        }
        self.transitions.push(transition);
        Ok(())
    }

    pub(crate) fn behavior_mut(&mut self) -> &mut Behavior {
        &mut self.behavior
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counter {
        updates: Rc<Cell<usize>>,
    }

    impl StateBehavior for Counter {
        fn update(&mut self, _delta_time: f32, _fields: &mut FieldRegistry) {
            self.updates.set(self.updates.get() + 1);
        }
    }

    struct Echo;

    impl StateBehavior for Echo {}

    impl CommandHandler for Echo {
        fn process_command(
            &mut self,
            command: Command,
            _args: &CommandArgs,
            fields: &mut FieldRegistry,
        ) {
            let _ = fields.set_int_field("echo", i32::from(command));
        }
    }

    #[test]
    fn add_transition_requires_matching_source() {
        let mut state = State::new(StateId(0), "Idle", Behavior::default());

        assert!(state
            .add_transition(StateTransition::new(StateId(0), StateId(1)))
            .is_ok());

        let result = state.add_transition(StateTransition::new(StateId(1), StateId(0)));
        assert_eq!(
            result,
            Err(ConfigError::TransitionSourceMismatch {
                source_id: 1,
                owner: 0
            })
        );
        assert_eq!(state.transitions().len(), 1);
    }

    #[test]
    fn plain_behavior_has_no_command_capability() {
        let mut behavior = Behavior::plain(Counter {
            updates: Rc::new(Cell::new(0)),
        });

        assert!(!behavior.is_commandable());
        assert!(behavior.command_handler().is_none());
    }

    #[test]
    fn commandable_behavior_exposes_handler() {
        let mut fields = FieldRegistry::new();
        fields.register_int_field("echo", 0).unwrap();
        let mut behavior = Behavior::commandable(Echo);

        let handler = behavior.command_handler().expect("commandable");
        handler.process_command(Command::Sheathe, &CommandArgs::None, &mut fields);

        assert_eq!(fields.int_field("echo").unwrap(), i32::from(Command::Sheathe));
    }

    #[test]
    fn lifecycle_calls_reach_behavior() {
        let mut fields = FieldRegistry::new();
        let updates = Rc::new(Cell::new(0));
        let mut state = State::new(
            StateId(3),
            "Moving",
            Behavior::plain(Counter {
                updates: Rc::clone(&updates),
            }),
        );

        state.behavior_mut().update(0.016, &mut fields);
        state.behavior_mut().update(0.016, &mut fields);

        assert_eq!(updates.get(), 2);
        assert_eq!(state.name(), "Moving");
        assert_eq!(state.id().index(), 3);
        assert!(!state.is_commandable());
    }
}
