//! Input action names to commands, fanned out to observers.

use super::{Command, CommandArgs, Vec2};
use std::collections::HashMap;
use tracing::trace;

/// Action-name → command table.
///
/// The default table binds each command's own name (`"Move"`,
/// `"MoveCamera"`, ...). `Command::None` is never bound.
#[derive(Clone, Debug, PartialEq)]
pub struct InputBindings {
    bindings: HashMap<String, Command>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        for command in Command::ALL {
            if command != Command::None {
                bindings.bind(command.name(), command);
            }
        }
        bindings
    }
}

impl InputBindings {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind an action name, replacing any previous binding for it.
    pub fn bind(&mut self, action: impl Into<String>, command: Command) -> Option<Command> {
        self.bindings.insert(action.into(), command)
    }

    pub fn unbind(&mut self, action: &str) -> Option<Command> {
        self.bindings.remove(action)
    }

    pub fn resolve(&self, action: &str) -> Option<Command> {
        self.bindings.get(action).copied()
    }
}

/// Handle returned by [`CommandPipeline::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(Command, &CommandArgs)>;

/// Maps raw input events to commands and notifies subscribed observers.
///
/// Unrecognised action names are dropped without notifying anyone, so
/// input schemes can grow ahead of the commands that handle them.
///
/// # Example
///
/// ```rust
/// use commandable_fsm::command::{Command, CommandPipeline, Vec2};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let mut pipeline = CommandPipeline::new();
/// let sink = Rc::clone(&seen);
/// pipeline.subscribe(move |command, _args| sink.borrow_mut().push(command));
///
/// pipeline.dispatch("Move", Some(Vec2::new(1.0, 0.0)));
/// pipeline.dispatch("Jump", None);
///
/// assert_eq!(*seen.borrow(), vec![Command::Move]);
/// ```
pub struct CommandPipeline {
    bindings: InputBindings,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl Default for CommandPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandPipeline {
    pub fn new() -> Self {
        Self::with_bindings(InputBindings::default())
    }

    pub fn with_bindings(bindings: InputBindings) -> Self {
        Self {
            bindings,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn bindings(&self) -> &InputBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut InputBindings {
        &mut self.bindings
    }

    /// Register an observer. Observers are notified in subscription order.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(Command, &CommandArgs) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(subscription, _)| *subscription != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Translate an input action and notify every observer.
    ///
    /// Returns the issued command, or `None` if the action is not bound.
    pub fn dispatch(&mut self, action: &str, payload: Option<Vec2>) -> Option<Command> {
        let Some(command) = self.bindings.resolve(action) else {
            trace!(action, "ignoring unbound input action");
            return None;
        };
        self.issue(command, CommandArgs::from(payload));
        Some(command)
    }

    /// Notify observers of an already-resolved command.
    pub fn issue(&mut self, command: Command, args: CommandArgs) {
        trace!(?command, observers = self.observers.len(), "command issued");
        for (_, observer) in &mut self.observers {
            observer(command, &args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Seen = Rc<RefCell<Vec<(Command, CommandArgs)>>>;

    fn recording(pipeline: &mut CommandPipeline) -> (SubscriptionId, Seen) {
        let seen = Seen::default();
        let sink = Rc::clone(&seen);
        let id = pipeline.subscribe(move |command, args| sink.borrow_mut().push((command, *args)));
        (id, seen)
    }

    #[test]
    fn default_bindings_cover_every_command_but_none() {
        let bindings = InputBindings::default();

        assert_eq!(bindings.resolve("Move"), Some(Command::Move));
        assert_eq!(bindings.resolve("AbsorbRelease"), Some(Command::AbsorbRelease));
        assert_eq!(bindings.resolve("None"), None);
    }

    #[test]
    fn recognised_action_reaches_all_observers() {
        let mut pipeline = CommandPipeline::new();
        let (_, first) = recording(&mut pipeline);
        let (_, second) = recording(&mut pipeline);

        let issued = pipeline.dispatch("Move", Some(Vec2::new(1.0, 0.0)));

        assert_eq!(issued, Some(Command::Move));
        let expected = vec![(Command::Move, CommandArgs::Vector(Vec2::new(1.0, 0.0)))];
        assert_eq!(*first.borrow(), expected);
        assert_eq!(*second.borrow(), expected);
    }

    #[test]
    fn unbound_action_notifies_nobody() {
        let mut pipeline = CommandPipeline::new();
        let (_, seen) = recording(&mut pipeline);

        assert_eq!(pipeline.dispatch("Dodge", None), None);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn unsubscribed_observer_is_not_notified() {
        let mut pipeline = CommandPipeline::new();
        let (id, seen) = recording(&mut pipeline);

        assert!(pipeline.unsubscribe(id));
        assert!(!pipeline.unsubscribe(id));
        pipeline.dispatch("Sheathe", None);

        assert!(seen.borrow().is_empty());
        assert_eq!(pipeline.observer_count(), 0);
    }

    #[test]
    fn rebinding_changes_resolution() {
        let mut bindings = InputBindings::empty();
        bindings.bind("Look", Command::MoveCamera);
        let mut pipeline = CommandPipeline::with_bindings(bindings);
        let (_, seen) = recording(&mut pipeline);

        pipeline.dispatch("MoveCamera", None);
        pipeline.dispatch("Look", Some(Vec2::new(0.0, 1.0)));

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].0, Command::MoveCamera);
    }
}
