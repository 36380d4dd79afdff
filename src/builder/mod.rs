//! Builder API for declarative state machine assembly.
//!
//! States are referred to by name; the builder resolves names to ids, checks
//! every condition against the declared fields and reports all problems at
//! once.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::TransitionBuilder;

/// Create a transition with no conditions.
///
/// Unconditional transitions fire as soon as they are evaluated, so add them
/// after the conditional transitions leaving the same state.
///
/// # Example
///
/// ```
/// use commandable_fsm::builder::{unconditional, StateMachineBuilder};
/// use commandable_fsm::core::Behavior;
///
/// let mut machine = StateMachineBuilder::new()
///     .state("Spawning", Behavior::default())
///     .state("Idle", Behavior::default())
///     .transition(unconditional("Spawning", "Idle"))
///     .entry("Spawning")
///     .build()
///     .unwrap();
///
/// machine.start().unwrap();
/// machine.update(0.0).unwrap();
/// assert_eq!(machine.current_state_name(), Some("Idle"));
/// ```
pub fn unconditional(from: impl Into<String>, to: impl Into<String>) -> TransitionBuilder {
    TransitionBuilder::new().from(from).to(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Behavior, TransitionCondition, Operator};

    #[test]
    fn unconditional_transition_has_no_conditions() {
        let machine = StateMachineBuilder::new()
            .state("A", Behavior::default())
            .state("B", Behavior::default())
            .transition(unconditional("A", "B"))
            .entry("A")
            .build()
            .unwrap();

        let a = machine.state_id("A").unwrap();
        let transitions = machine.state(a).unwrap().transitions();
        assert_eq!(transitions.len(), 1);
        assert!(transitions[0].is_unconditional());
    }

    #[test]
    fn conditional_registered_first_beats_fallback() {
        let mut machine = StateMachineBuilder::new()
            .float_field("movementSpeed", 0.0)
            .state("Idle", Behavior::default())
            .state("Moving", Behavior::default())
            .state("Fallback", Behavior::default())
            .transition(unconditional("Idle", "Moving").when(TransitionCondition::float(
                "movementSpeed",
                Operator::Greater,
                0.0,
            )))
            .transition(unconditional("Idle", "Fallback"))
            .entry("Idle")
            .build()
            .unwrap();
        machine.start().unwrap();
        machine.set_float_field("movementSpeed", 2.0).unwrap();

        machine.update(0.1).unwrap();

        assert_eq!(machine.current_state_name(), Some("Moving"));
    }
}
