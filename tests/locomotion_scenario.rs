//! End-to-end tests driving a commandable machine the way a host game loop does.

use commandable_fsm::command::{
    Command, CommandArgs, CommandPipeline, CommandQueue, CommandableStateMachine, Vec2,
};
use commandable_fsm::core::{
    Behavior, CommandHandler, ConfigError, FieldRegistry, Operator, StateBehavior,
    StateTransition, TransitionCondition,
};
use commandable_fsm::movement::{locomotion_machine, Movable, MOVEMENT_SPEED_FIELD};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Calls {
    log: Vec<String>,
}

impl Calls {
    fn count(&self, entry: &str) -> usize {
        self.log.iter().filter(|e| *e == entry).count()
    }
}

type SharedCalls = Rc<RefCell<Calls>>;

#[derive(Default)]
struct Body {
    moves: Vec<Vec2>,
}

impl Movable for Body {
    fn move_in(&mut self, direction: Vec2) {
        self.moves.push(direction);
    }
}

/// Locomotion state that records every hook it receives.
struct Tracked {
    name: &'static str,
    calls: SharedCalls,
    body: Rc<RefCell<Body>>,
}

impl Tracked {
    fn behavior(name: &'static str, calls: &SharedCalls, body: &Rc<RefCell<Body>>) -> Behavior {
        Behavior::commandable(Self {
            name,
            calls: Rc::clone(calls),
            body: Rc::clone(body),
        })
    }

    fn note(&self, hook: &str) {
        self.calls.borrow_mut().log.push(format!("{}.{hook}", self.name));
    }
}

impl StateBehavior for Tracked {
    fn enter(&mut self, _fields: &mut FieldRegistry) {
        self.note("enter");
    }

    fn exit(&mut self, _fields: &mut FieldRegistry) {
        self.note("exit");
    }

    fn interrupt(&mut self, _fields: &mut FieldRegistry) {
        self.note("interrupt");
    }
}

impl CommandHandler for Tracked {
    fn process_command(&mut self, command: Command, args: &CommandArgs, _fields: &mut FieldRegistry) {
        self.note("command");
        if let (Command::Move, Some(direction)) = (command, args.vector()) {
            self.body.borrow_mut().move_in(direction);
        }
    }
}

fn tracked_machine(calls: &SharedCalls, body: &Rc<RefCell<Body>>) -> CommandableStateMachine {
    let mut machine = CommandableStateMachine::new();
    machine.register_float_field(MOVEMENT_SPEED_FIELD, 0.0).unwrap();
    let idle = machine
        .add_state("Idle", Tracked::behavior("Idle", calls, body))
        .unwrap();
    let moving = machine
        .add_state("Moving", Tracked::behavior("Moving", calls, body))
        .unwrap();
    machine
        .add_transition(StateTransition::new(idle, moving).when(TransitionCondition::float(
            MOVEMENT_SPEED_FIELD,
            Operator::Greater,
            0.0,
        )))
        .unwrap();
    machine
        .add_transition(StateTransition::new(moving, idle).when(TransitionCondition::float(
            MOVEMENT_SPEED_FIELD,
            Operator::Equal,
            0.0,
        )))
        .unwrap();
    machine.set_entry_point(idle).unwrap();
    machine
}

#[test]
fn move_command_then_speed_change_enters_moving() {
    let calls = SharedCalls::default();
    let body = Rc::new(RefCell::new(Body::default()));
    let mut machine = tracked_machine(&calls, &body);

    machine.start().unwrap();
    assert_eq!(machine.current_state_name(), Some("Idle"));

    let handled = machine
        .process_command(Command::Move, &CommandArgs::Vector(Vec2::new(1.0, 0.0)))
        .unwrap();
    assert!(handled);
    assert_eq!(calls.borrow().count("Idle.command"), 1);
    assert_eq!(body.borrow().moves, vec![Vec2::new(1.0, 0.0)]);

    // The actuator owns the speed; nothing in the machine derives it
    assert_eq!(machine.current_state_name(), Some("Idle"));
    machine.set_float_field(MOVEMENT_SPEED_FIELD, 5.0).unwrap();
    machine.update(0.1).unwrap();

    assert_eq!(machine.current_state_name(), Some("Moving"));
    let calls = calls.borrow();
    assert_eq!(calls.count("Idle.exit"), 1);
    assert_eq!(calls.count("Moving.enter"), 1);
    assert_eq!(calls.count("Idle.interrupt"), 0);
}

#[test]
fn pipeline_feeds_machine_through_queue() {
    let body = Rc::new(RefCell::new(Body::default()));
    let mut machine = locomotion_machine(body.clone()).unwrap();
    let mut pipeline = CommandPipeline::new();
    pipeline.subscribe(machine.command_queue().sink());
    machine.start().unwrap();

    assert_eq!(
        pipeline.dispatch("Move", Some(Vec2::new(0.0, -1.0))),
        Some(Command::Move)
    );
    assert!(body.borrow().moves.is_empty());

    machine.update(0.016).unwrap();

    assert_eq!(body.borrow().moves, vec![Vec2::new(0.0, -1.0)]);
    assert_eq!(machine.last_command(), Command::Move);
}

#[test]
fn unmapped_action_reaches_no_observer() {
    let notified = Rc::new(RefCell::new(0usize));
    let mut pipeline = CommandPipeline::new();
    let counter = Rc::clone(&notified);
    pipeline.subscribe(move |_, _| *counter.borrow_mut() += 1);

    assert_eq!(pipeline.dispatch("Jump", None), None);
    assert_eq!(*notified.borrow(), 0);
}

#[test]
fn queued_commands_from_other_threads_apply_on_next_update() {
    let body = Rc::new(RefCell::new(Body::default()));
    let mut machine = locomotion_machine(body.clone()).unwrap();
    let queue: CommandQueue = machine.command_queue();
    machine.start().unwrap();

    let accepted = std::thread::spawn(move || {
        queue.push(Command::Move, CommandArgs::Vector(Vec2::new(1.0, 1.0)))
    })
    .join()
    .unwrap();
    assert!(accepted);

    machine.update(0.016).unwrap();

    assert_eq!(body.borrow().moves, vec![Vec2::new(1.0, 1.0)]);
}

#[test]
fn field_misuse_is_a_configuration_error() {
    let mut machine = CommandableStateMachine::new();

    assert_eq!(
        machine.set_float_field("jumpHeight", 1.0),
        Err(ConfigError::UnknownField {
            name: "jumpHeight".to_string()
        })
    );

    machine.register_float_field(MOVEMENT_SPEED_FIELD, 0.0).unwrap();
    assert_eq!(
        machine.register_float_field(MOVEMENT_SPEED_FIELD, 1.0),
        Err(ConfigError::DuplicateField {
            name: MOVEMENT_SPEED_FIELD.to_string()
        })
    );
}

#[test]
fn update_before_start_is_a_no_op() {
    let calls = SharedCalls::default();
    let body = Rc::new(RefCell::new(Body::default()));
    let mut machine = tracked_machine(&calls, &body);
    machine.set_float_field(MOVEMENT_SPEED_FIELD, 5.0).unwrap();

    assert_eq!(machine.update(0.1), Ok(None));
    assert_eq!(machine.current_state(), None);
    assert!(calls.borrow().log.is_empty());
}
