//! Locomotion State Machine
//!
//! This example drives an Idle/Moving entity from a simulated game loop.
//!
//! Key concepts:
//! - Input actions resolved to commands by a pipeline
//! - Commands queued and drained at the start of each update
//! - A movement actuator that reports its own speed
//! - Checkpointing the machine between frames
//!
//! Run with: cargo run --example locomotion

use commandable_fsm::command::{CommandPipeline, Vec2};
use commandable_fsm::movement::{locomotion_machine, Movable, MOVEMENT_SPEED_FIELD};
use std::cell::RefCell;
use std::rc::Rc;

// Toy character controller
#[derive(Default)]
struct Character {
    position: Vec2,
    velocity: Vec2,
}

impl Movable for Character {
    fn move_in(&mut self, direction: Vec2) {
        self.velocity = direction;
    }
}

impl Character {
    fn integrate(&mut self, delta_time: f32) {
        self.position.x += self.velocity.x * delta_time;
        self.position.y += self.velocity.y * delta_time;
    }
}

fn main() {
    println!("=== Locomotion State Machine ===\n");

    let character = Rc::new(RefCell::new(Character::default()));
    let mut machine = locomotion_machine(character.clone()).unwrap();

    let mut pipeline = CommandPipeline::new();
    pipeline.subscribe(machine.command_queue().sink());

    machine.start().unwrap();
    println!("Started in: {:?}\n", machine.current_state_name());

    // Frame-by-frame input: (action, payload)
    let frames: [(&str, Option<Vec2>); 6] = [
        ("Move", Some(Vec2::new(1.0, 0.0))),
        ("Jump", None),
        ("Move", Some(Vec2::new(0.0, 2.0))),
        ("Move", Some(Vec2::ZERO)),
        ("AttackConfirm", None),
        ("MoveCamera", Some(Vec2::new(0.5, 0.5))),
    ];

    let delta_time = 1.0 / 60.0;
    for (frame, (action, payload)) in frames.into_iter().enumerate() {
        match pipeline.dispatch(action, payload) {
            Some(command) => println!("Frame {frame}: {action} -> {command:?}"),
            None => println!("Frame {frame}: {action} ignored (unbound)"),
        }

        // Drains the queue, so the actuator sees this frame's input
        machine.update(delta_time).unwrap();

        let speed = {
            let mut character = character.borrow_mut();
            character.integrate(delta_time);
            character.velocity.length()
        };
        machine.set_float_field(MOVEMENT_SPEED_FIELD, speed).unwrap();

        // The speed written above is observed on the next update
        if let Some(state) = machine.update(0.0).unwrap() {
            println!(
                "  -> entered {:?}",
                machine.machine().state(state).map(|s| s.name())
            );
        }
    }

    println!("\nFinal state: {:?}", machine.current_state_name());
    println!("Final position: {:?}", character.borrow().position);

    let checkpoint = machine.checkpoint();
    println!("\nCheckpoint:\n{}", checkpoint.to_json().unwrap());

    println!("\nTransition path:");
    for name in machine.machine().history().get_path() {
        println!("  {name}");
    }

    machine.shutdown();
    println!("\n=== Example Complete ===");
}
