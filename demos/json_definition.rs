//! Data-Driven Machine Definition
//!
//! This example loads a combat stance machine from JSON.
//!
//! Key concepts:
//! - Fields, states and transitions authored as data
//! - Behaviours resolved by name from a registry
//! - Transitions conditioned on the last processed command
//! - Interrupting a state from outside the transition table
//!
//! Run with: cargo run --example json_definition

use commandable_fsm::command::{Command, CommandArgs};
use commandable_fsm::core::{Behavior, CommandHandler, FieldRegistry, StateBehavior};
use commandable_fsm::definition::{BehaviorRegistry, MachineDefinition};

const STANCES: &str = r#"{
    "fields": [
        { "name": "stamina", "default": { "Float": 1.0 } }
    ],
    "states": [
        { "name": "Sheathed" },
        { "name": "Armed", "behavior": "swing" },
        { "name": "Absorbing", "behavior": "absorb" }
    ],
    "transitions": [
        {
            "from": "Sheathed",
            "to": "Armed",
            "conditions": [
                { "kind": "Int", "operator": "Equal", "field": "command", "literal": { "Int": 3 } }
            ]
        },
        {
            "from": "Armed",
            "to": "Sheathed",
            "conditions": [
                { "kind": "Int", "operator": "Equal", "field": "command", "literal": { "Int": 4 } }
            ]
        },
        {
            "from": "Armed",
            "to": "Absorbing",
            "conditions": [
                { "kind": "Int", "operator": "Equal", "field": "command", "literal": { "Int": 5 } },
                { "kind": "Float", "operator": "Greater", "field": "stamina", "literal": { "Float": 0.0 } }
            ]
        },
        {
            "from": "Absorbing",
            "to": "Armed",
            "conditions": [
                { "kind": "Int", "operator": "Equal", "field": "command", "literal": { "Int": 6 } }
            ]
        }
    ],
    "entry": "Sheathed"
}"#;

// Swinging costs stamina
struct Swing;

impl StateBehavior for Swing {
    fn enter(&mut self, _fields: &mut FieldRegistry) {
        println!("  [Armed] blade drawn");
    }
}

impl CommandHandler for Swing {
    fn process_command(&mut self, command: Command, _args: &CommandArgs, fields: &mut FieldRegistry) {
        if command == Command::AttackConfirm {
            let stamina = fields.float_field("stamina").unwrap_or(0.0);
            let _ = fields.set_float_field("stamina", (stamina - 0.25).max(0.0));
            println!("  [Armed] swing, stamina left {:.2}", (stamina - 0.25).max(0.0));
        }
    }
}

// Absorbing restores stamina every tick
struct Absorb;

impl StateBehavior for Absorb {
    fn update(&mut self, delta_time: f32, fields: &mut FieldRegistry) {
        let stamina = fields.float_field("stamina").unwrap_or(0.0);
        let _ = fields.set_float_field("stamina", (stamina + delta_time).min(1.0));
    }

    fn interrupt(&mut self, _fields: &mut FieldRegistry) {
        println!("  [Absorbing] interrupted");
    }
}

impl CommandHandler for Absorb {
    fn process_command(&mut self, _command: Command, _args: &CommandArgs, _fields: &mut FieldRegistry) {}
}

fn main() {
    println!("=== Data-Driven Machine Definition ===\n");

    let behaviors = BehaviorRegistry::new()
        .register("swing", || Behavior::commandable(Swing))
        .register("absorb", || Behavior::commandable(Absorb));

    let definition = MachineDefinition::from_json(STANCES).unwrap();
    println!(
        "Loaded {} states and {} transitions\n",
        definition.states.len(),
        definition.transitions.len()
    );

    let mut machine = definition.build_commandable(&behaviors).unwrap();
    machine.start().unwrap();

    let script = [
        Command::AttackConfirm,
        Command::AttackConfirm,
        Command::AbsorbStart,
        Command::None,
        Command::AbsorbRelease,
        Command::Sheathe,
    ];

    for command in script {
        machine.process_command(command, &CommandArgs::None).unwrap();
        machine.update(0.5).unwrap();
        println!(
            "{:<14} -> {:?} (stamina {:?})",
            command.name(),
            machine.current_state_name(),
            machine.get_field("stamina").map(|(_, value)| value)
        );
    }

    // Force a stance change regardless of transitions
    machine.process_command(Command::AbsorbStart, &CommandArgs::None).unwrap();
    machine.update(0.0).unwrap();
    machine.process_command(Command::AttackConfirm, &CommandArgs::None).unwrap();
    machine.update(0.0).unwrap();
    machine.process_command(Command::AbsorbStart, &CommandArgs::None).unwrap();
    machine.update(0.0).unwrap();
    if let Some(sheathed) = machine.machine().state_id("Sheathed") {
        machine.interrupt_to(sheathed).unwrap();
    }
    println!("\nAfter interrupt: {:?}", machine.current_state_name());

    println!("\nHistory:");
    for record in machine.machine().history().iter() {
        println!("  {:?} -> {} ({:?})", record.from, record.to, record.kind);
    }

    println!("\n=== Example Complete ===");
}
