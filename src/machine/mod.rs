//! The tick-driven state machine engine.
//!
//! # Tick contract
//!
//! - `start` is called exactly once and enters the entry point
//! - `update(delta_time)` is called once per host tick with `delta_time >= 0`
//! - each update runs the current state's `update` hook, then fires at most
//!   one transition (the first satisfied one in registration order)
//!
//! The machine is single-threaded. Hosts that receive input on other threads
//! should hand it over through [`crate::command::CommandQueue`].

mod state_machine;

pub use state_machine::{MachineStatus, StateMachine};
