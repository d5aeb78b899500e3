//! Application core — pure domain logic, zero I/O.
//!
//! Business rules for the cistern controller: FSM orchestration, frost
//! supervision, and button-command handling. All interaction with
//! hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
