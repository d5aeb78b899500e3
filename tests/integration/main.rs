//! Integration tests: ControlService → FSM → ports, on the host with
//! recording mock adapters.

mod control_tests;
mod mock_hw;
mod runon_tests;
