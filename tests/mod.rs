//! Test module organization.
//!
//! This module organizes all integration tests for the stream emulator.


/// Bus signal, netlist and scheduler tests.
mod bus_tests;





/// Slave receiver and passive recorder tests.
mod slave_tests;
