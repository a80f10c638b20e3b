//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the bench tool's behaviour: the cooperative loop,
//! duty/countdown state, alarm blinking and status pages. All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod screens;
pub mod service;
pub mod state;
