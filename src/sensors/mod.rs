//! Sensor subsystem.
//!
//! Only the temperature input exists on this board; it is read through the
//! [`SensorPort`](crate::app::ports::SensorPort) implemented by the
//! hardware adapter.

pub mod temperature;
