//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements              | Connects to            |
//! |------------|-------------------------|------------------------|
//! | `hardware` | SensorPort, OutputPort, | ESP32 ADC, LEDC, GPIO  |
//! |            | ButtonPort              |                        |
//! | `log_sink` | EventSink               | Serial log output      |
//! | `time`     | (loop clock)            | ESP32 system timer     |
//!
//! The LCD implements `DisplayPort` directly in `drivers::lcd`.

pub mod hardware;
pub mod log_sink;
pub mod time;
