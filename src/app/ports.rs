//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BenchService (domain)
//! ```
//!
//! Driven adapters (sensor, outputs, buttons, display, event sinks)
//! implement these traits. The [`BenchService`](super::service::BenchService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::drivers::button::Button;
use crate::error::{DisplayError, PwmError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain the temperature.
pub trait SensorPort {
    /// One bounded conversion, in °C.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: PWM duty and the two alarm outputs.
pub trait OutputPort {
    /// Apply a duty cycle (0–100 %).
    fn set_duty(&mut self, percent: u8) -> Result<(), PwmError>;

    fn set_alarm_led(&mut self, on: bool);

    fn set_buzzer(&mut self, on: bool);

    /// PWM to 0, LED and buzzer off.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Button port
// ───────────────────────────────────────────────────────────────

/// Raw contact levels; debouncing happens in the domain.
pub trait ButtonPort {
    fn is_pressed(&mut self, button: Button) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// Character display with a hardware cursor.
pub trait DisplayPort {
    /// Bring the controller to a known, cleared state. Safe to repeat.
    fn init(&mut self) -> Result<(), DisplayError>;

    fn clear(&mut self) -> Result<(), DisplayError>;

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError>;

    fn print(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Clear, then one line on each row.
    fn display_welcome(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        self.clear()?;
        self.set_cursor(0, 0)?;
        self.print(line1)?;
        self.set_cursor(0, 1)?;
        self.print(line2)
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
