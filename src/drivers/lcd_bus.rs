//! 4-bit parallel transport for HD44780-compatible LCDs.
//!
//! The controller latches D4–D7 on the falling edge of EN. A byte is two
//! nibble transfers, high nibble first; the framing lives in
//! [`Lcd`](super::lcd::Lcd). This layer only knows how to put one nibble on
//! the bus and strobe it.
//!
//! ```text
//!  RS ──────┐_________________ (stable before EN rises)
//!  D4..D7  ═╪═══ nibble ═══════
//!  EN  _____│‾‾‾‾‾‾‾‾‾‾|_______
//!           |<- pulse ->|<- pulse ->|
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::error::DisplayError;

/// Which controller register the next transfer addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterSelect {
    /// Instruction register (RS low).
    Command,
    /// Data register — DDRAM/CGRAM write (RS high).
    Data,
}

/// Capability the display controller needs from the wiring.
///
/// Implemented by [`ParallelBus`] for real pins; tests substitute a
/// recorder to assert on the exact transfer sequence.
pub trait NibbleBus {
    /// Drive the register-select line.
    fn select(&mut self, register: RegisterSelect) -> Result<(), DisplayError>;

    /// Put the low four bits of `nibble` on D4..D7 (bit0 → D4) and strobe
    /// EN, holding it high and then low for `pulse_us` each.
    fn send_nibble<D: DelayNs>(
        &mut self,
        nibble: u8,
        pulse_us: u32,
        delay: &mut D,
    ) -> Result<(), DisplayError>;
}

/// Six push-pull outputs wired straight to the LCD.
pub struct ParallelBus<RS, EN, D4, D5, D6, D7> {
    rs: RS,
    en: EN,
    d4: D4,
    d5: D5,
    d6: D6,
    d7: D7,
}

impl<RS, EN, D4, D5, D6, D7> ParallelBus<RS, EN, D4, D5, D6, D7>
where
    RS: OutputPin,
    EN: OutputPin,
    D4: OutputPin,
    D5: OutputPin,
    D6: OutputPin,
    D7: OutputPin,
{
    pub fn new(rs: RS, en: EN, d4: D4, d5: D5, d6: D6, d7: D7) -> Self {
        Self { rs, en, d4, d5, d6, d7 }
    }

    fn write_data_lines(&mut self, nibble: u8) -> Result<(), DisplayError> {
        let bit = |n: u8| PinState::from(nibble & (1 << n) != 0);
        self.d4.set_state(bit(0)).map_err(|_| DisplayError::PinWrite)?;
        self.d5.set_state(bit(1)).map_err(|_| DisplayError::PinWrite)?;
        self.d6.set_state(bit(2)).map_err(|_| DisplayError::PinWrite)?;
        self.d7.set_state(bit(3)).map_err(|_| DisplayError::PinWrite)?;
        Ok(())
    }
}

impl<RS, EN, D4, D5, D6, D7> NibbleBus for ParallelBus<RS, EN, D4, D5, D6, D7>
where
    RS: OutputPin,
    EN: OutputPin,
    D4: OutputPin,
    D5: OutputPin,
    D6: OutputPin,
    D7: OutputPin,
{
    fn select(&mut self, register: RegisterSelect) -> Result<(), DisplayError> {
        let level = match register {
            RegisterSelect::Command => PinState::Low,
            RegisterSelect::Data => PinState::High,
        };
        self.rs.set_state(level).map_err(|_| DisplayError::PinWrite)
    }

    fn send_nibble<D: DelayNs>(
        &mut self,
        nibble: u8,
        pulse_us: u32,
        delay: &mut D,
    ) -> Result<(), DisplayError> {
        self.write_data_lines(nibble)?;
        self.en.set_high().map_err(|_| DisplayError::PinWrite)?;
        delay.delay_us(pulse_us);
        self.en.set_low().map_err(|_| DisplayError::PinWrite)?;
        delay.delay_us(pulse_us);
        Ok(())
    }
}
