//! HD44780 character LCD driver (16x2, 4-bit interface).
//!
//! ## Init handshake
//!
//! The controller powers up in 8-bit mode with an unknown nibble phase, so
//! the first four transfers are bare nibbles rather than byte pairs:
//!
//! | Step | Nibble | Wait after |
//! |------|--------|------------|
//! | 1    | 0x3    | 5 ms       |
//! | 2    | 0x3    | 1 ms       |
//! | 3    | 0x3    | 1 ms       |
//! | 4    | 0x2    | (4-bit)    |
//!
//! After that every transfer is a full byte: function set `0x28`, display
//! on `0x0C`, entry mode `0x06`, then clear.
//!
//! The bus is write-only (R/W tied low), so busy-flag polling is
//! impossible; every step waits a fixed datasheet minimum instead.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::app::ports::DisplayPort;
use crate::config::LcdTiming;
use crate::drivers::lcd_bus::{NibbleBus, RegisterSelect};
use crate::error::DisplayError;

pub const LCD_COLS: u8 = 16;
pub const LCD_ROWS: u8 = 2;

pub const CMD_CLEAR: u8 = 0x01;
pub const CMD_ENTRY_MODE_INC: u8 = 0x06;
pub const CMD_DISPLAY_ON: u8 = 0x0C;
pub const CMD_FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
pub const CMD_SET_DDRAM_ADDR: u8 = 0x80;

/// Bytes needed to hold one row of UTF-8 text (4 bytes per char worst case).
pub const LINE_BYTES: usize = LCD_COLS as usize * 4;

/// DDRAM address of column 0 on each row.
const ROW_BASE: [u8; LCD_ROWS as usize] = [0x00, 0x40];

/// Controller glyph for the degree sign (A00 ROM).
pub const GLYPH_DEGREE: u8 = 0xDF;

/// Set-DDRAM-address command for a cell.
pub fn cursor_command(col: u8, row: u8) -> Result<u8, DisplayError> {
    if col >= LCD_COLS || row >= LCD_ROWS {
        return Err(DisplayError::CursorOutOfRange { col, row });
    }
    Ok(CMD_SET_DDRAM_ADDR | (ROW_BASE[row as usize] + col))
}

/// Map a character onto the controller's character ROM.
pub fn glyph(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '°' => GLYPH_DEGREE,
        _ => b'?',
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcdState {
    Uninitialized,
    Initializing,
    Ready,
}

pub struct Lcd<B, D> {
    bus: B,
    delay: D,
    timing: LcdTiming,
    state: LcdState,
}

impl<B: NibbleBus, D: DelayNs> Lcd<B, D> {
    pub fn new(bus: B, delay: D, timing: LcdTiming) -> Self {
        Self {
            bus,
            delay,
            timing,
            state: LcdState::Uninitialized,
        }
    }

    pub fn state(&self) -> LcdState {
        self.state
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Run the power-on handshake and leave the display cleared.
    ///
    /// Safe to call again from any state; the forced 0x3 sequence
    /// resynchronises the nibble phase.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.state = LcdState::Initializing;
        let t = self.timing;
        let pulse = t.enable_pulse_us;

        self.bus.select(RegisterSelect::Command)?;
        self.delay.delay_ms(t.power_on_ms);

        self.bus.send_nibble(0x3, pulse, &mut self.delay)?;
        self.delay.delay_us(t.init_first_wait_us);
        self.bus.send_nibble(0x3, pulse, &mut self.delay)?;
        self.delay.delay_us(t.init_retry_wait_us);
        self.bus.send_nibble(0x3, pulse, &mut self.delay)?;
        self.delay.delay_us(t.init_retry_wait_us);
        self.bus.send_nibble(0x2, pulse, &mut self.delay)?;

        self.send_command(CMD_FUNCTION_SET_4BIT_2LINE)?;
        self.send_command(CMD_DISPLAY_ON)?;
        self.send_command(CMD_ENTRY_MODE_INC)?;
        self.clear_raw()?;

        self.state = LcdState::Ready;
        info!("LCD: {}x{} ready (4-bit)", LCD_COLS, LCD_ROWS);
        Ok(())
    }

    /// Instruction-register write: RS low, high nibble, low nibble.
    pub fn send_command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.write_byte(RegisterSelect::Command, cmd, self.timing.command_settle_us)
    }

    /// Data-register write at the current DDRAM address.
    pub fn send_data(&mut self, data: u8) -> Result<(), DisplayError> {
        self.write_byte(RegisterSelect::Data, data, self.timing.data_settle_us)
    }

    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.ensure_ready()?;
        self.clear_raw()
    }

    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        self.ensure_ready()?;
        let cmd = cursor_command(col, row)?;
        self.send_command(cmd)
    }

    /// Write `text` from the current cursor. No wrapping: characters past
    /// column 15 land in off-screen DDRAM.
    pub fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        self.ensure_ready()?;
        for c in text.chars() {
            self.send_data(glyph(c))?;
        }
        Ok(())
    }

    /// Tear down and return the bus and delay.
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    fn ensure_ready(&self) -> Result<(), DisplayError> {
        if self.state == LcdState::Ready {
            Ok(())
        } else {
            Err(DisplayError::NotReady)
        }
    }

    fn clear_raw(&mut self) -> Result<(), DisplayError> {
        self.send_command(CMD_CLEAR)?;
        self.delay.delay_us(self.timing.clear_us);
        Ok(())
    }

    fn write_byte(
        &mut self,
        register: RegisterSelect,
        byte: u8,
        settle_us: u32,
    ) -> Result<(), DisplayError> {
        let pulse = self.timing.enable_pulse_us;
        self.bus.select(register)?;
        self.bus.send_nibble(byte >> 4, pulse, &mut self.delay)?;
        self.bus.send_nibble(byte & 0x0F, pulse, &mut self.delay)?;
        self.delay.delay_us(settle_us);
        debug!("LCD: {:?} 0x{:02X}", register, byte);
        Ok(())
    }
}

impl<B: NibbleBus, D: DelayNs> DisplayPort for Lcd<B, D> {
    fn init(&mut self) -> Result<(), DisplayError> {
        Lcd::init(self)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        Lcd::clear(self)
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        Lcd::set_cursor(self, col, row)
    }

    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        Lcd::print(self, text)
    }
}
