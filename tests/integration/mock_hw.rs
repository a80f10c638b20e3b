//! Mock hardware for integration tests.
//!
//! - [`MockHardware`] records every output call and serves scripted sensor
//!   and button levels.
//! - [`FakeHd44780`] is a behavioural model of the LCD controller: it
//!   decodes the nibble stream into a DDRAM image so tests can assert on
//!   what the screen actually shows.

use embedded_hal::delay::DelayNs;
use pwmbench::app::events::AppEvent;
use pwmbench::app::ports::{ButtonPort, EventSink, OutputPort, SensorPort};
use pwmbench::drivers::button::Button;
use pwmbench::drivers::lcd_bus::{NibbleBus, RegisterSelect};
use pwmbench::error::{DisplayError, PwmError, SensorError};

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    SetDuty(u8),
    AlarmLed(bool),
    Buzzer(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<OutputCall>,
    pub temperature: Result<f32, SensorError>,
    pub reads: u32,
    up: bool,
    down: bool,
    screen: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            temperature: Ok(25.0),
            reads: 0,
            up: false,
            down: false,
            screen: false,
        }
    }

    pub fn hold(&mut self, button: Button) {
        self.set_button(button, true);
    }

    pub fn release(&mut self, button: Button) {
        self.set_button(button, false);
    }

    fn set_button(&mut self, button: Button, pressed: bool) {
        match button {
            Button::Up => self.up = pressed,
            Button::Down => self.down = pressed,
            Button::Screen => self.screen = pressed,
        }
    }

    /// Last duty written, 0 if never written.
    pub fn duty(&self) -> u8 {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                OutputCall::SetDuty(d) => Some(*d),
                OutputCall::AllOff => Some(0),
                _ => None,
            })
            .unwrap_or(0)
    }

    pub fn led_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                OutputCall::AlarmLed(on) => Some(*on),
                OutputCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn buzzer_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                OutputCall::Buzzer(on) => Some(*on),
                OutputCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Number of buzzer off→on edges.
    pub fn beeps(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == OutputCall::Buzzer(true))
            .count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        self.temperature
    }
}

impl OutputPort for MockHardware {
    fn set_duty(&mut self, percent: u8) -> Result<(), PwmError> {
        if percent > 100 {
            return Err(PwmError::DutyOutOfRange(percent));
        }
        self.calls.push(OutputCall::SetDuty(percent));
        Ok(())
    }

    fn set_alarm_led(&mut self, on: bool) {
        self.calls.push(OutputCall::AlarmLed(on));
    }

    fn set_buzzer(&mut self, on: bool) {
        self.calls.push(OutputCall::Buzzer(on));
    }

    fn all_off(&mut self) {
        self.calls.push(OutputCall::AllOff);
    }
}

impl ButtonPort for MockHardware {
    fn is_pressed(&mut self, button: Button) -> bool {
        match button {
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Screen => self.screen,
        }
    }
}

// ── FakeHd44780 ───────────────────────────────────────────────

const DDRAM_SIZE: usize = 0x80;

pub struct FakeHd44780 {
    pub ddram: [u8; DDRAM_SIZE],
    pub address: u8,
    /// Every complete instruction byte, in order.
    pub commands: Vec<u8>,
    /// Every nibble with the RS level it was latched under.
    pub nibbles: Vec<(RegisterSelect, u8)>,
    pub four_bit: bool,
    pub two_lines: bool,
    pub display_on: bool,
    pub pulse_us: Vec<u32>,
    rs: RegisterSelect,
    high: Option<u8>,
}

#[allow(dead_code)]
impl FakeHd44780 {
    pub fn new() -> Self {
        Self {
            // Power-on DDRAM content is undefined; use a marker.
            ddram: [b'#'; DDRAM_SIZE],
            address: 0,
            commands: Vec::new(),
            nibbles: Vec::new(),
            four_bit: false,
            two_lines: false,
            display_on: false,
            pulse_us: Vec::new(),
            rs: RegisterSelect::Command,
            high: None,
        }
    }

    /// The 16 visible characters of `row`.
    pub fn row(&self, row: usize) -> String {
        let base = if row == 0 { 0x00 } else { 0x40 };
        self.ddram[base..base + 16].iter().map(|&b| b as char).collect()
    }

    /// Row text with trailing padding removed.
    pub fn row_trimmed(&self, row: usize) -> String {
        self.row(row).trim_end().to_string()
    }

    fn execute(&mut self, cmd: u8) {
        self.commands.push(cmd);
        if cmd & 0x80 != 0 {
            self.address = cmd & 0x7F;
        } else if cmd & 0x20 != 0 {
            self.four_bit = cmd & 0x10 == 0;
            self.two_lines = cmd & 0x08 != 0;
        } else if cmd & 0x08 != 0 {
            self.display_on = cmd & 0x04 != 0;
        } else if cmd == 0x01 {
            self.ddram = [b' '; DDRAM_SIZE];
            self.address = 0;
        }
    }

    fn write_data(&mut self, byte: u8) {
        self.ddram[self.address as usize] = byte;
        self.address = (self.address + 1) & 0x7F;
    }
}

impl Default for FakeHd44780 {
    fn default() -> Self {
        Self::new()
    }
}

impl NibbleBus for FakeHd44780 {
    fn select(&mut self, register: RegisterSelect) -> Result<(), DisplayError> {
        self.rs = register;
        Ok(())
    }

    fn send_nibble<D: DelayNs>(
        &mut self,
        nibble: u8,
        pulse_us: u32,
        delay: &mut D,
    ) -> Result<(), DisplayError> {
        delay.delay_us(pulse_us);
        delay.delay_us(pulse_us);
        self.pulse_us.push(pulse_us);
        let nibble = nibble & 0x0F;
        self.nibbles.push((self.rs, nibble));

        if !self.four_bit {
            // 8-bit mode: D4..D7 are the upper half of a full instruction
            // and D0..D3 float low.
            if self.rs == RegisterSelect::Command {
                self.execute(nibble << 4);
            }
            return Ok(());
        }

        match self.high.take() {
            None => self.high = Some(nibble),
            Some(high) => {
                let byte = (high << 4) | nibble;
                match self.rs {
                    RegisterSelect::Command => self.execute(byte),
                    RegisterSelect::Data => self.write_data(byte),
                }
            }
        }
        Ok(())
    }
}

// ── Delay ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct CountingDelay {
    pub total_ns: u64,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
