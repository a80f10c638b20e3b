//! Fuzz target: `Lcd::set_cursor` + `Lcd::print`
//!
//! The first two bytes pick a cursor cell (often out of range), the rest
//! is rendered as lossy UTF-8. The driver must never panic, must reject
//! cells outside the 16x2 grid, and must emit exactly one glyph byte per
//! character, each from the printable ROM range or the degree glyph.
//!
//! cargo fuzz run fuzz_lcd_print

#![no_main]

use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;
use pwmbench::config::LcdTiming;
use pwmbench::drivers::lcd::{Lcd, GLYPH_DEGREE, LCD_COLS, LCD_ROWS};
use pwmbench::drivers::lcd_bus::{NibbleBus, RegisterSelect};
use pwmbench::error::DisplayError;

#[derive(Default)]
struct ByteBus {
    rs: Option<RegisterSelect>,
    high: Option<u8>,
    data: Vec<u8>,
}

impl NibbleBus for ByteBus {
    fn select(&mut self, register: RegisterSelect) -> Result<(), DisplayError> {
        self.rs = Some(register);
        Ok(())
    }

    fn send_nibble<D: DelayNs>(
        &mut self,
        nibble: u8,
        _pulse_us: u32,
        _delay: &mut D,
    ) -> Result<(), DisplayError> {
        if self.rs != Some(RegisterSelect::Data) {
            return Ok(());
        }
        match self.high.take() {
            None => self.high = Some(nibble & 0x0F),
            Some(high) => self.data.push((high << 4) | (nibble & 0x0F)),
        }
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fuzz_target!(|data: &[u8]| {
    let (col, row, text) = match data {
        [c, r, rest @ ..] => (*c, *r, rest),
        _ => return,
    };

    let mut lcd = Lcd::new(ByteBus::default(), NoDelay, LcdTiming::default());
    if lcd.init().is_err() {
        return;
    }

    let in_grid = col < LCD_COLS && row < LCD_ROWS;
    assert_eq!(lcd.set_cursor(col, row).is_ok(), in_grid);

    let text = String::from_utf8_lossy(text);
    lcd.print(&text).expect("print on a ready display");

    let (bus, _) = lcd.release();
    assert_eq!(bus.data.len(), text.chars().count());
    assert!(bus
        .data
        .iter()
        .all(|&b| (0x20..=0x7E).contains(&b) || b == GLYPH_DEGREE));
});
