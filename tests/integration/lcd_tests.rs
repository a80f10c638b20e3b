//! LCD driver against the HD44780 model: framing, addressing and DDRAM
//! contents.

use pwmbench::app::ports::DisplayPort;
use pwmbench::config::LcdTiming;
use pwmbench::drivers::lcd::{Lcd, LcdState};
use pwmbench::drivers::lcd_bus::RegisterSelect;
use pwmbench::error::DisplayError;

use crate::mock_hw::{CountingDelay, FakeHd44780};

fn lcd() -> Lcd<FakeHd44780, CountingDelay> {
    Lcd::new(FakeHd44780::new(), CountingDelay::default(), LcdTiming::default())
}

fn ready() -> Lcd<FakeHd44780, CountingDelay> {
    let mut lcd = lcd();
    lcd.init().unwrap();
    lcd
}

#[test]
fn init_configures_four_bit_two_line_display() {
    let lcd = ready();
    let hd = lcd.bus();
    assert_eq!(lcd.state(), LcdState::Ready);
    assert!(hd.four_bit);
    assert!(hd.two_lines);
    assert!(hd.display_on);
    assert_eq!(hd.commands, vec![0x30, 0x30, 0x30, 0x20, 0x28, 0x0C, 0x06, 0x01]);
    assert_eq!(hd.row(0), " ".repeat(16));
    assert_eq!(hd.address, 0);
}

#[test]
fn init_uses_configured_pulse_width() {
    let lcd = ready();
    assert!(lcd.bus().pulse_us.iter().all(|&us| us == 1000));
}

#[test]
fn command_is_two_nibbles_high_first() {
    let mut lcd = ready();
    let before = lcd.bus().nibbles.len();
    lcd.send_command(0xC3).unwrap();
    assert_eq!(
        lcd.bus().nibbles[before..],
        [(RegisterSelect::Command, 0xC), (RegisterSelect::Command, 0x3)]
    );
}

#[test]
fn cursor_positions_map_to_ddram_addresses() {
    let mut lcd = ready();
    lcd.set_cursor(0, 0).unwrap();
    assert_eq!(lcd.bus().commands.last(), Some(&0x80));
    lcd.set_cursor(3, 1).unwrap();
    assert_eq!(lcd.bus().commands.last(), Some(&0xC3));
    assert_eq!(lcd.bus().address, 0x43);
}

#[test]
fn cursor_outside_grid_is_rejected() {
    let mut lcd = ready();
    let sent = lcd.bus().commands.len();
    assert_eq!(
        lcd.set_cursor(16, 1),
        Err(DisplayError::CursorOutOfRange { col: 16, row: 1 })
    );
    assert_eq!(lcd.bus().commands.len(), sent);
}

#[test]
fn clear_then_print_writes_first_cell() {
    let mut lcd = ready();
    lcd.print("zz").unwrap();
    lcd.clear().unwrap();
    lcd.print("A").unwrap();
    assert_eq!(lcd.bus().ddram[0x00], b'A');
    assert_eq!(lcd.bus().ddram[0x01], b' ');
}

#[test]
fn welcome_occupies_both_rows() {
    let mut lcd = ready();
    lcd.display_welcome("System Started", "Waiting...").unwrap();
    assert_eq!(lcd.bus().row_trimmed(0), "System Started");
    assert_eq!(lcd.bus().row_trimmed(1), "Waiting...");
}

#[test]
fn long_text_runs_into_offscreen_ddram() {
    let mut lcd = ready();
    lcd.print("0123456789ABCDEFXY").unwrap();
    assert_eq!(lcd.bus().row(0), "0123456789ABCDEF");
    assert_eq!(lcd.bus().ddram[0x10], b'X');
    assert_eq!(lcd.bus().row_trimmed(1), "");
}

#[test]
fn degree_sign_uses_rom_glyph() {
    let mut lcd = ready();
    lcd.print("25°").unwrap();
    assert_eq!(&lcd.bus().ddram[..3], &[b'2', b'5', 0xDF]);
}

#[test]
fn uninitialised_display_refuses_writes() {
    let mut lcd = lcd();
    assert_eq!(lcd.print("x"), Err(DisplayError::NotReady));
    assert!(lcd.bus().nibbles.is_empty());
}

#[test]
fn reinit_recovers_nibble_phase() {
    let mut lcd = ready();
    lcd.print("old").unwrap();
    lcd.init().unwrap();
    assert_eq!(lcd.state(), LcdState::Ready);
    lcd.print("new").unwrap();
    assert_eq!(lcd.bus().row_trimmed(0), "new");
}
