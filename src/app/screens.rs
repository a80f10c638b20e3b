//! Status page rendering.
//!
//! Each page is a single 16-column line, space-padded so that a shorter
//! value fully overwrites a longer one without clearing the display.

use core::fmt::Write;

use heapless::String;

use crate::config::TempUnitLabel;
use crate::drivers::lcd::{LCD_COLS, LINE_BYTES};

/// One display row; capacity is in bytes, width is counted in chars.
pub type Line = String<LINE_BYTES>;

/// `PWM:<duty>% T:<countdown>s`
pub fn render_output(duty: u8, countdown_secs: u16) -> Line {
    let mut buf: String<32> = String::new();
    let _ = write!(buf, "PWM:{}% T:{}s", duty, countdown_secs);
    fit_line(&buf)
}

/// `Temp: <t.1>` plus the unit suffix.
pub fn render_temperature(celsius: f32, unit: TempUnitLabel) -> Line {
    let mut buf: String<32> = String::new();
    let _ = write!(buf, "Temp: {:.1}{}", celsius, unit.suffix());
    fit_line(&buf)
}

/// Truncate or space-pad to exactly one display row.
pub fn fit_line(text: &str) -> Line {
    let cols = LCD_COLS as usize;
    let mut line = Line::new();
    let mut width = 0;
    for c in text.chars().take(cols) {
        if line.push(c).is_err() {
            break;
        }
        width += 1;
    }
    for _ in width..cols {
        if line.push(' ').is_err() {
            break;
        }
    }
    line
}
