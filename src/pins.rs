//! GPIO / peripheral pin assignments for the bench tool board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Character LCD (HD44780, 4-bit bus, R/W tied to GND)
// ---------------------------------------------------------------------------

/// Logical LCD signal roles mapped to GPIO numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcdPins {
    /// Register select: LOW = command, HIGH = character data.
    pub rs: i32,
    /// Enable strobe; data is latched on the falling edge.
    pub en: i32,
    /// D4..D7, least significant bit first.
    pub data: [i32; 4],
}

impl LcdPins {
    /// Every LCD line, for bulk output configuration.
    pub const fn all(&self) -> [i32; 6] {
        [self.rs, self.en, self.data[0], self.data[1], self.data[2], self.data[3]]
    }
}

pub const LCD: LcdPins = LcdPins {
    rs: 4,
    en: 5,
    data: [6, 7, 15, 16],
};

// ---------------------------------------------------------------------------
// Temperature sensor (LM35, 10 mV/°C) — ADC1
// ---------------------------------------------------------------------------

/// ADC1 channel 1 (GPIO 2 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// PWM output (LEDC)
// ---------------------------------------------------------------------------

/// Main PWM output.
pub const PWM_GPIO: i32 = 17;
/// Complementary PWM output (only driven by the complementary preset).
pub const PWM_N_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Push buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

pub const BUTTON_UP_GPIO: i32 = 10;
pub const BUTTON_DOWN_GPIO: i32 = 11;
pub const BUTTON_SCREEN_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Alarm outputs
// ---------------------------------------------------------------------------

/// Active buzzer (HIGH = sounding).
pub const BUZZER_GPIO: i32 = 13;
/// Over-temperature LED (HIGH = lit).
pub const ALARM_LED_GPIO: i32 = 14;
