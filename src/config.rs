//! System configuration parameters
//!
//! All tunable parameters for the bench tool. The two hardware variants
//! differ only in configuration, exposed as named presets:
//! [`BenchConfig::default`] and [`BenchConfig::complementary`].

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::drivers::lcd::{LCD_COLS, LINE_BYTES};
use crate::error::Error;

/// Countdown upper bound; the status line reserves two digits for it.
pub const MAX_COUNTDOWN_SECS: u16 = 60;

/// Suffix printed after the temperature on the second screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempUnitLabel {
    /// `"Temp: 23.4 C"`
    Celsius,
    /// `"Temp: 23.4"`
    None,
}

impl TempUnitLabel {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Celsius => " C",
            Self::None => "",
        }
    }
}

/// PWM timer setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PwmSettings {
    /// Output frequency in Hz.
    pub freq_hz: u32,
    /// Timer resolution; period = 2^bits - 1.
    pub resolution_bits: u8,
    /// Drive the complementary output with dead-time.
    pub complementary: bool,
    /// Gap between one output falling and the other rising (ns).
    pub dead_time_ns: u32,
}

impl PwmSettings {
    /// Compare-register period (top value).
    pub fn period(&self) -> u32 {
        (1u32 << self.resolution_bits) - 1
    }
}

/// Linear mapping from raw ADC code to °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorCalibration {
    /// ADC reference voltage (V).
    pub vref_volts: f32,
    /// Raw code corresponding to `vref_volts`.
    pub full_scale_code: u16,
    /// °C per volt at the sensor output (LM35: 100).
    pub scale: f32,
    /// Upper bound on a single conversion (µs).
    pub conversion_timeout_us: u32,
}

/// HD44780 timing budget. All values are minimums from the datasheet,
/// rounded up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcdTiming {
    /// Wait after power-up before the first nibble (ms, ≥ 15).
    pub power_on_ms: u32,
    /// Wait after the first forced 0x3 nibble (µs).
    pub init_first_wait_us: u32,
    /// Wait after the second and third 0x3 nibbles (µs).
    pub init_retry_wait_us: u32,
    /// EN high time and EN low time after each nibble (µs).
    pub enable_pulse_us: u32,
    /// Settle after a command byte (µs).
    pub command_settle_us: u32,
    /// Settle after a data byte (µs).
    pub data_settle_us: u32,
    /// Extra wait after the clear command (µs).
    pub clear_us: u32,
}

impl Default for LcdTiming {
    fn default() -> Self {
        Self {
            power_on_ms: 40,
            init_first_wait_us: 5_000,
            init_retry_wait_us: 1_000,
            enable_pulse_us: 1_000,
            command_settle_us: 1_000,
            data_settle_us: 1_000,
            clear_us: 2_000,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    // --- Task intervals ---
    /// Temperature sampling interval (ms)
    pub temp_sample_interval_ms: u32,
    /// Alarm LED / buzzer toggle interval while over temperature (ms)
    pub alarm_blink_interval_ms: u32,
    /// LCD refresh interval (ms)
    pub display_refresh_interval_ms: u32,
    /// Countdown decrement interval (ms)
    pub countdown_tick_ms: u32,
    /// Telemetry log interval (ms)
    pub telemetry_interval_ms: u32,

    // --- Buttons ---
    /// Contact must read pressed this long before a press counts (ms)
    pub button_debounce_ms: u32,
    /// Minimum gap between accepted Up/Down presses (ms)
    pub duty_repeat_ms: u32,
    /// Minimum gap between accepted Screen presses (ms)
    pub screen_repeat_ms: u32,

    // --- Buzzer ---
    /// Beep length on every accepted button press (ms)
    pub press_beep_ms: u32,
    /// Beep length at boot (ms)
    pub boot_beep_ms: u32,

    // --- Output ---
    /// Duty change per button press (%)
    pub duty_step_percent: u8,
    /// Countdown start value (s)
    pub countdown_start_secs: u16,
    pub pwm: PwmSettings,

    // --- Temperature ---
    /// Alarm when temperature >= this value (°C)
    pub alarm_threshold_c: f32,
    pub temp_unit: TempUnitLabel,
    pub sensor: SensorCalibration,

    // --- Display ---
    /// How long the welcome message stays up (ms)
    pub splash_ms: u32,
    pub welcome_line1: String<LINE_BYTES>,
    pub welcome_line2: String<LINE_BYTES>,
    pub lcd: LcdTiming,

    // --- Supervision ---
    /// Task watchdog timeout (ms)
    pub watchdog_timeout_ms: u32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            temp_sample_interval_ms: 100,
            alarm_blink_interval_ms: 100,
            display_refresh_interval_ms: 200,
            countdown_tick_ms: 1000,
            telemetry_interval_ms: 5000,

            button_debounce_ms: 30,
            duty_repeat_ms: 200,
            screen_repeat_ms: 300,

            press_beep_ms: 50,
            boot_beep_ms: 200,

            duty_step_percent: 5,
            countdown_start_secs: 60,
            pwm: PwmSettings {
                freq_hz: 10_000,
                resolution_bits: 12,
                complementary: false,
                dead_time_ns: 0,
            },

            alarm_threshold_c: 50.0,
            temp_unit: TempUnitLabel::Celsius,
            sensor: SensorCalibration {
                vref_volts: 3.3,
                full_scale_code: 4095,
                scale: 100.0,
                conversion_timeout_us: 1_000,
            },

            splash_ms: 2000,
            welcome_line1: fixed_line("System Started"),
            welcome_line2: fixed_line("Waiting..."),
            lcd: LcdTiming::default(),

            watchdog_timeout_ms: 5000,
        }
    }
}

impl BenchConfig {
    /// Variant with the complementary output (dead-time protected),
    /// a 30 °C alarm and no unit suffix on the temperature screen.
    pub fn complementary() -> Self {
        let mut c = Self::default();
        c.pwm.complementary = true;
        c.pwm.dead_time_ns = 500;
        c.alarm_threshold_c = 30.0;
        c.temp_unit = TempUnitLabel::None;
        c
    }

    /// Preset selected by Cargo features.
    pub fn for_build() -> Self {
        if cfg!(feature = "complementary-pwm") {
            Self::complementary()
        } else {
            Self::default()
        }
    }

    /// Reject values the firmware cannot operate with.
    pub fn validate(&self) -> Result<(), Error> {
        let intervals = [
            self.temp_sample_interval_ms,
            self.alarm_blink_interval_ms,
            self.display_refresh_interval_ms,
            self.countdown_tick_ms,
            self.telemetry_interval_ms,
        ];
        if intervals.contains(&0) {
            return Err(Error::Config("task intervals must be non-zero"));
        }
        if self.duty_step_percent == 0 || 100 % self.duty_step_percent != 0 {
            return Err(Error::Config("duty step must divide 100"));
        }
        if self.countdown_start_secs > MAX_COUNTDOWN_SECS {
            return Err(Error::Config("countdown start above 60 s"));
        }
        if !self.alarm_threshold_c.is_finite() {
            return Err(Error::Config("alarm threshold not finite"));
        }
        if !(8..=14).contains(&self.pwm.resolution_bits) {
            return Err(Error::Config("PWM resolution must be 8-14 bits"));
        }
        if self.pwm.freq_hz == 0 {
            return Err(Error::Config("PWM frequency must be non-zero"));
        }
        if self.pwm.complementary {
            let dead = crate::drivers::pwm::dead_time_ticks(
                self.pwm.dead_time_ns,
                self.pwm.freq_hz,
                self.pwm.resolution_bits,
            );
            if dead == 0 {
                return Err(Error::Config("complementary output needs a dead time"));
            }
            if dead * 2 > self.pwm.period() {
                return Err(Error::Config("dead time exceeds half the PWM period"));
            }
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if self.sensor.full_scale_code == 0
            || !positive(self.sensor.vref_volts)
            || !positive(self.sensor.scale)
        {
            return Err(Error::Config("sensor calibration must be positive"));
        }
        if self.sensor.conversion_timeout_us == 0 {
            return Err(Error::Config("conversion timeout must be non-zero"));
        }
        if self.lcd.power_on_ms < 15 {
            return Err(Error::Config("LCD power-on wait below 15 ms"));
        }
        Ok(())
    }
}

/// Build a 16-column line from a literal; longer text is cut at 16.
fn fixed_line(text: &str) -> String<LINE_BYTES> {
    let mut line = String::new();
    for c in text.chars().take(LCD_COLS as usize) {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}
