//! PWM output driver (LEDC).
//!
//! Maps a 0–100 % duty onto the LEDC compare register. With the
//! complementary output enabled, a second channel on the same timer is
//! phase-shifted via its `hpoint` so that it is high only in the gap
//! left by the main output, minus a dead-time on both edges:
//!
//! ```text
//!          0        compare                 period+1
//!  PWM     ‾‾‾‾‾‾‾‾‾|_________________________|
//!  PWM_N   _________|__|‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾|__|
//!                    dead                   dead
//! ```
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes duty/hpoint via hw_init helpers.
//! On host/test: tracks the computed register values in-memory only.

use log::debug;

use crate::config::PwmSettings;
use crate::drivers::hw_init;
use crate::error::PwmError;

/// Compare value for `percent` on a timer with the given period.
///
/// `percent` must already be validated (≤ 100).
pub fn compare_for(percent: u8, period: u32) -> u32 {
    percent as u32 * (period + 1) / 100
}

/// `(hpoint, duty)` for the complementary channel.
pub fn complementary_window(compare: u32, dead: u32, period: u32) -> (u32, u32) {
    let top = period + 1;
    let duty = top.saturating_sub(compare).saturating_sub(2 * dead);
    let hpoint = (compare + dead).min(period);
    (hpoint, duty)
}

/// Dead-time in timer ticks: `ns * freq * 2^bits / 1e9`, truncated.
pub fn dead_time_ticks(dead_time_ns: u32, freq_hz: u32, resolution_bits: u8) -> u32 {
    let ticks_per_sec = freq_hz as u64 * (1u64 << resolution_bits);
    (dead_time_ns as u64 * ticks_per_sec / 1_000_000_000) as u32
}

pub struct PwmDriver {
    settings: PwmSettings,
    dead_ticks: u32,
    percent: u8,
    compare: u32,
    complement: (u32, u32),
}

impl PwmDriver {
    pub fn new(settings: PwmSettings) -> Self {
        let dead_ticks = if settings.complementary {
            dead_time_ticks(
                settings.dead_time_ns,
                settings.freq_hz,
                settings.resolution_bits,
            )
        } else {
            0
        };
        Self {
            settings,
            dead_ticks,
            percent: 0,
            compare: 0,
            complement: (0, 0),
        }
    }

    pub fn set_duty_percent(&mut self, percent: u8) -> Result<(), PwmError> {
        if percent > 100 {
            return Err(PwmError::DutyOutOfRange(percent));
        }
        let period = self.settings.period();
        let compare = compare_for(percent, period);
        hw_init::ledc_set_raw(hw_init::LEDC_CH_PWM, compare, 0)?;

        if self.settings.complementary {
            let (hpoint, duty) = complementary_window(compare, self.dead_ticks, period);
            hw_init::ledc_set_raw(hw_init::LEDC_CH_PWM_N, duty, hpoint)?;
            self.complement = (hpoint, duty);
        }

        self.percent = percent;
        self.compare = compare;
        debug!("PWM: {}% -> compare {}/{}", percent, compare, period + 1);
        Ok(())
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Last value written to the main channel.
    pub fn compare(&self) -> u32 {
        self.compare
    }

    /// Last `(hpoint, duty)` written to the complementary channel.
    pub fn complement(&self) -> (u32, u32) {
        self.complement
    }

    pub fn dead_ticks(&self) -> u32 {
        self.dead_ticks
    }
}
