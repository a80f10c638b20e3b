//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the temperature sensor and the PWM driver, and drives the alarm
//! GPIOs directly, exposing them through [`SensorPort`], [`OutputPort`] and
//! [`ButtonPort`]. On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::app::ports::{ButtonPort, OutputPort, SensorPort};
use crate::drivers::button::Button;
use crate::drivers::hw_init;
use crate::drivers::pwm::PwmDriver;
use crate::error::{PwmError, SensorError};
use crate::pins;
use crate::sensors::temperature::{OneshotAdc, TemperatureSensor};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<D> {
    temperature: TemperatureSensor<OneshotAdc>,
    pwm: PwmDriver,
    /// Used for the bounded ADC poll.
    delay: D,
}

impl<D: DelayNs> HardwareAdapter<D> {
    pub fn new(temperature: TemperatureSensor<OneshotAdc>, pwm: PwmDriver, delay: D) -> Self {
        Self {
            temperature,
            pwm,
            delay,
        }
    }

    pub fn pwm(&self) -> &PwmDriver {
        &self.pwm
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<D: DelayNs> SensorPort for HardwareAdapter<D> {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.temperature.read(&mut self.delay).map(|r| r.celsius)
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<D: DelayNs> OutputPort for HardwareAdapter<D> {
    fn set_duty(&mut self, percent: u8) -> Result<(), PwmError> {
        self.pwm.set_duty_percent(percent)
    }

    fn set_alarm_led(&mut self, on: bool) {
        hw_init::gpio_write(pins::ALARM_LED_GPIO, on);
    }

    fn set_buzzer(&mut self, on: bool) {
        hw_init::gpio_write(pins::BUZZER_GPIO, on);
    }

    fn all_off(&mut self) {
        if let Err(e) = self.pwm.set_duty_percent(0) {
            warn!("all_off: PWM write failed: {}", e);
        }
        hw_init::gpio_write(pins::ALARM_LED_GPIO, false);
        hw_init::gpio_write(pins::BUZZER_GPIO, false);
    }
}

// ── ButtonPort implementation ─────────────────────────────────

impl<D: DelayNs> ButtonPort for HardwareAdapter<D> {
    /// Active-low: a closed contact pulls the pin to ground.
    fn is_pressed(&mut self, button: Button) -> bool {
        !hw_init::gpio_read(button.gpio())
    }
}
