//! Linear analog temperature sensor (LM35 class, 10 mV/°C).
//!
//! Output voltage is proportional to temperature, so conversion is a single
//! scale: `raw * vref / full_scale * scale`. The ADC is driven through the
//! [`AdcConverter`] start / poll / read cycle, with the poll bounded by
//! `conversion_timeout_us` so a stuck converter cannot hang the loop.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`OneshotAdc`] reads ADC1 via the oneshot API (initialised
//! by hw_init).
//! On host/test: the same type reads the value injected with
//! `hw_init::sim_set_adc1`, and unit tests substitute their own converter.

use embedded_hal::delay::DelayNs;

use crate::config::SensorCalibration;
use crate::drivers::hw_init;
use crate::error::SensorError;

/// Busy-flag poll interval (µs).
pub const POLL_STEP_US: u32 = 10;

/// Start / poll / read access to one ADC channel.
pub trait AdcConverter {
    /// Begin a conversion.
    fn start(&mut self) -> Result<(), SensorError>;

    /// `true` while the conversion is still running.
    fn is_busy(&mut self) -> bool;

    /// Result of the last completed conversion.
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

/// Map a raw ADC code to °C.
pub fn raw_to_celsius(raw: u16, cal: &SensorCalibration) -> f32 {
    raw as f32 * cal.vref_volts / cal.full_scale_code as f32 * cal.scale
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    pub raw: u16,
    pub celsius: f32,
}

pub struct TemperatureSensor<A> {
    adc: A,
    cal: SensorCalibration,
}

impl<A: AdcConverter> TemperatureSensor<A> {
    pub fn new(adc: A, cal: SensorCalibration) -> Self {
        Self { adc, cal }
    }

    pub fn read<D: DelayNs>(&mut self, delay: &mut D) -> Result<TemperatureReading, SensorError> {
        self.adc.start()?;

        let mut waited_us = 0u32;
        while self.adc.is_busy() {
            if waited_us >= self.cal.conversion_timeout_us {
                return Err(SensorError::ConversionTimeout);
            }
            delay.delay_us(POLL_STEP_US);
            waited_us += POLL_STEP_US;
        }

        let raw = self.adc.read_raw()?;
        Ok(TemperatureReading {
            raw,
            celsius: raw_to_celsius(raw, &self.cal),
        })
    }
}

/// ADC1 oneshot channel.
///
/// The oneshot driver converts synchronously, so `start` already holds
/// the result and `is_busy` never reports a running conversion.
pub struct OneshotAdc {
    channel: u32,
    pending: Option<Result<u16, SensorError>>,
}

impl OneshotAdc {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            pending: None,
        }
    }
}

impl AdcConverter for OneshotAdc {
    fn start(&mut self) -> Result<(), SensorError> {
        self.pending = Some(hw_init::adc1_read(self.channel));
        Ok(())
    }

    fn is_busy(&mut self) -> bool {
        false
    }

    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.pending.take().unwrap_or(Err(SensorError::StartFailed))
    }
}
