//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions, the temperature ADC channel and the LEDC
//! timer/channels using raw ESP-IDF sys calls. `init_outputs` runs first
//! so the LCD can report any later failure; `init_peripherals` does the
//! rest. Both are called once from `main()` before the loop starts.
//!
//! Also hosts the thin register-access helpers the drivers share
//! (`gpio_read`, `gpio_write`, `adc1_read`, `ledc_set_raw`).

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};
use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::config::BenchConfig;
use crate::error::{PwmError, SensorError};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

impl HwInitError {
    /// Short reason for the fatal screen (fits one LCD row).
    pub fn short_reason(&self) -> &'static str {
        match self {
            Self::AdcInitFailed(_) => "ADC init",
            Self::GpioConfigFailed(_) => "GPIO init",
            Self::LedcInitFailed(_) => "PWM init",
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

/// LCD bus, buzzer and alarm LED as push-pull outputs, all driven low.
#[cfg(target_os = "espidf")]
pub fn init_outputs() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the loop; single-threaded.
    unsafe { init_gpio_outputs() }
}

#[cfg(not(target_os = "espidf"))]
pub fn init_outputs() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): output init skipped");
    Ok(())
}

/// Button inputs, temperature ADC and LEDC.
#[cfg(target_os = "espidf")]
pub fn init_peripherals(config: &BenchConfig) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_adc()?;
        init_ledc(config)?;
    }
    info!("hw_init: inputs, ADC and LEDC configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(_config: &BenchConfig) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

/// ADC1 channel wired to the temperature sensor (GPIO 2).
pub const ADC1_CH_TEMP: u32 = 1;

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), ADC1_CH_TEMP, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    info!("hw_init: ADC1 configured (CH{}=temp, GPIO{})", ADC1_CH_TEMP, pins::TEMP_ADC_GPIO);
    Ok(())
}

/// One conversion on ADC1. The driver bounds the wait internally and
/// reports `ESP_ERR_TIMEOUT` when the conversion does not complete.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    match ret {
        r if r == ESP_OK as i32 => Ok(raw.max(0) as u16),
        r if r == ESP_ERR_TIMEOUT as i32 => Err(SensorError::ConversionTimeout),
        _ => Err(SensorError::AdcReadFailed),
    }
}

#[cfg(not(target_os = "espidf"))]
static SIM_ADC1: AtomicU16 = AtomicU16::new(0);

/// Inject the raw code the simulated ADC returns.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc1(raw: u16) {
    SIM_ADC1.store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> Result<u16, SensorError> {
    Ok(SIM_ADC1.load(Ordering::Relaxed))
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let mask = [pins::BUTTON_UP_GPIO, pins::BUTTON_DOWN_GPIO, pins::BUTTON_SCREEN_GPIO]
        .iter()
        .fold(0u64, |m, &pin| m | (1u64 << pin));

    let cfg = gpio_config_t {
        pin_bit_mask: mask,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    info!("hw_init: button inputs configured (pull-up)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: read-only register access on an already-configured input.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Host: every input reads high (buttons released).
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let lcd = pins::LCD.all();
    let output_pins = lcd
        .iter()
        .chain(&[pins::BUZZER_GPIO, pins::ALARM_LED_GPIO]);

    for &pin in output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured (LCD, buzzer, alarm LED)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an output configured in
    // init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

/// A configured push-pull output as an `embedded-hal` pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioOutput(pub i32);

impl ErrorType for GpioOutput {
    type Error = Infallible;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        gpio_write(self.0, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        gpio_write(self.0, true);
        Ok(())
    }
}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_PWM: u32 = 0;
pub const LEDC_CH_PWM_N: u32 = 1;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc(config: &BenchConfig) -> Result<(), HwInitError> {
    let pwm = config.pwm;

    // Timer 0 shared by both channels so their phases stay locked.
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: pwm.resolution_bits as ledc_timer_bit_t,
        freq_hz: pwm.freq_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    let mut channels = heapless::Vec::<(u32, i32), 2>::new();
    // Capacity 2 and at most two pushes.
    let _ = channels.push((LEDC_CH_PWM, pins::PWM_GPIO));
    if pwm.complementary {
        let _ = channels.push((LEDC_CH_PWM_N, pins::PWM_N_GPIO));
    }

    for &(channel, gpio) in &channels {
        let ret = unsafe {
            ledc_channel_config(&ledc_channel_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                channel,
                timer_sel: ledc_timer_t_LEDC_TIMER_0,
                gpio_num: gpio,
                duty: 0,
                hpoint: 0,
                ..Default::default()
            })
        };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcInitFailed(ret));
        }
    }

    info!(
        "hw_init: LEDC configured ({} Hz, {} bit, channels={})",
        pwm.freq_hz,
        pwm.resolution_bits,
        channels.len()
    );
    Ok(())
}

/// Write a raw duty/hpoint pair and latch it.
#[cfg(target_os = "espidf")]
pub fn ledc_set_raw(channel: u32, duty: u32, hpoint: u32) -> Result<(), PwmError> {
    // SAFETY: channels were configured in init_ledc(); only the main loop
    // writes duty registers.
    unsafe {
        let ret = ledc_set_duty_with_hpoint(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty, hpoint);
        if ret != ESP_OK as i32 {
            return Err(PwmError::ChannelWriteFailed);
        }
        let ret = ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
        if ret != ESP_OK as i32 {
            return Err(PwmError::ChannelWriteFailed);
        }
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set_raw(_channel: u32, _duty: u32, _hpoint: u32) -> Result<(), PwmError> {
    Ok(())
}
