//! PWM Bench Tool Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          Lcd<ParallelBus>    LogEventSink     │
//! │  (Sensor+Output+Button)   (Display)           (EventSink)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              BenchService (pure logic)                 │    │
//! │  │  Scheduler · Buttons · Countdown · Alarm               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Delay, FreeRtos};
use log::{error, info, warn};

use pwmbench::adapters::hardware::HardwareAdapter;
use pwmbench::adapters::log_sink::LogEventSink;
use pwmbench::adapters::time::Esp32TimeAdapter;
use pwmbench::app::service::BenchService;
use pwmbench::config::BenchConfig;
use pwmbench::drivers::hw_init::{self, GpioOutput};
use pwmbench::drivers::lcd::Lcd;
use pwmbench::drivers::lcd_bus::ParallelBus;
use pwmbench::drivers::pwm::PwmDriver;
use pwmbench::drivers::watchdog::Watchdog;
use pwmbench::pins;
use pwmbench::sensors::temperature::{OneshotAdc, TemperatureSensor};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PwmBench v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = BenchConfig::for_build();
    let config_error = config.validate().err();
    match serde_json::to_string(&config) {
        Ok(json) => info!("Config: {}", json),
        Err(e) => warn!("Config: not serialisable ({})", e),
    }

    // ── 3. Construct adapters ─────────────────────────────────
    let time = Esp32TimeAdapter::new();
    let mut watchdog = Watchdog::new(config.watchdog_timeout_ms);

    let bus = ParallelBus::new(
        GpioOutput(pins::LCD.rs),
        GpioOutput(pins::LCD.en),
        GpioOutput(pins::LCD.data[0]),
        GpioOutput(pins::LCD.data[1]),
        GpioOutput(pins::LCD.data[2]),
        GpioOutput(pins::LCD.data[3]),
    );
    let mut lcd = Lcd::new(bus, Delay::new_default(), config.lcd);

    let mut hw = HardwareAdapter::new(
        TemperatureSensor::new(OneshotAdc::new(hw_init::ADC1_CH_TEMP), config.sensor),
        PwmDriver::new(config.pwm),
        Delay::new_default(),
    );
    let mut log_sink = LogEventSink::new();
    let mut app = BenchService::new(config.clone());

    // ── 4. Display first, then config and peripherals ─────────
    // Any failure from here on lands on the LCD via enter_fatal.
    let init = hw_init::init_outputs()
        .map_err(|e| {
            error!("Output init failed: {}", e);
            e.short_reason()
        })
        .and_then(|()| {
            lcd.init().map_err(|e| {
                error!("LCD init failed: {}", e);
                "LCD init"
            })
        })
        .and_then(|()| match config_error {
            Some(e) => {
                error!("Invalid configuration: {}", e);
                Err("bad config")
            }
            None => Ok(()),
        })
        .and_then(|()| {
            hw_init::init_peripherals(&config).map_err(|e| {
                error!("HAL init failed: {}", e);
                e.short_reason()
            })
        });

    match init {
        Ok(()) => {
            app.start(time.now_ms(), &mut hw, &mut lcd, &mut log_sink);
            info!("System ready. Entering main loop.");
        }
        Err(reason) => app.enter_fatal(reason, &mut hw, &mut lcd, &mut log_sink),
    }

    // ── 5. Main loop ──────────────────────────────────────────
    loop {
        let now = time.now_ms();
        app.tick(now, &mut hw, &mut lcd, &mut log_sink);
        watchdog.feed(now);
        // Yield so the idle task can run.
        FreeRtos::delay_ms(1);
    }
}
