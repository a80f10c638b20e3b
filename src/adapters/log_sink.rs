//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | up={}ms | pwm={}% | countdown={}s | T={:.1}\u{00b0}C{} | \
                     alarm={} | screen={:?}",
                    t.uptime_ms,
                    t.duty_percent,
                    t.countdown_secs,
                    t.temperature_c,
                    if t.sensor_ok { "" } else { " (stale)" },
                    if t.alarm_active { "ON" } else { "off" },
                    t.screen,
                );
            }
            AppEvent::Started => info!("START | welcome shown"),
            AppEvent::SplashFinished => info!("START | splash done"),
            AppEvent::DutyChanged { from, to } => info!("PWM   | {}% -> {}%", from, to),
            AppEvent::ScreenChanged(screen) => info!("LCD   | screen {:?}", screen),
            AppEvent::AlarmRaised { temperature_c } => {
                warn!("ALARM | raised at {:.1}\u{00b0}C", temperature_c);
            }
            AppEvent::AlarmCleared { temperature_c } => {
                info!("ALARM | cleared at {:.1}\u{00b0}C", temperature_c);
            }
            AppEvent::CountdownExpired => warn!("TIMER | countdown expired, output off"),
            AppEvent::SensorFault(e) => warn!("SENSE | {}", e),
            AppEvent::SensorRecovered => info!("SENSE | recovered"),
            AppEvent::Fatal(reason) => error!("FATAL | {}", reason),
        }
    }
}
