//! Outbound application events.
//!
//! The [`BenchService`](super::service::BenchService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. The log adapter turns
//! them into tagged serial lines.

use crate::app::state::Screen;
use crate::error::SensorError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Welcome message shown, splash phase entered.
    Started,

    /// Splash elapsed; periodic tasks are running.
    SplashFinished,

    /// A button press changed the PWM duty.
    DutyChanged { from: u8, to: u8 },

    /// The Screen button switched the status page.
    ScreenChanged(Screen),

    /// Temperature reached the alarm threshold.
    AlarmRaised { temperature_c: f32 },

    /// Temperature fell back below the threshold.
    AlarmCleared { temperature_c: f32 },

    /// Countdown reached zero and the output was forced off.
    CountdownExpired,

    /// A temperature read failed; the previous value is kept.
    SensorFault(SensorError),

    /// Temperature reads succeed again after a fault.
    SensorRecovered,

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// Unrecoverable error; outputs are off.
    Fatal(&'static str),
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub uptime_ms: u32,
    pub duty_percent: u8,
    pub countdown_secs: u16,
    pub temperature_c: f32,
    pub alarm_active: bool,
    pub screen: Screen,
    pub sensor_ok: bool,
}
