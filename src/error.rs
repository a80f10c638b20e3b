//! Unified error types for the bench tool firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the main
//! loop and `main()` handle failures uniformly.  All variants are `Copy`
//! so they can be passed through the service and logged without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The character LCD rejected or could not execute an operation.
    Display(DisplayError),
    /// The temperature sensor could not be read.
    Sensor(SensorError),
    /// The PWM output could not be updated.
    Pwm(PwmError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is out of range.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Pwm(e) => write!(f, "pwm: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// An operation other than `init` was issued before the init handshake.
    NotReady,
    /// Cursor position outside the 16x2 grid.
    CursorOutOfRange { col: u8, row: u8 },
    /// A bus line (RS, EN or D4–D7) could not be driven.
    PinWrite,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "controller not initialised"),
            Self::CursorOutOfRange { col, row } => {
                write!(f, "cursor ({col}, {row}) outside 16x2 grid")
            }
            Self::PinWrite => write!(f, "bus pin write failed"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The ADC refused to start a conversion.
    StartFailed,
    /// The conversion did not complete within the configured bound.
    ConversionTimeout,
    /// The ADC driver returned an error while reading the result.
    AdcReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartFailed => write!(f, "ADC conversion start failed"),
            Self::ConversionTimeout => write!(f, "ADC conversion timed out"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// PWM errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    /// Requested duty is above 100 %.
    DutyOutOfRange(u8),
    /// The timer channel rejected the compare/hpoint update.
    ChannelWriteFailed,
}

impl fmt::Display for PwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DutyOutOfRange(p) => write!(f, "duty {p}% out of range 0-100"),
            Self::ChannelWriteFailed => write!(f, "PWM channel write failed"),
        }
    }
}

impl From<PwmError> for Error {
    fn from(e: PwmError) -> Self {
        Self::Pwm(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
