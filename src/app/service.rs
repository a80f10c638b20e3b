//! Application service — the hexagonal core.
//!
//! [`BenchService`] owns the runtime state, the interval scheduler and the
//! button debouncers. One call to [`BenchService::tick`] is one pass of the
//! main loop. All I/O flows through port traits injected at call sites,
//! making the entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!  ButtonPort ──▶ │      BenchService       │ ──▶ DisplayPort
//!  OutputPort ◀── │ Scheduler · Buttons     │
//!                 └─────────────────────────┘
//! ```

use log::{error, info, warn};

use crate::config::BenchConfig;
use crate::drivers::button::{Button, ButtonDriver};
use crate::error::DisplayError;
use crate::scheduler::{Scheduler, TaskId};

use super::events::{AppEvent, TelemetryData};
use super::ports::{ButtonPort, DisplayPort, EventSink, OutputPort, SensorPort};
use super::screens::{fit_line, render_output, render_temperature};
use super::state::{CountdownTick, RuntimeState, Screen};

/// Coarse lifecycle of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Welcome message on screen since `since_ms`.
    Splash { since_ms: u32 },
    Running,
    /// Outputs off, loop idles.
    Fatal,
}

/// A non-blocking buzzer pulse.
#[derive(Debug, Clone, Copy)]
struct Beep {
    start_ms: u32,
    duration_ms: u32,
}

impl Beep {
    fn active(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.start_ms) < self.duration_ms
    }
}

/// Output levels last written to the alarm LED and buzzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AlarmOutputs {
    led: bool,
    buzzer: bool,
}

pub struct BenchService {
    config: BenchConfig,
    state: RuntimeState,
    scheduler: Scheduler,
    buttons: [ButtonDriver; 3],
    phase: Phase,
    /// Blink phase while the alarm is active.
    alarm_on: bool,
    beep: Option<Beep>,
    written: Option<AlarmOutputs>,
    sensor_ok: bool,
    display_ok: bool,
}

impl BenchService {
    /// Construct the service. Does **not** touch hardware; call
    /// [`start`](Self::start) next.
    pub fn new(config: BenchConfig) -> Self {
        let state = RuntimeState::new(config.duty_step_percent, config.countdown_start_secs);
        let scheduler = Scheduler::new(&config);
        let debounce = config.button_debounce_ms;
        let buttons = Button::ALL.map(|b| {
            let repeat = match b {
                Button::Up | Button::Down => config.duty_repeat_ms,
                Button::Screen => config.screen_repeat_ms,
            };
            ButtonDriver::new(b, debounce, repeat)
        });

        Self {
            config,
            state,
            scheduler,
            buttons,
            phase: Phase::Splash { since_ms: 0 },
            alarm_on: false,
            beep: None,
            written: None,
            sensor_ok: true,
            display_ok: true,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Output off, welcome message, boot beep, enter the splash phase.
    pub fn start(
        &mut self,
        now_ms: u32,
        hw: &mut impl OutputPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        self.apply_duty(hw);
        let welcome = display.display_welcome(
            self.config.welcome_line1.as_str(),
            self.config.welcome_line2.as_str(),
        );
        self.report_display(welcome);

        self.start_beep(now_ms, self.config.boot_beep_ms);
        self.phase = Phase::Splash { since_ms: now_ms };
        self.write_alarm_outputs(now_ms, hw);

        sink.emit(&AppEvent::Started);
        info!(
            "BenchService started (splash {} ms, countdown {} s)",
            self.config.splash_ms, self.state.countdown_secs
        );
    }

    /// Turn every output off and park on the error screen.
    pub fn enter_fatal(
        &mut self,
        reason: &'static str,
        hw: &mut impl OutputPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        hw.all_off();
        self.state.duty_cycle = 0;
        self.beep = None;
        self.alarm_on = false;
        self.written = Some(AlarmOutputs { led: false, buzzer: false });
        self.phase = Phase::Fatal;

        error!("FATAL: {}", reason);
        let detail = fit_line(reason);
        let shown = match display.display_welcome("FATAL ERROR", detail.as_str()) {
            // Failed before the display was brought up.
            Err(DisplayError::NotReady) => display
                .init()
                .and_then(|()| display.display_welcome("FATAL ERROR", detail.as_str())),
            other => other,
        };
        if let Err(e) = shown {
            error!("FATAL: error screen not shown ({})", e);
        }
        sink.emit(&AppEvent::Fatal(reason));
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// One main-loop pass.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + OutputPort + ButtonPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        match self.phase {
            Phase::Fatal => return,
            Phase::Splash { since_ms } => {
                if now_ms.wrapping_sub(since_ms) < self.config.splash_ms {
                    self.write_alarm_outputs(now_ms, hw);
                    return;
                }
                let cleared = display.clear();
                self.report_display(cleared);
                self.scheduler.reset();
                self.phase = Phase::Running;
                sink.emit(&AppEvent::SplashFinished);
                info!("Splash done, entering main loop");
            }
            Phase::Running => {}
        }

        // 1. Temperature sample
        if self.scheduler.poll(TaskId::SampleTemperature, now_ms) {
            self.sample_temperature(hw, sink);
        }

        // 2. Alert evaluation
        self.evaluate_alert(sink);

        // 3. Alarm blink
        if self.state.temp_alert_active && self.scheduler.poll(TaskId::AlarmBlink, now_ms) {
            self.alarm_on = !self.alarm_on;
        }

        // 4. Display refresh
        if self.scheduler.poll(TaskId::DisplayRefresh, now_ms) {
            self.refresh_display(display);
        }

        // 5. Buttons (every pass)
        self.poll_buttons(now_ms, hw, display, sink);

        // 6. Countdown
        if self.state.duty_cycle > 0
            && self.scheduler.poll(TaskId::Countdown, now_ms)
            && self.state.tick_countdown() == CountdownTick::Expired
        {
            self.apply_duty(hw);
            sink.emit(&AppEvent::CountdownExpired);
            warn!("Countdown expired, output forced off");
        }

        // 7. Telemetry
        if self.scheduler.poll(TaskId::Telemetry, now_ms) {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry(now_ms)));
        }

        // 8. Alarm LED / buzzer
        self.write_alarm_outputs(now_ms, hw);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn build_telemetry(&self, now_ms: u32) -> TelemetryData {
        TelemetryData {
            uptime_ms: now_ms,
            duty_percent: self.state.duty_cycle,
            countdown_secs: self.state.countdown_secs,
            temperature_c: self.state.temperature_c,
            alarm_active: self.state.temp_alert_active,
            screen: self.state.current_screen,
            sensor_ok: self.sensor_ok,
        }
    }

    // ── Tasks ─────────────────────────────────────────────────

    fn sample_temperature(&mut self, hw: &mut impl SensorPort, sink: &mut impl EventSink) {
        match hw.read_temperature() {
            Ok(celsius) => {
                self.state.temperature_c = celsius;
                if !self.sensor_ok {
                    self.sensor_ok = true;
                    sink.emit(&AppEvent::SensorRecovered);
                }
            }
            Err(e) => {
                if self.sensor_ok {
                    self.sensor_ok = false;
                    warn!("Temperature read failed: {} (keeping {:.1})", e, self.state.temperature_c);
                    sink.emit(&AppEvent::SensorFault(e));
                }
            }
        }
    }

    fn evaluate_alert(&mut self, sink: &mut impl EventSink) {
        let alert = self.state.temperature_c >= self.config.alarm_threshold_c;
        if alert == self.state.temp_alert_active {
            return;
        }
        self.state.temp_alert_active = alert;
        let temperature_c = self.state.temperature_c;
        if alert {
            sink.emit(&AppEvent::AlarmRaised { temperature_c });
        } else {
            self.alarm_on = false;
            sink.emit(&AppEvent::AlarmCleared { temperature_c });
        }
    }

    fn refresh_display(&mut self, display: &mut impl DisplayPort) {
        let line = match self.state.current_screen {
            Screen::Output => render_output(self.state.duty_cycle, self.state.countdown_secs),
            Screen::Temperature => render_temperature(self.state.temperature_c, self.config.temp_unit),
        };
        let result = display
            .set_cursor(0, 0)
            .and_then(|()| display.print(line.as_str()));
        self.report_display(result);
    }

    fn poll_buttons(
        &mut self,
        now_ms: u32,
        hw: &mut (impl OutputPort + ButtonPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        for i in 0..self.buttons.len() {
            let button = self.buttons[i].button();
            let pressed = hw.is_pressed(button);
            if !self.buttons[i].poll(pressed, now_ms) {
                continue;
            }

            match button {
                Button::Up | Button::Down => {
                    let from = self.state.duty_cycle;
                    let changed = if button == Button::Up {
                        self.state.increase_duty()
                    } else {
                        self.state.decrease_duty()
                    };
                    if changed {
                        self.apply_duty(hw);
                        self.start_beep(now_ms, self.config.press_beep_ms);
                        sink.emit(&AppEvent::DutyChanged { from, to: self.state.duty_cycle });
                    }
                }
                Button::Screen => {
                    let screen = self.state.toggle_screen();
                    self.start_beep(now_ms, self.config.press_beep_ms);
                    let cleared = display.clear();
                    self.report_display(cleared);
                    sink.emit(&AppEvent::ScreenChanged(screen));
                }
            }
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_duty(&mut self, hw: &mut impl OutputPort) {
        if let Err(e) = hw.set_duty(self.state.duty_cycle) {
            warn!("PWM update failed: {}", e);
        }
    }

    fn start_beep(&mut self, now_ms: u32, duration_ms: u32) {
        self.beep = Some(Beep { start_ms: now_ms, duration_ms });
    }

    /// Derive LED/buzzer levels and write them only on change.
    fn write_alarm_outputs(&mut self, now_ms: u32, hw: &mut impl OutputPort) {
        let beeping = self.beep.is_some_and(|b| b.active(now_ms));
        if !beeping {
            self.beep = None;
        }
        let blink = self.state.temp_alert_active && self.alarm_on;
        let next = AlarmOutputs {
            led: blink,
            buzzer: blink || beeping,
        };

        let prev = self.written;
        if prev.map(|p| p.led) != Some(next.led) {
            hw.set_alarm_led(next.led);
        }
        if prev.map(|p| p.buzzer) != Some(next.buzzer) {
            hw.set_buzzer(next.buzzer);
        }
        self.written = Some(next);
    }

    /// Log display failures once per failure streak.
    fn report_display(&mut self, result: Result<(), DisplayError>) {
        match result {
            Ok(()) => self.display_ok = true,
            Err(e) if self.display_ok => {
                self.display_ok = false;
                warn!("Display write failed: {}", e);
            }
            Err(_) => {}
        }
    }
}
