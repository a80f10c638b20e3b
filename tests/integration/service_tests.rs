//! End-to-end loop behaviour: BenchService driving the real LCD driver
//! over the HD44780 model, with mock sensor/buttons/outputs.

use pwmbench::app::events::AppEvent;
use pwmbench::app::service::{BenchService, Phase};
use pwmbench::app::state::Screen;
use pwmbench::config::BenchConfig;
use pwmbench::drivers::button::Button;
use pwmbench::drivers::lcd::{Lcd, LcdState};
use pwmbench::error::SensorError;

use crate::mock_hw::{CountingDelay, FakeHd44780, MockHardware, RecordingSink};

const STEP_MS: u32 = 10;

struct Bench {
    app: BenchService,
    hw: MockHardware,
    lcd: Lcd<FakeHd44780, CountingDelay>,
    sink: RecordingSink,
    now: u32,
}

impl Bench {
    fn powered_on(config: BenchConfig) -> Self {
        let timing = config.lcd;
        let mut bench = Self {
            app: BenchService::new(config),
            hw: MockHardware::new(),
            lcd: Lcd::new(FakeHd44780::new(), CountingDelay::default(), timing),
            sink: RecordingSink::new(),
            now: 0,
        };
        bench.lcd.init().unwrap();
        bench
            .app
            .start(0, &mut bench.hw, &mut bench.lcd, &mut bench.sink);
        bench
    }

    /// Powered on and through the splash phase.
    fn running(config: BenchConfig) -> Self {
        let mut bench = Self::powered_on(config);
        bench.run_until(2000);
        bench
    }

    fn tick(&mut self) {
        self.app
            .tick(self.now, &mut self.hw, &mut self.lcd, &mut self.sink);
    }

    fn run_until(&mut self, t: u32) {
        while self.now < t {
            self.now += STEP_MS;
            self.tick();
        }
    }

    fn run_for(&mut self, ms: u32) {
        let t = self.now + ms;
        self.run_until(t);
    }

    fn row(&self, r: usize) -> String {
        self.lcd.bus().row_trimmed(r)
    }

    fn duty(&self) -> u8 {
        self.app.state().duty_cycle
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn power_on_shows_welcome_then_status_page() {
    let mut b = Bench::powered_on(BenchConfig::default());
    assert_eq!(b.row(0), "System Started");
    assert_eq!(b.row(1), "Waiting...");
    assert!(b.hw.buzzer_on(), "boot beep");
    assert_eq!(b.hw.duty(), 0);

    b.run_until(1990);
    assert_eq!(b.row(0), "System Started");
    assert!(!b.hw.buzzer_on(), "boot beep lasts 200 ms");
    assert_eq!(b.hw.reads, 0, "no sampling during splash");

    b.run_until(2000);
    assert_eq!(b.app.phase(), Phase::Running);
    assert_eq!(b.row(0), "PWM:0% T:60s");
    assert_eq!(b.row(1), "");
    assert_eq!(b.sink.events[0], AppEvent::Started);
    assert!(b.sink.events.contains(&AppEvent::SplashFinished));
}

#[test]
fn custom_greeting_is_used() {
    let mut config = BenchConfig::default();
    config.welcome_line1 = "Bench v2".try_into().unwrap();
    config.welcome_line2 = "hello".try_into().unwrap();
    let b = Bench::powered_on(config);
    assert_eq!(b.row(0), "Bench v2");
    assert_eq!(b.row(1), "hello");
}

// ── Buttons and duty ──────────────────────────────────────────

#[test]
fn up_press_raises_duty_and_beeps() {
    let mut b = Bench::running(BenchConfig::default());
    let beeps = b.hw.beeps();
    b.hw.hold(Button::Up);
    b.run_for(50);
    b.hw.release(Button::Up);
    assert_eq!(b.duty(), 5);
    assert_eq!(b.hw.duty(), 5);
    assert_eq!(b.hw.beeps(), beeps + 1);

    b.run_for(200);
    assert!(b.row(0).starts_with("PWM:5% T:"));
}

#[test]
fn duty_clamps_at_100_and_0() {
    let mut b = Bench::running(BenchConfig::default());
    b.hw.hold(Button::Up);
    b.run_for(6000);
    b.hw.release(Button::Up);
    assert_eq!(b.duty(), 100);
    assert_eq!(b.hw.duty(), 100);
    let changes = b.sink.count(|e| matches!(e, AppEvent::DutyChanged { .. }));
    assert_eq!(changes, 20, "no change events while clamped");

    let beeps = b.hw.beeps();
    b.hw.hold(Button::Up);
    b.run_for(1000);
    b.hw.release(Button::Up);
    assert_eq!(b.hw.beeps(), beeps, "no beep at the limit");

    b.hw.hold(Button::Down);
    b.run_for(6000);
    b.hw.release(Button::Down);
    assert_eq!(b.duty(), 0);
    assert_eq!(b.hw.duty(), 0);
}

#[test]
fn held_button_does_not_starve_other_tasks() {
    let mut b = Bench::running(BenchConfig::default());
    b.hw.hold(Button::Up);
    let reads = b.hw.reads;
    b.run_for(1000);
    // 100 ms sampling continues while the button is held
    assert!(b.hw.reads - reads >= 9);
}

#[test]
fn screen_button_switches_page() {
    let mut b = Bench::running(BenchConfig::default());
    b.hw.temperature = Ok(23.46);
    b.hw.hold(Button::Screen);
    b.run_for(40);
    b.hw.release(Button::Screen);
    assert_eq!(b.app.state().current_screen, Screen::Temperature);
    assert!(b.sink.events.contains(&AppEvent::ScreenChanged(Screen::Temperature)));

    b.run_for(200);
    assert_eq!(b.row(0), "Temp: 23.5 C");

    b.run_for(400);
    b.hw.hold(Button::Screen);
    b.run_for(40);
    b.hw.release(Button::Screen);
    b.run_for(200);
    assert_eq!(b.row(0), "PWM:0% T:60s");
}

#[test]
fn complementary_preset_shows_bare_temperature() {
    let mut b = Bench::running(BenchConfig::complementary());
    b.hw.temperature = Ok(21.0);
    b.hw.hold(Button::Screen);
    b.run_for(40);
    b.hw.release(Button::Screen);
    b.run_for(200);
    assert_eq!(b.row(0), "Temp: 21.0");
}

// ── Countdown ─────────────────────────────────────────────────

#[test]
fn countdown_runs_only_while_output_is_on_and_forces_it_off() {
    let mut b = Bench::running(BenchConfig::default());
    b.run_for(3000);
    assert_eq!(b.app.state().countdown_secs, 60, "idle output does not count");

    b.hw.hold(Button::Up);
    while b.duty() == 0 {
        b.run_for(STEP_MS);
    }
    b.hw.release(Button::Up);
    let t0 = b.now;
    assert_eq!(b.app.state().countdown_secs, 59);

    b.run_until(t0 + 10_000 - STEP_MS);
    assert_eq!(b.app.state().countdown_secs, 50);

    b.run_until(t0 + 59_000 - STEP_MS);
    assert_eq!(b.app.state().countdown_secs, 1);
    assert_eq!(b.duty(), 5);

    b.run_until(t0 + 59_000);
    assert_eq!(b.app.state().countdown_secs, 0);
    assert_eq!(b.duty(), 0);
    assert_eq!(b.hw.duty(), 0);
    assert_eq!(b.sink.count(|e| *e == AppEvent::CountdownExpired), 1);

    b.run_for(5000);
    assert_eq!(b.app.state().countdown_secs, 0);
    assert_eq!(b.row(0), "PWM:0% T:0s");
}

#[test]
fn output_turned_on_after_expiry_is_cut_on_next_tick() {
    let mut config = BenchConfig::default();
    config.countdown_start_secs = 1;
    let mut b = Bench::running(config);

    b.hw.hold(Button::Up);
    b.run_for(50);
    b.hw.release(Button::Up);
    assert_eq!(b.app.state().countdown_secs, 0);
    assert_eq!(b.duty(), 0);

    b.run_for(300);
    b.hw.hold(Button::Up);
    while b.duty() == 0 {
        b.run_for(STEP_MS);
    }
    b.hw.release(Button::Up);
    b.run_for(1000);
    assert_eq!(b.duty(), 0);
}

// ── Temperature alarm ─────────────────────────────────────────

#[test]
fn over_temperature_blinks_led_and_buzzer() {
    let mut b = Bench::running(BenchConfig::default());
    b.hw.temperature = Ok(55.0);
    b.run_for(100);
    assert!(b.app.state().temp_alert_active);

    let mut led_edges = 0;
    let mut last = b.hw.led_on();
    for _ in 0..100 {
        b.run_for(STEP_MS);
        let led = b.hw.led_on();
        assert_eq!(led, b.hw.buzzer_on(), "buzzer follows the LED");
        if led != last {
            led_edges += 1;
            last = led;
        }
    }
    // 1 s at 100 ms per toggle
    assert!((9..=11).contains(&led_edges), "edges = {led_edges}");

    b.hw.temperature = Ok(49.0);
    b.run_for(200);
    assert!(!b.app.state().temp_alert_active);
    assert!(!b.hw.led_on());
    assert!(!b.hw.buzzer_on());
    assert_eq!(b.sink.count(|e| matches!(e, AppEvent::AlarmRaised { .. })), 1);
    assert_eq!(b.sink.count(|e| matches!(e, AppEvent::AlarmCleared { .. })), 1);
}

#[test]
fn threshold_is_inclusive() {
    let mut b = Bench::running(BenchConfig::complementary());
    b.hw.temperature = Ok(30.0);
    b.run_for(100);
    assert!(b.app.state().temp_alert_active);
}

// ── Sensor faults and telemetry ───────────────────────────────

#[test]
fn sensor_fault_keeps_last_value_and_reports_once() {
    let mut b = Bench::running(BenchConfig::default());
    b.hw.temperature = Ok(31.5);
    b.run_for(200);
    b.hw.temperature = Err(SensorError::ConversionTimeout);
    b.run_for(1000);
    assert!((b.app.state().temperature_c - 31.5).abs() < f32::EPSILON);
    assert_eq!(
        b.sink
            .count(|e| *e == AppEvent::SensorFault(SensorError::ConversionTimeout)),
        1
    );

    b.hw.temperature = Ok(32.0);
    b.run_for(200);
    assert!(b.sink.events.contains(&AppEvent::SensorRecovered));
    assert!((b.app.state().temperature_c - 32.0).abs() < f32::EPSILON);
}

#[test]
fn telemetry_every_five_seconds() {
    let mut b = Bench::running(BenchConfig::default());
    b.run_for(15_000);
    let n = b.sink.count(|e| matches!(e, AppEvent::Telemetry(_)));
    // one at splash end, then every 5 s
    assert_eq!(n, 4);
}

// ── Fatal ─────────────────────────────────────────────────────

#[test]
fn fatal_error_shows_reason_and_stops() {
    let mut b = Bench::running(BenchConfig::default());
    b.app.enter_fatal("PWM init", &mut b.hw, &mut b.lcd, &mut b.sink);
    assert_eq!(b.row(0), "FATAL ERROR");
    assert_eq!(b.row(1), "PWM init");
    assert_eq!(b.hw.calls.last(), Some(&crate::mock_hw::OutputCall::AllOff));

    let calls = b.hw.calls.len();
    b.hw.hold(Button::Up);
    b.run_for(1000);
    assert_eq!(b.hw.calls.len(), calls);
    assert_eq!(b.row(0), "FATAL ERROR");
}

#[test]
fn fatal_before_display_init_still_shows_reason() {
    let config = BenchConfig::default();
    let timing = config.lcd;
    let mut app = BenchService::new(config);
    let mut hw = MockHardware::new();
    let mut lcd = Lcd::new(FakeHd44780::new(), CountingDelay::default(), timing);
    let mut sink = RecordingSink::new();
    assert_eq!(lcd.state(), LcdState::Uninitialized);

    app.enter_fatal("ADC init", &mut hw, &mut lcd, &mut sink);

    assert_eq!(app.phase(), Phase::Fatal);
    assert_eq!(lcd.state(), LcdState::Ready);
    assert!(lcd.bus().four_bit);
    assert_eq!(lcd.bus().row_trimmed(0), "FATAL ERROR");
    assert_eq!(lcd.bus().row_trimmed(1), "ADC init");
    assert_eq!(hw.calls, vec![crate::mock_hw::OutputCall::AllOff]);
    assert_eq!(sink.events, vec![AppEvent::Fatal("ADC init")]);
}
