//! Runtime state shared by the loop tasks.

/// Which status page the LCD shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// `PWM:<duty>% T:<countdown>s`
    #[default]
    Output,
    /// `Temp: <t> C`
    Temperature,
}

impl Screen {
    pub fn toggled(self) -> Self {
        match self {
            Self::Output => Self::Temperature,
            Self::Temperature => Self::Output,
        }
    }
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    Running(u16),
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeState {
    /// 0–100 in steps of `duty_step`.
    pub duty_cycle: u8,
    pub current_screen: Screen,
    /// Last good reading (°C).
    pub temperature_c: f32,
    /// 0–60; never reloads.
    pub countdown_secs: u16,
    pub temp_alert_active: bool,
    duty_step: u8,
}

impl RuntimeState {
    pub fn new(duty_step: u8, countdown_secs: u16) -> Self {
        Self {
            duty_cycle: 0,
            current_screen: Screen::Output,
            temperature_c: 0.0,
            countdown_secs,
            temp_alert_active: false,
            duty_step,
        }
    }

    /// Step up, saturating at 100. Returns `true` if the duty changed.
    pub fn increase_duty(&mut self) -> bool {
        if self.duty_cycle >= 100 {
            return false;
        }
        self.duty_cycle = (self.duty_cycle + self.duty_step).min(100);
        true
    }

    /// Step down, saturating at 0. Returns `true` if the duty changed.
    pub fn decrease_duty(&mut self) -> bool {
        if self.duty_cycle == 0 {
            return false;
        }
        self.duty_cycle = self.duty_cycle.saturating_sub(self.duty_step);
        true
    }

    pub fn toggle_screen(&mut self) -> Screen {
        self.current_screen = self.current_screen.toggled();
        self.current_screen
    }

    /// One 1 s countdown step. Reaching zero forces the duty to 0 in the
    /// same step.
    pub fn tick_countdown(&mut self) -> CountdownTick {
        self.countdown_secs = self.countdown_secs.saturating_sub(1);
        if self.countdown_secs == 0 {
            self.duty_cycle = 0;
            CountdownTick::Expired
        } else {
            CountdownTick::Running(self.countdown_secs)
        }
    }
}
