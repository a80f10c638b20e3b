//! Polled, non-blocking push-button debouncer with hold-to-repeat.
//!
//! ## Hardware
//!
//! Active-low momentary switches with the internal pull-up enabled. The
//! contact level is sampled once per main-loop iteration; this module only
//! sees `pressed: bool` and a millisecond timestamp.
//!
//! ## Acceptance rule
//!
//! | Condition                                         | Result   |
//! |---------------------------------------------------|----------|
//! | Contact pressed continuously for `debounce_ms`    | eligible |
//! | `repeat_ms` since this button's last accepted press | fire   |
//! | Contact released                                  | reset    |
//!
//! Holding a button fires once per `repeat_ms` without ever blocking the
//! loop.

use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Screen,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Up, Button::Down, Button::Screen];

    pub fn gpio(self) -> i32 {
        match self {
            Self::Up => pins::BUTTON_UP_GPIO,
            Self::Down => pins::BUTTON_DOWN_GPIO,
            Self::Screen => pins::BUTTON_SCREEN_GPIO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    Released,
    Debouncing { since_ms: u32 },
    Held,
}

pub struct ButtonDriver {
    button: Button,
    debounce_ms: u32,
    repeat_ms: u32,
    contact: Contact,
    last_fire_ms: Option<u32>,
}

impl ButtonDriver {
    pub fn new(button: Button, debounce_ms: u32, repeat_ms: u32) -> Self {
        Self {
            button,
            debounce_ms,
            repeat_ms,
            contact: Contact::Released,
            last_fire_ms: None,
        }
    }

    pub fn button(&self) -> Button {
        self.button
    }

    /// Feed the current contact level. Returns `true` when a press is
    /// accepted on this call.
    pub fn poll(&mut self, pressed: bool, now_ms: u32) -> bool {
        if !pressed {
            self.contact = Contact::Released;
            return false;
        }

        if self.contact == Contact::Released {
            self.contact = Contact::Debouncing { since_ms: now_ms };
        }

        if let Contact::Debouncing { since_ms } = self.contact {
            if now_ms.wrapping_sub(since_ms) < self.debounce_ms {
                return false;
            }
            self.contact = Contact::Held;
        }

        let due = match self.last_fire_ms {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) >= self.repeat_ms,
        };
        if due {
            self.last_fire_ms = Some(now_ms);
        }
        due
    }
}
