//! Cooperative interval scheduler.
//!
//! The main loop never sleeps on a task; it asks the scheduler whether each
//! periodic task is due and runs the ones that are. Every task keeps the
//! timestamp of its last run and is compared against the millisecond
//! counter with wrapping subtraction, so the 49.7-day `u32` wrap is
//! harmless.
//!
//! ```text
//!  loop ─▶ poll(SampleTemperature) ─▶ poll(AlarmBlink) ─▶ poll(DisplayRefresh)
//!       ─▶ buttons (ungated) ─▶ poll(Countdown) ─▶ poll(Telemetry)
//! ```
//!
//! A task that is skipped by its own guard (alarm inactive, duty 0) is
//! simply not polled, so its timestamp stays where it was.

use log::debug;

use crate::config::BenchConfig;

/// Periodic tasks driven from the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    SampleTemperature,
    AlarmBlink,
    DisplayRefresh,
    Countdown,
    Telemetry,
}

impl TaskId {
    pub const ALL: [TaskId; 5] = [
        TaskId::SampleTemperature,
        TaskId::AlarmBlink,
        TaskId::DisplayRefresh,
        TaskId::Countdown,
        TaskId::Telemetry,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct IntervalTask {
    interval_ms: u32,
    /// `None` until the first run; a fresh task is due immediately.
    last_run_ms: Option<u32>,
}

pub struct Scheduler {
    tasks: [IntervalTask; TaskId::ALL.len()],
}

impl Scheduler {
    pub fn new(config: &BenchConfig) -> Self {
        let task = |interval_ms| IntervalTask {
            interval_ms,
            last_run_ms: None,
        };
        Self {
            tasks: [
                task(config.temp_sample_interval_ms),
                task(config.alarm_blink_interval_ms),
                task(config.display_refresh_interval_ms),
                task(config.countdown_tick_ms),
                task(config.telemetry_interval_ms),
            ],
        }
    }

    /// `true` if `id` is due at `now_ms`; marks it as run when it is.
    pub fn poll(&mut self, id: TaskId, now_ms: u32) -> bool {
        let task = &mut self.tasks[id.index()];
        let due = match task.last_run_ms {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) >= task.interval_ms,
        };
        if due {
            task.last_run_ms = Some(now_ms);
            debug!("Scheduler: {:?} @ {} ms", id, now_ms);
        }
        due
    }

    /// Make every task due on the next poll.
    pub fn reset(&mut self) {
        for task in &mut self.tasks {
            task.last_run_ms = None;
        }
    }

    pub fn last_run(&self, id: TaskId) -> Option<u32> {
        self.tasks[id.index()].last_run_ms
    }

    pub fn interval(&self, id: TaskId) -> u32 {
        self.tasks[id.index()].interval_ms
    }
}
