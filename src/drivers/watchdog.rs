//! Task watchdog (TWDT) for the cooperative loop.
//!
//! The loop never blocks, so a gap between two feeds longer than a few
//! milliseconds means a stuck driver call. The watchdog resets the chip
//! once the gap reaches `timeout_ms`; gaps above half of that are logged
//! so slow paths show up before they become resets.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::warn;

pub struct Watchdog {
    timeout_ms: u32,
    last_feed_ms: Option<u32>,
    longest_gap_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Configure the TWDT and subscribe the calling task.
    ///
    /// A failed subscription is logged and the loop runs unguarded.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        let subscribed = {
            let cfg = esp_task_wdt_config_t {
                timeout_ms,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            // SAFETY: called once from main() before the loop starts.
            let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
            if ret != ESP_OK {
                warn!("Watchdog: reconfigure returned {} (keeping IDF defaults)", ret);
            }
            // SAFETY: null subscribes the current task.
            let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
            if ret != ESP_OK {
                warn!("Watchdog: subscribe failed ({})", ret);
            }
            ret == ESP_OK
        };

        log::info!("Watchdog: {} ms timeout", timeout_ms);
        Self {
            timeout_ms,
            last_feed_ms: None,
            longest_gap_ms: 0,
            #[cfg(target_os = "espidf")]
            subscribed,
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Longest observed gap between two feeds.
    pub fn longest_gap_ms(&self) -> u32 {
        self.longest_gap_ms
    }

    /// Feed once per loop pass.
    pub fn feed(&mut self, now_ms: u32) {
        if let Some(last) = self.last_feed_ms {
            let gap = now_ms.wrapping_sub(last);
            if gap > self.longest_gap_ms {
                self.longest_gap_ms = gap;
                if gap >= self.timeout_ms / 2 {
                    warn!("Watchdog: loop stalled {} ms (limit {} ms)", gap, self.timeout_ms);
                }
            }
        }
        self.last_feed_ms = Some(now_ms);

        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: the current task is subscribed.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}
