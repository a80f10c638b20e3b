//! Loop clock.
//!
//! The service only ever sees a `u32` millisecond timestamp and compares
//! timestamps with `wrapping_sub`, so the clock may wrap (every ~49.7
//! days) without disturbing any interval.
//!
//! On the device this reads the ESP-IDF high-resolution timer; on the host
//! it is backed by `std::time::Instant` for simulation.

pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    boot: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            boot: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot.
    pub fn uptime_us(&self) -> u64 {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: esp_timer is started by the IDF before app_main.
            (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
        }
        #[cfg(not(target_os = "espidf"))]
        {
            self.boot.elapsed().as_micros() as u64
        }
    }

    /// Milliseconds since boot, truncated to the loop's `u32` clock.
    pub fn now_ms(&self) -> u32 {
        (self.uptime_us() / 1_000) as u32
    }
}
