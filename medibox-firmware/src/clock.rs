//! Embassy time source

use embassy_time::Instant;
use medibox_hal::Clock;

/// Milliseconds since boot from the Embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
