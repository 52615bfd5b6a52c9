//! Monotonic time source for event timestamps.

/// Millisecond monotonic clock
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed epoch
    fn now_ms(&self) -> u64;
}

/// [`Clock`] backed by the Embassy time driver.
///
/// On hardware this is the tick timer; on desktop it needs embassy-time's
/// `std` feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}

impl<C: Clock> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
