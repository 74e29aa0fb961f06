//! Time source abstraction

/// Monotonic millisecond clock
///
/// Injected into the runtime so confirmation timeouts can be tested with a
/// simulated clock.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
