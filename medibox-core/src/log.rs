//! Logging shim
//!
//! Forwards to `defmt` when the feature is enabled and compiles away
//! otherwise, so the crate still builds and tests on the host.

macro_rules! log_forward {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::$level!($s $(, $x)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! trace {
    ($($arg:tt)*) => { log_forward!(trace, $($arg)*) };
}

macro_rules! debug {
    ($($arg:tt)*) => { log_forward!(debug, $($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { log_forward!(info, $($arg)*) };
}

macro_rules! warn {
    ($($arg:tt)*) => { log_forward!(warn, $($arg)*) };
}
