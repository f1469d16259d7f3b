#![forbid(unsafe_code)]

//! Logging shim for placement and animation internals.
//!
//! With the `tracing` feature the `tracing` macros are re-exported and every
//! geometry decision is logged at `trace` level. Without it the same macro
//! names expand to nothing, so call sites never need their own `cfg`:
//!
//! ```ignore
//! perch_core::trace!(x = frame.min_x(), "clamped popover");
//! ```

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, trace_span, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Discards its arguments.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// Yields a [`DisabledSpan`](crate::logging::DisabledSpan).
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::DisabledSpan
        };
    }
}

/// Stand-in for a span when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy)]
pub struct DisabledSpan;

#[cfg(not(feature = "tracing"))]
impl DisabledSpan {
    /// Entering does nothing; the guard exists so call sites match `tracing`.
    pub fn entered(self) -> DisabledSpan {
        self
    }
}
