//! Logging facade around the evaluator's control flow (§4.10).
//!
//! `tracing` is an optional dependency gated by the `tracing` cargo feature, mirroring
//! `formualizer-eval`'s own feature gate: with the feature off these macros expand to
//! nothing, so there is no tracing machinery on the success hot path of a build that
//! doesn't opt in.

#[cfg(feature = "tracing")]
macro_rules! pass_trace {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}
#[cfg(not(feature = "tracing"))]
macro_rules! pass_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! pass_debug {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}
#[cfg(not(feature = "tracing"))]
macro_rules! pass_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! pass_warn {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}
#[cfg(not(feature = "tracing"))]
macro_rules! pass_warn {
    ($($arg:tt)*) => {};
}

pub(crate) use pass_debug;
pub(crate) use pass_trace;
pub(crate) use pass_warn;
