#![forbid(unsafe_code)]

//! Logging shims.
//!
//! With the `tracing` feature the `debug!`, `trace!`, `debug_span!` and
//! `trace_span!` macros are `tracing`'s own. Without it they expand to
//! nothing (or to [`NoopSpan`]), so sensor call sites such as
//! `keydrop_core::debug!(active = id, "keyboard drag start")` compile
//! either way.
//!
//! `tracing-json` additionally provides [`init_json_subscriber`] for hosts
//! that want structured output without wiring a subscriber themselves.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, trace, trace_span};

#[cfg(not(feature = "tracing"))]
mod noop {
    /// Disabled `debug!`.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Disabled `trace!`.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Disabled `debug_span!`.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// Disabled `trace_span!`.
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// Stand-in for `tracing::Span` when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

/// Guard returned by [`NoopSpan::enter`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG`.
///
/// Falls back to `info` when `RUST_LOG` is unset or unparseable. Returns
/// `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    #[test]
    fn shims_accept_structured_fields() {
        let span = crate::debug_span!("collision_detect", droppables = 2_usize);
        let _guard = span.enter();
        crate::debug!(active = 3_u64, x = 1.0_f64, "keyboard drag start");
        crate::trace!(key = %"Tab", "key produced no movement");
    }

    #[cfg(feature = "tracing-json")]
    #[test]
    fn json_subscriber_installs_once() {
        assert!(super::init_json_subscriber());
        assert!(!super::init_json_subscriber());
    }
}
