#![forbid(unsafe_code)]

//! Diagnostics for the diagram pipeline.
//!
//! Recoverable problems (degenerate band geometry, clamped rates, unknown
//! route ids) are reported as leveled events. With the `tracing` feature the
//! macros below are the `tracing` macros; without it they expand to nothing,
//! so call sites written as `sankey_core::warn!(...)` build either way.
//!
//! Every warning carries a `code` field taken from [`Diagnostic::code`] so a
//! subscriber can match on a stable identifier instead of the message text.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, trace, warn};

/// Stable identifiers for the recoverable conditions the pipeline reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    /// A band cross-section was shorter than one unit; nothing is drawn.
    DegenerateBand,
    /// Two construction lines were parallel; the band is dropped.
    ParallelLines,
    /// A negative consumer rate was clamped to zero.
    NegativeRateClamped,
    /// A rate update named an id no route owns.
    UnknownRouteId,
    /// A route without an id was inserted into a keyed collection.
    MissingRouteId,
    /// A palette override could not be parsed and the default was kept.
    InvalidPaletteOverride,
}

impl Diagnostic {
    /// Short machine-readable code, emitted as the `code` field.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::DegenerateBand => "band.degenerate",
            Self::ParallelLines => "band.parallel",
            Self::NegativeRateClamped => "route.negative_rate",
            Self::UnknownRouteId => "route.unknown_id",
            Self::MissingRouteId => "route.missing_id",
            Self::InvalidPaletteOverride => "palette.invalid_override",
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op debug_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// No-op error macro when tracing is disabled.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// No-op info macro when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

/// Span stand-in used when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Enter the span (does nothing).
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

/// Guard returned by [`NoopSpan::enter`].
#[cfg(not(feature = "tracing"))]
pub struct NoopGuard;
