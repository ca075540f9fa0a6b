//! Unified error types surfaced by the runtime API.
//!
//! Ordinary gameplay outcomes (blocked moves, misses, calls while stopped)
//! are not errors. What remains is cancellation, which callers usually want
//! to swallow, and genuine script faults, which they want to show.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The game left the running state while the caller was suspended.
    #[error("game stopped")]
    Cancelled,

    /// The preview was interrupted before it finished.
    #[error("preview aborted")]
    PreviewAborted,

    #[error("target ({x}, {y}) is outside the map or not walkable")]
    InvalidTarget { x: i32, y: i32 },
}

impl RuntimeError {
    /// Voluntary stops that a driver should not report as failures.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, RuntimeError::Cancelled | RuntimeError::PreviewAborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_is_distinguishable_from_faults() {
        assert!(RuntimeError::Cancelled.is_cancellation());
        assert!(RuntimeError::PreviewAborted.is_cancellation());
        assert!(!RuntimeError::InvalidTarget { x: 9, y: 9 }.is_cancellation());
    }

    #[test]
    fn every_variant_is_either_a_stop_or_a_fault() {
        let all = [
            RuntimeError::Cancelled,
            RuntimeError::PreviewAborted,
            RuntimeError::InvalidTarget { x: 0, y: 0 },
        ];
        for err in all {
            let fault = match err {
                RuntimeError::Cancelled | RuntimeError::PreviewAborted => false,
                RuntimeError::InvalidTarget { .. } => true,
            };
            assert_eq!(err.is_cancellation(), !fault);
        }
    }
}
