//! Invariant checking for baked navigation structures.
//!
//! Graphs are usually built once and then reloaded from disk many times, so the
//! checks are exposed both as a fallible validator (for freshly deserialized
//! data) and as a debug-only assertion (for freshly baked data).

use crate::mesh_error::MeshGraphError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Panic on the first violated invariant when invariant checking is enabled.
    fn debug_assert_invariants(&self);

    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshGraphError>;

    /// `true` when [`validate_invariants`](Self::validate_invariants) passes.
    fn is_consistent(&self) -> bool {
        self.validate_invariants().is_ok()
    }
}

/// Run a fallible check and panic with context on error, but only when
/// invariant checking is compiled in (debug builds or the
/// `check-invariants` / `strict-invariants` features).
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
