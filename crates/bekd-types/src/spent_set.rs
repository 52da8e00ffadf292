//! Single-use enforcement for token ids.
//!
//! `SpentSet` is a capability object rather than a concrete type so the
//! wallet crate can swap in a durable or replicated backing store without
//! touching the authentication ceremony. This crate ships only the
//! in-memory reference implementation.

/// A set of previously-redeemed token ids (ρ). Insertion of an
/// already-present ρ must fail — callers rely on `try_mark` being an
/// atomic compare-and-insert, not a separate check-then-insert.
pub trait SpentSet: Send + Sync {
    /// Attempts to mark `rho` as spent. Returns `true` on first spend,
    /// `false` if `rho` was already present.
    fn try_mark(&self, rho: &[u8; 32]) -> bool;

    fn contains(&self, rho: &[u8; 32]) -> bool;
}
