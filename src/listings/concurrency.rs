//! Optimistic Concurrency Control
//!
//! Update callers must state their intent: check against an expected version
//! or force an unconditional write. There is no implicit "no version given,
//! skip the check" path.

use super::error::ListingError;

/// How a conditional write treats the stored version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyMode {
    /// Write only if the stored version equals the expected one (normal path)
    Check(i64),
    /// Unconditional write, explicitly requested by the caller
    Force,
}

impl ConcurrencyMode {
    /// Expected version for the CAS clause, None for forced writes
    #[inline]
    pub fn expected(&self) -> Option<i64> {
        match self {
            ConcurrencyMode::Check(v) => Some(*v),
            ConcurrencyMode::Force => None,
        }
    }
}

/// Classify a conditional write that matched no row
///
/// `current` is a follow-up read of the live row's version. A live row means
/// another writer won the race; no live row means the listing is gone (or
/// archived, which reads the same from the update path).
pub fn classify_missed_write(mode: ConcurrencyMode, current: Option<i64>) -> ListingError {
    match (mode, current) {
        (ConcurrencyMode::Check(attempted), Some(current)) => ListingError::VersionConflict {
            current,
            attempted,
        },
        _ => ListingError::NotFound,
    }
}
