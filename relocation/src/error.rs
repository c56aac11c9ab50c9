//! The crate's closed run-time error set.
//!
//! Structural errors (a type the walker cannot traverse) are caught earlier,
//! at compile time, by simply not implementing [`crate::Relocatable`] for the
//! offending type, so there is no run-time fallback for those; they never
//! show up here.

use thiserror::Error;

/// A run-time failure of `compact`, `seal`, or `unseal`.
///
/// Any non-`Ok` result from `seal` or `unseal` leaves the region in a
/// partially-rewritten, poisoned state: the walk does not roll back the
/// pointers it has already touched. Callers must treat the region as
/// corrupt and discard it rather than retry in place.
#[derive(Debug, Error)]
pub enum Error {
    /// The allocator backing a `compact` (or `seal_into_buffer`/
    /// `unseal_from_buffer`) call refused a request.
    #[error("allocator exhausted")]
    OutOfMemory,

    /// A single-target pointer did not lie within the supplied region
    /// during `seal`, or a sealed offset did not decode to a valid address
    /// during `unseal`.
    #[error("pointer not in range")]
    PointerNotInRange,

    /// Same as [`Error::PointerNotInRange`], but for a slice's base pointer.
    #[error("slice pointer invalid")]
    SlicePointerInvalid,
}
