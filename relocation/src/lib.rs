//! Type-directed relocation of in-memory object graphs.
//!
//! This crate deep-copies a rooted, pointer-linked value into a
//! caller-supplied contiguous byte region (`compact`), rewrites every
//! internal pointer under it into a region-relative offset so the whole
//! region becomes byte-for-byte position-independent (`seal`), and inverts
//! that rewrite at a (possibly different) base address (`unseal`). The
//! intended use is cheap checkpointing of large in-process state: dump a
//! sealed region to disk or a socket, load it back later at a new address,
//! unseal, and the graph is live again.
//!
//! # Safety
//!
//! Like the columnar arena this crate is descended from, this is wildly
//! unsafe: the whole point is to let pointer fields hold either an absolute
//! address or an encoded integer offset depending on which of the four
//! lifecycle states (live, compacted, sealed, unsealed; see the module
//! docs on [`pointers`]) a graph is currently in, and to cast between the
//! two freely (see the [`Own`] and [`OwnSlice`] module docs for how). Nothing
//! here is checked by the borrow checker; it is checked (where it is
//! checked at all) by the three run-time validations this crate performs,
//! and by `#[derive(Relocatable)]` refusing to compile for types it cannot
//! structurally support.
//!
//! # What this is not
//!
//! Not a serialization format: there is no schema, no versioning, no
//! endianness conversion, no compression. A sealed region's bytes are
//! exactly the host's in-memory layout; it is only portable to another
//! process with an identical layout (word size, alignment, struct padding,
//! enum discriminant placement) and the same [`BIAS`]. Not a
//! garbage-collected heap: a region owns its entire reachable sub-graph,
//! and nothing inside it may be referenced from outside, or reference
//! anything outside it. Cyclic graphs, shared (DAG) sub-graphs, raw
//! multi-element pointers, sentinel-terminated arrays, opaque types,
//! function pointers, and zero-sized types are all unsupported. The first
//! two silently (compacting a DAG duplicates the shared part; compacting a
//! cycle does not terminate), the rest by `#[derive(Relocatable)]` simply
//! having no impl to generate for them.

mod buffer;
pub mod error;
mod impls;
mod pointers;
mod region;
mod relocatable;

pub use buffer::{seal_into_buffer, unseal_from_buffer};
pub use error::Error;
pub use pointers::{Own, OwnSlice};
pub use region::{Allocator, BumpAllocator, HeapAllocator};
pub use relocatable::Relocatable;

/// `#[derive(Relocatable)]` generates the field-by-field walk for a record
/// (struct) or sum (enum) type; see the crate-level docs for the types it
/// bottoms out on.
pub use relocation_derive::Relocatable;

/// The small positive constant added to every stored offset so that offset
/// `0` is distinguishable from a null pointer, and so that sealed pointer
/// values preserve the strictest primitive alignment. All producers and
/// consumers of a given sealed region must agree on the same `BIAS` to
/// interoperate; this crate fixes it at `8`.
///
/// A type requiring wider alignment than 8 bytes (e.g. a 16-byte SIMD
/// vector) needs a larger `BIAS`; this crate does not currently parametrize
/// it (see `DESIGN.md`, Open Question 3).
pub const BIAS: usize = 8;

/// `true` iff `T` transitively contains a pointer or slice field.
///
/// Exposed as a free function for callers that want to decide how to store
/// or transmit a `T` without ever compacting one.
#[inline]
pub fn contains_pointer<T: Relocatable>() -> bool {
    T::CONTAINS_POINTER
}

/// Deep-copy `root`'s entire transitively-reachable sub-graph into `alloc`,
/// returning a pointer to a fresh copy. `root` itself is left untouched.
///
/// # Safety
/// `root` must be a valid, readable `T` whose owned pointer/slice targets
/// form a finite tree (no sharing, no cycles) and are not aliased elsewhere
/// for the duration of this call. `alloc` must not be used concurrently.
#[inline]
pub unsafe fn compact<T: Relocatable, A: Allocator>(
    root: &T,
    alloc: &mut A,
) -> Result<*mut T, Error> {
    T::dupe(root, alloc)
}

/// Rewrite every pointer/slice reachable from `*root` from an absolute
/// address into a `region_base`-relative, [`BIAS`]-biased offset, in place.
///
/// Aborts on the first out-of-range pointer; the region is left poisoned
/// (partially rewritten) on error and must be discarded, not retried.
///
/// # Safety
/// `*root`, and everything reachable from it, must currently lie within
/// `[region_base, region_base + region_size)` and be exclusively owned by
/// this call for its duration.
#[inline]
pub unsafe fn seal<T: Relocatable>(
    root: *mut T,
    region_base: usize,
    region_size: usize,
) -> Result<(), Error> {
    (*root).seal_fields(region_base, region_size)
}

/// Inverse of [`seal`]: rewrite every sealed offset reachable from `*root`
/// back into an absolute pointer based at `region_base`.
///
/// Aborts on the first out-of-range offset; the region is left poisoned on
/// error, same as [`seal`].
///
/// # Safety
/// `*root` must hold a value produced by [`seal`] (or
/// [`seal_into_buffer`]) against a region of `region_size` bytes, now
/// relocated to (or still at) `region_base`.
#[inline]
pub unsafe fn unseal<T: Relocatable>(
    root: *mut T,
    region_base: usize,
    region_size: usize,
) -> Result<(), Error> {
    (*root).unseal_fields(region_base, region_size)
}
