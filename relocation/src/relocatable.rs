use crate::error::Error;
use crate::region::{alloc_one, Allocator};

/// A type whose values can be compacted into an allocator-backed region,
/// sealed into region-relative offsets, and unsealed back into absolute
/// pointers.
///
/// This trait is never implemented by hand for user record/sum types:
/// `#[derive(Relocatable)]` (from `relocation-derive`) generates the impl by
/// walking fields in declaration order and deferring to each field's own
/// impl. Manual impls exist only for the leaves of the type lattice: the
/// scalar primitives, `Option`, fixed-size arrays, tuples, and the two
/// pointer primitives [`crate::Own`] and [`crate::OwnSlice`].
///
/// # Safety
///
/// Implementors must uphold the region invariants from the crate's
/// contract: `repair` may only replace pointer/slice fields with storage
/// obtained from the supplied allocator, and `seal_fields`/`unseal_fields`
/// must only ever treat a field as a pointer if it truly owns the exclusive
/// allocation it references (shared or borrowed pointers must never appear
/// here; there is no way for the walker to detect aliasing).
pub unsafe trait Relocatable: Sized {
    /// `true` if `Self` transitively contains a pointer or slice field.
    ///
    /// A pointer-free type is treated as an opaque byte-blob: `repair`,
    /// `seal_fields`, and `unseal_fields` on such a type do nothing, and
    /// composite types guard their recursion into such fields behind this
    /// constant so that sealing or unsealing a large pointer-free payload
    /// (e.g. an array of `u64`) never walks its elements one at a time.
    const CONTAINS_POINTER: bool;

    /// Fix up `self`'s own pointer/slice fields in place, in declaration
    /// order, replacing each one's target with a fresh copy obtained from
    /// `alloc`. Called only on a value that was just bit-copied from a live
    /// source by [`Relocatable::dupe`]; `self`'s pointer fields are still
    /// the *source's* absolute pointers until this call rewrites them.
    ///
    /// # Safety
    /// `self` must be a bit-copy of a live value whose owned pointer/slice
    /// targets are still valid to dereference.
    unsafe fn repair<A: Allocator>(&mut self, alloc: &mut A) -> Result<(), Error>;

    /// Rewrite every pointer/slice field reachable from `self` from an
    /// absolute address into a `region_base`-relative, [`crate::BIAS`]-biased
    /// offset. `self` itself must already live inside
    /// `[region_base, region_base + region_size)`.
    ///
    /// # Safety
    /// Every pointer reachable from `self` must currently be a valid,
    /// dereferenceable address within the region, per the compacted-form
    /// precondition.
    unsafe fn seal_fields(&mut self, region_base: usize, region_size: usize) -> Result<(), Error>;

    /// Inverse of [`Relocatable::seal_fields`]: rewrite every sealed offset
    /// reachable from `self` back into an absolute pointer at the (possibly
    /// new) `region_base`.
    ///
    /// # Safety
    /// Every pointer-sized field reachable from `self` must currently hold
    /// a valid sealed offset, per the sealed-form precondition.
    unsafe fn unseal_fields(&mut self, region_base: usize, region_size: usize) -> Result<(), Error>;

    /// Allocate storage for one `Self`, bit-copy `src` into it, then
    /// [`Relocatable::repair`] the copy so its own pointer fields point into
    /// `alloc` rather than wherever `src`'s did.
    ///
    /// This is the crate's `dupe` primitive: every owned-pointer and slice
    /// field recurses through this method on its element type, which is why
    /// it is provided once here rather than repeated per impl.
    ///
    /// # Safety
    /// `src` must be a valid, readable `Self`.
    #[inline]
    unsafe fn dupe<A: Allocator>(src: &Self, alloc: &mut A) -> Result<*mut Self, Error> {
        let dst = alloc_one::<Self, A>(alloc)?;
        core::ptr::copy_nonoverlapping(src as *const Self, dst, 1);
        (*dst).repair(alloc)?;
        Ok(dst)
    }
}
