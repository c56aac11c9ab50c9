//! The two convenience operations that bundle compact+seal into "serialize
//! into buffer", and unseal+compact-out into "deserialize from buffer".

use crate::error::Error;
use crate::region::{Allocator, BumpAllocator};
use crate::relocatable::Relocatable;
use crate::{compact, seal, unseal, BIAS};

fn assert_aligned_for<T>(addr: usize) {
    let required = core::mem::align_of::<T>().max(BIAS);
    assert!(
        addr % required == 0,
        "buffer is not aligned to {required} bytes, required for T"
    );
}

/// Compact `root` into `bytes` (treated as a bump allocator) and seal the
/// result in place, so `bytes` becomes a self-contained, byte-movable
/// region. Returns the number of bytes of `bytes` actually used.
///
/// The compacted root is guaranteed to land at `bytes[0]`, because `compact`
/// allocates the root's own storage before any of its owned children.
///
/// # Safety
/// `bytes` must be aligned to at least the strictest alignment required by
/// any type transitively reachable from `T` (checked with a best-effort
/// `assert!` against `align_of::<T>()` and [`BIAS`], but the real
/// requirement can exceed that for types with unusual, e.g. SIMD,
/// alignment; see `DESIGN.md`).
pub unsafe fn seal_into_buffer<T: Relocatable>(root: &T, bytes: &mut [u8]) -> Result<usize, Error> {
    assert_aligned_for::<T>(bytes.as_ptr() as usize);
    let mut bump = BumpAllocator::new(bytes);
    let base = bump.base_addr();
    let compacted_root = compact(root, &mut bump)?;
    debug_assert_eq!(compacted_root as usize, base, "root must land at offset 0");
    let used = bump.used();
    seal(compacted_root, base, used)?;
    Ok(used)
}

/// Reinterpret `&bytes[0]` as a sealed `T`, unseal it in place at
/// `bytes`'s address, then compact the now-live graph out into `alloc` so
/// the result outlives `bytes`. After this call `bytes` is sealed again and
/// free to be reused or discarded.
///
/// # Safety
/// `bytes` must be aligned as described on [`seal_into_buffer`], and must
/// contain a region produced by a matching `seal_into_buffer::<T>` call (or
/// an equivalent `compact`-then-`seal` pair) for this same `T`.
pub unsafe fn unseal_from_buffer<T: Relocatable, A: Allocator>(
    bytes: &mut [u8],
    alloc: &mut A,
) -> Result<*mut T, Error> {
    assert_aligned_for::<T>(bytes.as_ptr() as usize);
    let base = bytes.as_ptr() as usize;
    let size = bytes.len();
    let root = bytes.as_mut_ptr().cast::<T>();
    unseal(root, base, size)?;
    let result = compact(&*root, alloc)?;
    seal(root, base, size)?;
    Ok(result)
}
