//! The allocator collaborator: a minimal capability trait plus two working
//! implementations, a bump allocator over a caller-supplied buffer and a
//! thin wrapper around the global heap.

use core::alloc::Layout;
use core::ptr::NonNull;

use crate::error::Error;

/// A minimal bump/arena allocation capability.
///
/// [`compact`](crate::compact) accepts any `Allocator`. [`seal_into_buffer`]
/// additionally requires bump-allocator semantics, a monotonically
/// advancing cursor with the root landing at offset 0, which
/// [`BumpAllocator`] provides and [`HeapAllocator`] does not attempt to.
///
/// # Safety
/// Implementors must return memory that is live, uniquely owned by the
/// caller, and aligned to at least `layout.align()`, for as long as the
/// allocator (or, for a bump allocator, the backing buffer) is alive.
pub unsafe trait Allocator {
    /// Allocate `layout.size()` bytes aligned to `layout.align()`.
    ///
    /// # Safety
    /// `layout.size()` must not be so large that the returned pointer's
    /// valid range would overflow `isize`.
    unsafe fn allocate(&mut self, layout: Layout) -> Result<NonNull<u8>, Error>;
}

/// Allocate storage for one `T` and return it uninitialized.
///
/// # Safety
/// Caller must initialize the full `size_of::<T>()` bytes before reading
/// through the returned pointer.
#[inline]
pub(crate) unsafe fn alloc_one<T, A: Allocator + ?Sized>(alloc: &mut A) -> Result<*mut T, Error> {
    Ok(alloc.allocate(Layout::new::<T>())?.as_ptr().cast())
}

/// Allocate storage for `len` contiguous `T`s and return it uninitialized.
///
/// # Safety
/// Caller must initialize all `len * size_of::<T>()` bytes before reading
/// through the returned pointer.
#[inline]
pub(crate) unsafe fn alloc_slice<T, A: Allocator + ?Sized>(
    alloc: &mut A,
    len: usize,
) -> Result<*mut T, Error> {
    let layout = Layout::array::<T>(len).map_err(|_| Error::OutOfMemory)?;
    Ok(alloc.allocate(layout)?.as_ptr().cast())
}

/// A bump allocator over a caller-supplied byte region.
///
/// Satisfies every `Allocator` request by rounding the current cursor up to
/// the requested alignment and advancing it; never reclaims space until the
/// whole region is discarded. This is the allocator [`seal_into_buffer`]
/// requires, because it guarantees the first allocation (the compacted
/// root) lands at offset 0.
///
/// [`seal_into_buffer`]: crate::seal_into_buffer
pub struct BumpAllocator<'a> {
    bytes: &'a mut [u8],
    used: usize,
}

impl<'a> BumpAllocator<'a> {
    /// Wrap `bytes` as a fresh bump region; nothing has been allocated yet.
    pub fn new(bytes: &'a mut [u8]) -> Self {
        BumpAllocator { bytes, used: 0 }
    }

    /// Number of bytes consumed so far, including any alignment padding.
    pub fn used(&self) -> usize {
        self.used
    }

    /// The address of `bytes[0]`, i.e. the region's base for `seal`/`unseal`.
    pub fn base_addr(&self) -> usize {
        self.bytes.as_ptr() as usize
    }

    /// The full capacity of the wrapped buffer.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

unsafe impl<'a> Allocator for BumpAllocator<'a> {
    unsafe fn allocate(&mut self, layout: Layout) -> Result<NonNull<u8>, Error> {
        let base = self.bytes.as_mut_ptr() as usize;
        let cursor = base + self.used;
        let align = layout.align().max(1);
        let aligned = (cursor + align - 1) & !(align - 1);
        let padding = aligned - cursor;
        let new_used = padding
            .checked_add(self.used)
            .and_then(|u| u.checked_add(layout.size()))
            .ok_or(Error::OutOfMemory)?;
        if new_used > self.bytes.len() {
            return Err(Error::OutOfMemory);
        }
        self.used = new_used;
        // SAFETY: `aligned` lies within `[base, base + bytes.len())` by the
        // check above, and is non-zero because `base` comes from a live
        // Rust slice reference.
        Ok(NonNull::new_unchecked(aligned as *mut u8))
    }
}

/// An arbitrary allocator backed by the global heap allocator.
///
/// Fine for any arbitrary allocator use, [`compact`](crate::compact) on its
/// own, most notably, but never for [`seal_into_buffer`], which needs bump
/// semantics.
///
/// Memory handed out here is never freed by this crate: none of the five
/// operations are destructors, and a `HeapAllocator`-backed graph is
/// expected to be either leaked for the program's lifetime or freed by
/// caller-written code that understands the specific `T` it allocated.
#[derive(Default)]
pub struct HeapAllocator;

unsafe impl Allocator for HeapAllocator {
    unsafe fn allocate(&mut self, layout: Layout) -> Result<NonNull<u8>, Error> {
        if layout.size() == 0 {
            // A zero-sized request still needs a well-aligned, non-null,
            // non-dangling-across-types sentinel; `layout.align()` as an
            // address is the standard trick (same one `Vec`/`Box` use).
            return Ok(NonNull::new_unchecked(layout.align() as *mut u8));
        }
        let ptr = std::alloc::alloc(layout);
        NonNull::new(ptr).ok_or(Error::OutOfMemory)
    }
}
