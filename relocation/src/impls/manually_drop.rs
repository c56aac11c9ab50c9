use core::mem::ManuallyDrop;

use crate::error::Error;
use crate::region::Allocator;
use crate::relocatable::Relocatable;

/// `ManuallyDrop<T>` is `#[repr(transparent)]` over `T`, so it carries
/// through to `T`'s own impl unchanged. The only reason this exists is that
/// a `union` field that is not `Copy` must be wrapped in `ManuallyDrop` to
/// compile at all, and a pointer-bearing field (e.g. `Own<P>`) is never
/// `Copy`. Without this impl, no union could ever reach the derive macro's
/// pointer-rejection assertion, since it would already be rejected for
/// lacking a `Relocatable` impl on the wrapped field.
unsafe impl<T: Relocatable> Relocatable for ManuallyDrop<T> {
    const CONTAINS_POINTER: bool = T::CONTAINS_POINTER;

    #[inline]
    unsafe fn repair<A: Allocator>(&mut self, alloc: &mut A) -> Result<(), Error> {
        if Self::CONTAINS_POINTER {
            T::repair(&mut **self, alloc)?;
        }
        Ok(())
    }

    #[inline]
    unsafe fn seal_fields(&mut self, region_base: usize, region_size: usize) -> Result<(), Error> {
        if Self::CONTAINS_POINTER {
            T::seal_fields(&mut **self, region_base, region_size)?;
        }
        Ok(())
    }

    #[inline]
    unsafe fn unseal_fields(&mut self, region_base: usize, region_size: usize) -> Result<(), Error> {
        if Self::CONTAINS_POINTER {
            T::unseal_fields(&mut **self, region_base, region_size)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::HeapAllocator;

    #[test]
    fn pointer_free_manually_drop_is_opaque() {
        assert!(!<ManuallyDrop<u32> as Relocatable>::CONTAINS_POINTER);
    }

    #[test]
    fn manually_drop_repair_bitcopies_through() {
        let mut alloc = HeapAllocator;
        let mut v = ManuallyDrop::new(42u64);
        unsafe {
            v.repair(&mut alloc).unwrap();
        }
        assert_eq!(*v, 42);
    }
}
