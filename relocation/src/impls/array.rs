use crate::error::Error;
use crate::region::Allocator;
use crate::relocatable::Relocatable;

/// `N` known at compile time via a const generic, traversed
/// element-by-element only when `T` is not opaque.
unsafe impl<T: Relocatable, const N: usize> Relocatable for [T; N] {
    const CONTAINS_POINTER: bool = T::CONTAINS_POINTER;

    #[inline]
    unsafe fn repair<A: Allocator>(&mut self, alloc: &mut A) -> Result<(), Error> {
        if Self::CONTAINS_POINTER {
            for item in self.iter_mut() {
                item.repair(alloc)?;
            }
        }
        Ok(())
    }

    #[inline]
    unsafe fn seal_fields(&mut self, region_base: usize, region_size: usize) -> Result<(), Error> {
        if Self::CONTAINS_POINTER {
            for item in self.iter_mut() {
                item.seal_fields(region_base, region_size)?;
            }
        }
        Ok(())
    }

    #[inline]
    unsafe fn unseal_fields(&mut self, region_base: usize, region_size: usize) -> Result<(), Error> {
        if Self::CONTAINS_POINTER {
            for item in self.iter_mut() {
                item.unseal_fields(region_base, region_size)?;
            }
        }
        Ok(())
    }
}
