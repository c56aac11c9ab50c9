use crate::error::Error;
use crate::region::Allocator;
use crate::relocatable::Relocatable;

/// Traversed only when present.
unsafe impl<T: Relocatable> Relocatable for Option<T> {
    const CONTAINS_POINTER: bool = T::CONTAINS_POINTER;

    #[inline]
    unsafe fn repair<A: Allocator>(&mut self, alloc: &mut A) -> Result<(), Error> {
        if Self::CONTAINS_POINTER {
            if let Some(inner) = self.as_mut() {
                inner.repair(alloc)?;
            }
        }
        Ok(())
    }

    #[inline]
    unsafe fn seal_fields(&mut self, region_base: usize, region_size: usize) -> Result<(), Error> {
        if Self::CONTAINS_POINTER {
            if let Some(inner) = self.as_mut() {
                inner.seal_fields(region_base, region_size)?;
            }
        }
        Ok(())
    }

    #[inline]
    unsafe fn unseal_fields(&mut self, region_base: usize, region_size: usize) -> Result<(), Error> {
        if Self::CONTAINS_POINTER {
            if let Some(inner) = self.as_mut() {
                inner.unseal_fields(region_base, region_size)?;
            }
        }
        Ok(())
    }
}
