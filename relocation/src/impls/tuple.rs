use crate::error::Error;
use crate::region::Allocator;
use crate::relocatable::Relocatable;

/// Generates a `Relocatable` impl for one tuple arity. The impl target is
/// the tuple type itself, so there is no per-arity auxiliary type to name
/// and no identifier construction needed.
macro_rules! tuple_relocatable {
    ($($name:ident)+) => {
        #[allow(non_snake_case)]
        unsafe impl<$($name: Relocatable),+> Relocatable for ($($name,)+) {
            const CONTAINS_POINTER: bool = { false $(|| $name::CONTAINS_POINTER)+ };

            #[inline]
            unsafe fn repair<Alloc: Allocator>(&mut self, alloc: &mut Alloc) -> Result<(), Error> {
                let ($($name,)+) = self;
                if Self::CONTAINS_POINTER {
                    $($name.repair(alloc)?;)+
                }
                Ok(())
            }

            #[inline]
            unsafe fn seal_fields(&mut self, region_base: usize, region_size: usize) -> Result<(), Error> {
                let ($($name,)+) = self;
                if Self::CONTAINS_POINTER {
                    $($name.seal_fields(region_base, region_size)?;)+
                }
                Ok(())
            }

            #[inline]
            unsafe fn unseal_fields(&mut self, region_base: usize, region_size: usize) -> Result<(), Error> {
                let ($($name,)+) = self;
                if Self::CONTAINS_POINTER {
                    $($name.unseal_fields(region_base, region_size)?;)+
                }
                Ok(())
            }
        }
    };
}

tuple_relocatable!(A);
tuple_relocatable!(A B);
tuple_relocatable!(A B C);
tuple_relocatable!(A B C D);
tuple_relocatable!(A B C D E);
tuple_relocatable!(A B C D E F);
tuple_relocatable!(A B C D E F G);
tuple_relocatable!(A B C D E F G H);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::HeapAllocator;

    #[test]
    fn pointer_free_tuple_is_opaque() {
        assert!(!<(u32, u64) as Relocatable>::CONTAINS_POINTER);
    }

    #[test]
    fn tuple_repair_bitcopies_each_element() {
        let mut alloc = HeapAllocator;
        let mut t = (1u32, 2u64, 3u8);
        unsafe {
            t.repair(&mut alloc).unwrap();
        }
        assert_eq!(t, (1, 2, 3));
    }
}
