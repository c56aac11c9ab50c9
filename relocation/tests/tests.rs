//! General round-trip tests across a handful of representative shapes:
//! build a value, push it through the machinery, assert the payload
//! survives unchanged.

mod common;

use relocation::{compact, contains_pointer, seal, seal_into_buffer, unseal, unseal_from_buffer};
use relocation::{BumpAllocator, HeapAllocator, Own, OwnSlice, Relocatable, BIAS};

use common::{own, own_slice, own_str, read_str, snapshot_tree, ScratchBuffer};

fn round_trip_through_buffer<T: Relocatable>(root: &T, check: impl FnOnce(&T)) {
    let mut buf = ScratchBuffer::new();
    unsafe {
        seal_into_buffer(root, &mut buf.0).unwrap();
        let mut alloc = HeapAllocator;
        let result = unseal_from_buffer::<T, _>(&mut buf.0, &mut alloc).unwrap();
        check(&*result);
    }
}

#[test]
fn contains_pointer_is_false_for_scalars_and_pointer_free_aggregates() {
    assert!(!contains_pointer::<u64>());
    assert!(!contains_pointer::<[u32; 8]>());
    assert!(!contains_pointer::<(u8, u16, u32)>());
    assert!(!contains_pointer::<Option<u64>>());
}

#[test]
fn contains_pointer_is_true_through_own_and_ownslice() {
    assert!(contains_pointer::<Own<u64>>());
    assert!(contains_pointer::<OwnSlice<u64>>());
    assert!(contains_pointer::<Option<Own<u64>>>());
    assert!(contains_pointer::<[Own<u64>; 2]>());
}

#[test]
fn round_trip_u64_array() {
    round_trip_through_buffer(&[0u64; 64], |result| {
        assert_eq!(result, &[0u64; 64]);
    });
}

#[test]
fn round_trip_string_slice() {
    let root = own_str("grawwwwrr!");
    round_trip_through_buffer(&root, |result| {
        assert_eq!(unsafe { read_str(result) }, "grawwwwrr!");
    });
}

#[derive(Relocatable)]
struct Pair {
    key: OwnSlice<u8>,
    value: u64,
}

#[test]
fn round_trip_vec_of_records() {
    let root = own_slice(vec![
        Pair {
            key: own_str("grawwwwrr!"),
            value: 0,
        },
        Pair {
            key: own_str("grawwwwrr!"),
            value: 1,
        },
    ]);
    round_trip_through_buffer(&root, |result| {
        let elems = unsafe { result.as_slice() };
        assert_eq!(elems.len(), 2);
        assert_eq!(unsafe { read_str(&elems[0].key) }, "grawwwwrr!");
        assert_eq!(elems[0].value, 0);
        assert_eq!(elems[1].value, 1);
    });
}

#[test]
fn round_trip_option_vec() {
    let root = own_slice(vec![Some(own_slice(vec![0u32, 1, 2])), None]);
    round_trip_through_buffer(&root, |result| {
        let elems = unsafe { result.as_slice() };
        assert_eq!(elems.len(), 2);
        assert_eq!(unsafe { elems[0].as_ref().unwrap().as_slice() }, &[0, 1, 2]);
        assert!(elems[1].is_none());
    });
}

#[test]
fn round_trip_empty_slice() {
    let root: OwnSlice<u64> = own_slice(Vec::new());
    round_trip_through_buffer(&root, |result| {
        assert_eq!(result.len(), 0);
        assert!(result.is_empty());
    });
}

#[test]
fn compact_twice_is_value_equal() {
    let root = own_str("grawwwwrr!");
    let mut alloc = HeapAllocator;
    unsafe {
        let once = compact(&root, &mut alloc).unwrap();
        let twice = compact(&*once, &mut alloc).unwrap();
        assert_eq!(read_str(&*once), read_str(&*twice));
        assert_ne!((*once).as_slice().as_ptr(), (*twice).as_slice().as_ptr());
    }
}

#[test]
fn relocation_invariance_across_two_equal_buffers() {
    use common::{branch, leaf, snapshot_tree as snap};

    let root = branch("Root", vec![leaf("Leaf1"), leaf("Leaf2")]);
    let mut buf_a = ScratchBuffer::new();
    let used = unsafe { seal_into_buffer(&root, &mut buf_a.0).unwrap() };

    // A byte-identical second buffer, at a different address.
    let mut buf_b = ScratchBuffer::new();
    buf_b.0[..used].copy_from_slice(&buf_a.0[..used]);

    let base_a = buf_a.0.as_ptr() as usize;
    let base_b = buf_b.0.as_ptr() as usize;
    assert_ne!(base_a, base_b, "test buffers must differ in address to be meaningful");

    let root_a = buf_a.0.as_mut_ptr() as *mut common::Tree;
    let root_b = buf_b.0.as_mut_ptr() as *mut common::Tree;
    unsafe {
        unseal(root_a, base_a, used).unwrap();
        unseal(root_b, base_b, used).unwrap();
        assert_eq!(snap(&*root_a), snap(&*root_b));
    }
}

#[test]
fn sealing_a_pointer_outside_the_region_is_an_error() {
    let stray = own(7u64);
    let mut region_bytes = [0u8; 8];
    let base = region_bytes.as_ptr() as usize;
    let mut stray = stray;
    let result = unsafe { seal(&mut stray as *mut Own<u64>, base, region_bytes.len()) };
    assert!(matches!(result, Err(relocation::Error::PointerNotInRange)));
}

#[test]
fn leaf_bytes_are_untouched_by_seal_and_unseal() {
    let mut value = [1u32, 2, 3, 4];
    unsafe {
        seal(&mut value as *mut [u32; 4], 0x1000, 0x100).unwrap();
        assert_eq!(value, [1, 2, 3, 4]);
        unseal(&mut value as *mut [u32; 4], 0x1000, 0x100).unwrap();
        assert_eq!(value, [1, 2, 3, 4]);
    }
}

#[test]
fn sealing_a_slice_outside_the_region_is_an_error() {
    let mut stray = own_slice(vec![1u8, 2, 3]);
    let mut region_bytes = [0u8; 8];
    let base = region_bytes.as_ptr() as usize;
    let result = unsafe { seal(&mut stray as *mut OwnSlice<u8>, base, region_bytes.len()) };
    assert!(matches!(result, Err(relocation::Error::SlicePointerInvalid)));
}

#[derive(Relocatable, Clone, Copy)]
union PointerFreeUnion {
    as_u32: u32,
    as_f32: f32,
}

#[test]
fn pointer_free_union_derives_as_a_no_op() {
    assert!(!contains_pointer::<PointerFreeUnion>());

    let mut value = PointerFreeUnion { as_u32: 0x3f80_0000 };
    unsafe {
        seal(&mut value as *mut PointerFreeUnion, 0x1000, 0x100).unwrap();
        assert_eq!(value.as_u32, 0x3f80_0000);
        unseal(&mut value as *mut PointerFreeUnion, 0x1000, 0x100).unwrap();
        assert_eq!(value.as_u32, 0x3f80_0000);
    }
}

#[test]
fn sealed_offsets_fall_within_the_biased_region() {
    let root = Pair {
        key: own_str("grawwwwrr!"),
        value: 42,
    };
    let mut bytes = [0u8; 256];
    let base = bytes.as_ptr() as usize;
    let region_size = bytes.len();

    let compacted = unsafe {
        let mut alloc = BumpAllocator::new(&mut bytes);
        compact(&root, &mut alloc).unwrap()
    };

    unsafe {
        seal(compacted, base, region_size).unwrap();
        let stored = (*compacted).key.as_raw() as usize;
        assert!(stored >= BIAS && stored < region_size + BIAS);
    }
}
