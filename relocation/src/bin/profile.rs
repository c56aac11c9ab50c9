use relocation::{seal_into_buffer, unseal_from_buffer, HeapAllocator, OwnSlice, Relocatable};

#[derive(Relocatable)]
struct Record {
    tag: u64,
    payload: OwnSlice<u8>,
}

fn main() {
    profile_buffer_round_trip(1024, 1024);
}

fn own_str(s: &str) -> OwnSlice<u8> {
    let boxed = s.as_bytes().to_vec().into_boxed_slice();
    let len = boxed.len();
    let raw = Box::into_raw(boxed) as *mut u8;
    unsafe { OwnSlice::from_raw_parts(raw, len) }
}

fn profile_buffer_round_trip(iterations: usize, records: u64) {
    let mut buf = vec![0u8; 1 << 20];
    let timer = std::time::Instant::now();
    for _ in 0..iterations {
        for tag in 0..records {
            let root = Record {
                tag,
                payload: own_str("grawwwwrr!"),
            };
            let used = unsafe { seal_into_buffer(&root, &mut buf).unwrap() };
            let mut alloc = HeapAllocator;
            let _ = unsafe { unseal_from_buffer::<Record, _>(&mut buf[..used], &mut alloc).unwrap() };
        }
    }
    println!("{:?} elapsed", timer.elapsed());
}
