use core::mem::ManuallyDrop;

use relocation::{Own, Relocatable};

#[derive(Relocatable)]
union BadUnion {
    plain: u32,
    pointer: ManuallyDrop<Own<u32>>,
}

fn main() {}
