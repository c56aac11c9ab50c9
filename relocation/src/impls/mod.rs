//! Manual `Relocatable` impls for the leaves of the type lattice. Everything
//! above this layer, records and sums, is generated by
//! `#[derive(Relocatable)]` in the `relocation-derive` crate, which in turn
//! just calls down into these impls field by field.

mod array;
mod manually_drop;
mod option;
mod scalar;
mod tuple;
