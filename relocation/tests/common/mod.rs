//! Shared fixtures for the scenario, round-trip, and property tests.
#![allow(dead_code)]

use relocation::{Own, OwnSlice, Relocatable};

/// Leak a `Vec<T>` into an owned, unique allocation and wrap it as the
/// slice primitive the walker understands. Used only to build "live" input
/// graphs for tests; nothing here frees the leaked memory, which matches
/// this crate's own stance that none of its operations are destructors.
pub fn own_slice<T>(items: Vec<T>) -> OwnSlice<T> {
    let boxed = items.into_boxed_slice();
    let len = boxed.len();
    let raw = Box::into_raw(boxed) as *mut T;
    unsafe { OwnSlice::from_raw_parts(raw, len) }
}

pub fn own_str(s: &str) -> OwnSlice<u8> {
    own_slice(s.as_bytes().to_vec())
}

pub fn own<T>(value: T) -> Own<T> {
    let raw = Box::into_raw(Box::new(value));
    unsafe { Own::from_raw(raw) }
}

pub unsafe fn read_str(slice: &OwnSlice<u8>) -> String {
    String::from_utf8(slice.as_slice().to_vec()).unwrap()
}

/// A large, generously-aligned scratch buffer for `seal_into_buffer`/
/// `unseal_from_buffer` tests. Tests size their buffers generously rather
/// than compute an exact byte count, since the required size depends on
/// padding and enum-discriminant placement that vary by field order and
/// platform.
#[repr(C, align(16))]
pub struct ScratchBuffer(pub [u8; 4096]);

impl ScratchBuffer {
    pub fn new() -> Self {
        ScratchBuffer([0u8; 4096])
    }
}

/// A small recursive tree, the same shape as spec scenario S4/S6's `R`:
/// a label plus an optional slice of children.
#[derive(Relocatable)]
pub struct Tree {
    pub label: OwnSlice<u8>,
    pub children: Option<OwnSlice<Tree>>,
}

/// A plain, derivable snapshot of a [`Tree`] for equality assertions.
/// `Tree` itself can't derive `PartialEq`/`Debug` because its fields are
/// raw-pointer-backed, so tests flatten it into this first.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TreeSnapshot {
    pub label: String,
    pub children: Vec<TreeSnapshot>,
}

pub unsafe fn snapshot_tree(tree: &Tree) -> TreeSnapshot {
    let label = read_str(&tree.label);
    let children = match &tree.children {
        Some(kids) => kids.as_slice().iter().map(|c| snapshot_tree(c)).collect(),
        None => Vec::new(),
    };
    TreeSnapshot { label, children }
}

pub fn leaf(label: &str) -> Tree {
    Tree {
        label: own_str(label),
        children: None,
    }
}

pub fn branch(label: &str, children: Vec<Tree>) -> Tree {
    Tree {
        label: own_str(label),
        children: Some(own_slice(children)),
    }
}

pub fn leaf_snapshot(label: &str) -> TreeSnapshot {
    TreeSnapshot {
        label: label.to_string(),
        children: Vec::new(),
    }
}

pub fn branch_snapshot(label: &str, children: Vec<TreeSnapshot>) -> TreeSnapshot {
    TreeSnapshot {
        label: label.to_string(),
        children,
    }
}
