// piiscrub-trie/src/lib.rs
//! Immutable prefix-tree dictionary used to gate name candidates.
//!
//! The trie is built once from a name corpus through [`NameTrieBuilder`] and is
//! read-only afterwards, so a single instance can be shared across threads
//! behind an `Arc` without locking.
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod normalize;
pub mod trie;

pub use trie::{NameTrie, NameTrieBuilder};
