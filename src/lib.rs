//! An ordered multiset for Rust, backed by a red-black tree.
//!
//! This crate provides [`RedBlackTree`], a self-balancing binary search tree that keeps its
//! elements sorted and allows duplicates:
//!
//! - [`add`](RedBlackTree::add) - Insert unconditionally; equal elements accumulate
//! - [`add_if_missing`](RedBlackTree::add_if_missing) / [`add_overwrite`](RedBlackTree::add_overwrite) -
//!   Set-like insertion policies
//! - [`occurrences_of`](RedBlackTree::occurrences_of) - Count equal elements
//! - [`remove`](RedBlackTree::remove) / [`remove_all`](RedBlackTree::remove_all) - Remove one or
//!   every occurrence
//! - [`pop`](RedBlackTree::pop) - Extract the minimum
//!
//! # Example
//!
//! ```
//! use rb_multiset::RedBlackTree;
//!
//! let mut tasks = RedBlackTree::new();
//! tasks.add((2, "write tests"));
//! tasks.add((1, "fix build"));
//! tasks.add((2, "write docs"));
//!
//! // The minimum comes out first.
//! assert_eq!(tasks.pop(), Some((1, "fix build")));
//! assert_eq!(tasks.len(), 2);
//!
//! // Iteration is in ascending order.
//! let rest: Vec<_> = tasks.iter().map(|(_, name)| *name).collect();
//! assert_eq!(rest, ["write docs", "write tests"]);
//! ```
//!
//! # Ordering
//!
//! Elements are ordered by a comparator implementing [`compare::Compare`]. [`RedBlackTree::new`]
//! uses the element type's [`Ord`]; [`RedBlackTree::with_cmp`] accepts any comparator,
//! including closures. Equality is decided by the comparator alone, so elements may carry
//! payload that does not take part in ordering.
//!
//! # Implementation
//!
//! Nodes live in an arena and link to their children and parent by index, with freed slots
//! recycled through a free-list. Rebalancing is the textbook red-black case analysis:
//! recoloring and rotations after insertion, and the sibling cases after removing a black
//! node. [`RedBlackTree::validate`] checks every invariant and is intended for tests.
//!
//! The tree is not synchronized. Share it across threads behind a lock.
//!
//! The crate is `no_std` and only requires `alloc`.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod tree;

pub use error::InvariantError;
pub use tree::RedBlackTree;
