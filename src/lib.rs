//! A WAVL (weak AVL) tree map for Rust.
//!
//! This crate provides [`WavlMap`], an ordered map from `i64` keys to
//! `String` values backed by a rank-balanced WAVL tree with two
//! augmentations:
//!
//! - [`select`](WavlMap::select) - Get the value at a given 1-based sorted
//!   position in O(log n), via per-node subtree sizes
//! - [`min`](WavlMap::min) / [`max`](WavlMap::max) - Constant-time access
//!   to the boundary entries, via cached extreme handles
//!
//! Insert and remove additionally report how many rebalancing operations
//! (promotions, demotions, and rotation work) they performed, which makes
//! the tree's amortized-constant rebalancing directly observable.
//!
//! # Example
//!
//! ```
//! use wavl_tree::WavlMap;
//!
//! let mut ledger = WavlMap::new();
//! ledger.insert(1913, "founded".to_string()).unwrap();
//! ledger.insert(2024, "audited".to_string()).unwrap();
//! ledger.insert(1987, "incorporated".to_string()).unwrap();
//!
//! assert_eq!(ledger.get(1987), Some("incorporated"));
//! assert_eq!(ledger.min(), Some("founded"));
//! assert_eq!(ledger.select(2), Ok("incorporated"));
//!
//! // The second-oldest record leaves without any restructuring.
//! assert_eq!(ledger.remove(1987), Ok(0));
//! assert_eq!(ledger.keys(), vec![1913, 2024]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library
//!   dependency
//! - **O(log n) everything** - Search, insert, remove, and select all stay
//!   logarithmic; min and max are O(1)
//! - **Observable rebalancing** - Mutations return their rebalancing
//!   operation counts
//!
//! # Implementation
//!
//! Nodes live in a slot arena and refer to each other by 4-byte handles,
//! so the tree carries parent back-links without reference counting or
//! unsafe code. Ranks follow the weak-AVL rule: every child sits 1 or 2
//! ranks below its parent and leaves sit at rank 0.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

extern crate alloc;

mod error;
mod raw;

pub mod wavl_map;

pub use error::Error;
pub use wavl_map::{NodeRef, WavlMap};
