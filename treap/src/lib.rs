//! Persistent treap keyed by one caller-supplied order and balanced by
//! another.
//!
//! A [`Treap`] is an immutable snapshot. [`Treap::upsert`] and
//! [`Treap::delete`] build a new snapshot by copying the path they change;
//! every other subtree is shared through `Arc`, so cloning a snapshot is
//! cheap and snapshots can be read from many threads at once.
//!
//! # Example
//!
//! ```
//! use std::cmp::Ordering;
//! use std::ops::ControlFlow;
//! use treap::Treap;
//!
//! #[derive(Debug, PartialEq)]
//! struct Timer {
//!     name: &'static str,
//!     deadline: u32,
//! }
//!
//! fn by_name(a: &Timer, b: &Timer) -> Ordering {
//!     a.name.cmp(b.name)
//! }
//!
//! // Earliest deadline first.
//! fn by_deadline(a: &Timer, b: &Timer) -> Ordering {
//!     b.deadline.cmp(&a.deadline)
//! }
//!
//! let timers = Treap::new(by_name, by_deadline)
//!     .upsert(Timer { name: "ack", deadline: 20 })
//!     .upsert(Timer { name: "probe", deadline: 5 });
//!
//! assert_eq!(timers.top().map(|t| t.name), Some("probe"));
//!
//! let mut names = Vec::new();
//! let pivot = Timer { name: "a", deadline: 0 };
//! let _ = timers.visit_ascend(&pivot, |t| {
//!     names.push(t.name);
//!     ControlFlow::Continue(())
//! });
//! assert_eq!(names, ["ack", "probe"]);
//! ```

mod node;
mod tree;

pub use tree::{Compare, Treap};
