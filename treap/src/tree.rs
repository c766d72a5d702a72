//! The public snapshot type.

use std::cmp::Ordering;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::node::{self, Link, Node, Orders};

/// Comparator type used when the orders are plain functions.
pub type Compare<T> = fn(&T, &T) -> Ordering;

/// A persistent treap snapshot.
///
/// Items are searched by the key order and balanced by the priority order:
/// the root always holds the item with the highest priority. Updates return
/// a new snapshot and leave `self` intact; both share every subtree the
/// update did not touch.
///
/// A key keeps the priority it was first inserted with. Upserting an
/// existing key replaces the stored item but not its position; to move a
/// key, delete it first.
pub struct Treap<T, K = Compare<T>, P = Compare<T>> {
    orders: Arc<Orders<K, P>>,
    root: Link<T>,
}

impl<T, K, P> Treap<T, K, P>
where
    K: Fn(&T, &T) -> Ordering,
    P: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty treap ordered by `key_order` and balanced by
    /// `priority_order`.
    #[must_use]
    pub fn new(key_order: K, priority_order: P) -> Self {
        Self {
            orders: Arc::new(Orders {
                key: key_order,
                priority: priority_order,
            }),
            root: None,
        }
    }

    fn with_root(&self, root: Link<T>) -> Self {
        Self {
            orders: Arc::clone(&self.orders),
            root,
        }
    }

    /// Returns the stored item with the same key as `probe`.
    #[must_use]
    pub fn get(&self, probe: &T) -> Option<&T> {
        let mut link = &self.root;
        while let Some(node) = link {
            match (self.orders.key)(probe, &node.item) {
                Ordering::Less => link = &node.left,
                Ordering::Greater => link = &node.right,
                Ordering::Equal => return Some(node.item.as_ref()),
            }
        }
        None
    }

    /// Returns a snapshot that holds `item` under its key.
    #[must_use]
    pub fn upsert(&self, item: T) -> Self {
        let leaf = Node::leaf(Arc::new(item));
        self.with_root(self.orders.union(self.root.clone(), Some(leaf)))
    }

    /// Returns a snapshot without the item keyed like `probe`.
    ///
    /// Deleting an absent key yields an equivalent snapshot.
    #[must_use]
    pub fn delete(&self, probe: &T) -> Self {
        let (less, _, greater) = self.orders.split(&self.root, probe);
        self.with_root(self.orders.join(less, greater))
    }

    /// Merges `other` into this snapshot using this snapshot's orders.
    ///
    /// Items from `other` replace items with equal keys; keys already
    /// present keep their position.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.with_root(self.orders.union(self.root.clone(), other.root.clone()))
    }

    /// Removes the highest-priority item and returns it with the remaining
    /// snapshot.
    #[must_use]
    pub fn pop(&self) -> Option<(&T, Self)> {
        let top = self.root.as_ref()?;
        let rest = self.with_root(self.orders.join(top.left.clone(), top.right.clone()));
        Some((top.item.as_ref(), rest))
    }

    /// Visits items with keys at or above `pivot` in ascending key order.
    ///
    /// Returns `Break` if the visitor stopped the traversal.
    pub fn visit_ascend<F>(&self, pivot: &T, mut visitor: F) -> ControlFlow<()>
    where
        F: FnMut(&T) -> ControlFlow<()>,
    {
        visit_ascend(&self.root, pivot, &self.orders.key, &mut visitor)
    }
}

impl<T, K, P> Treap<T, K, P> {
    /// Item with the lowest key.
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        let mut node = self.root.as_ref()?;
        while let Some(left) = &node.left {
            node = left;
        }
        Some(node.item.as_ref())
    }

    /// Item with the highest key.
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        let mut node = self.root.as_ref()?;
        while let Some(right) = &node.right {
            node = right;
        }
        Some(node.item.as_ref())
    }

    /// Item with the highest priority.
    #[must_use]
    pub fn top(&self) -> Option<&T> {
        self.root.as_ref().map(|node| node.item.as_ref())
    }

    /// Number of items. Walks the whole tree.
    #[must_use]
    pub fn len(&self) -> usize {
        node::count(&self.root)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Depth of the deepest path; 0 when empty.
    #[must_use]
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }
}

fn visit_ascend<T, K, F>(link: &Link<T>, pivot: &T, key: &K, visitor: &mut F) -> ControlFlow<()>
where
    K: Fn(&T, &T) -> Ordering,
    F: FnMut(&T) -> ControlFlow<()>,
{
    let Some(node) = link else {
        return ControlFlow::Continue(());
    };
    if key(pivot, &node.item) != Ordering::Greater {
        if visit_ascend(&node.left, pivot, key, visitor).is_break() {
            return ControlFlow::Break(());
        }
        if visitor(&node.item).is_break() {
            return ControlFlow::Break(());
        }
    }
    visit_ascend(&node.right, pivot, key, visitor)
}

fn collect_in_order<'a, T>(link: &'a Link<T>, out: &mut Vec<&'a T>) {
    if let Some(node) = link {
        collect_in_order(&node.left, out);
        out.push(node.item.as_ref());
        collect_in_order(&node.right, out);
    }
}

impl<T, K, P> Clone for Treap<T, K, P> {
    fn clone(&self) -> Self {
        Self {
            orders: Arc::clone(&self.orders),
            root: self.root.clone(),
        }
    }
}

impl<T: fmt::Debug, K, P> fmt::Debug for Treap<T, K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items = Vec::new();
        collect_in_order(&self.root, &mut items);
        f.debug_list().entries(items).finish()
    }
}
