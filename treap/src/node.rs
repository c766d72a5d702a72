//! Immutable nodes and the split/join/union primitives.
//!
//! Every primitive takes links by reference or value and returns fresh
//! nodes along the path it touches; untouched subtrees are shared.

use std::cmp::Ordering;
use std::sync::Arc;

pub(crate) type Link<T> = Option<Arc<Node<T>>>;

/// Result of [`Orders::split`]: keys below the probe, the node holding the
/// probe's key (if any), keys above the probe.
pub(crate) type Split<T> = (Link<T>, Link<T>, Link<T>);

#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) item: Arc<T>,
    /// Item whose priority placed this key. Differs from `item` once the
    /// key has been updated.
    pub(crate) rank: Arc<T>,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
}

impl<T> Node<T> {
    pub(crate) fn leaf(item: Arc<T>) -> Arc<Self> {
        Arc::new(Self {
            rank: Arc::clone(&item),
            item,
            left: None,
            right: None,
        })
    }

    fn new(item: Arc<T>, rank: Arc<T>, left: Link<T>, right: Link<T>) -> Arc<Self> {
        Arc::new(Self {
            item,
            rank,
            left,
            right,
        })
    }

    /// Copies this node with new children.
    fn with_children(&self, left: Link<T>, right: Link<T>) -> Arc<Self> {
        Self::new(Arc::clone(&self.item), Arc::clone(&self.rank), left, right)
    }
}

/// The two orders a treap is built on.
pub(crate) struct Orders<K, P> {
    pub(crate) key: K,
    pub(crate) priority: P,
}

impl<K, P> Orders<K, P> {
    /// Partitions `link` around `probe`'s key.
    pub(crate) fn split<T>(&self, link: &Link<T>, probe: &T) -> Split<T>
    where
        K: Fn(&T, &T) -> Ordering,
    {
        let Some(node) = link else {
            return (None, None, None);
        };
        match (self.key)(probe, &node.item) {
            Ordering::Equal => (node.left.clone(), Some(Arc::clone(node)), node.right.clone()),
            Ordering::Less => {
                let (less, found, greater) = self.split(&node.left, probe);
                let rebuilt = node.with_children(greater, node.right.clone());
                (less, found, Some(rebuilt))
            }
            Ordering::Greater => {
                let (less, found, greater) = self.split(&node.right, probe);
                let rebuilt = node.with_children(node.left.clone(), less);
                (Some(rebuilt), found, greater)
            }
        }
    }

    /// Concatenates two trees where every key in `less` is below every key
    /// in `greater`.
    pub(crate) fn join<T>(&self, less: Link<T>, greater: Link<T>) -> Link<T>
    where
        P: Fn(&T, &T) -> Ordering,
    {
        match (less, greater) {
            (None, tree) | (tree, None) => tree,
            (Some(less), Some(greater)) => {
                if (self.priority)(&less.rank, &greater.rank) == Ordering::Greater {
                    let right = self.join(less.right.clone(), Some(greater));
                    Some(less.with_children(less.left.clone(), right))
                } else {
                    let left = self.join(Some(less), greater.left.clone());
                    Some(greater.with_children(left, greater.right.clone()))
                }
            }
        }
    }

    /// Merges `incoming` into `existing`.
    ///
    /// On equal keys the incoming item is kept, placed by the existing
    /// node's rank.
    pub(crate) fn union<T>(&self, existing: Link<T>, incoming: Link<T>) -> Link<T>
    where
        K: Fn(&T, &T) -> Ordering,
        P: Fn(&T, &T) -> Ordering,
    {
        let (existing, incoming) = match (existing, incoming) {
            (None, tree) | (tree, None) => return tree,
            (Some(existing), Some(incoming)) => (existing, incoming),
        };

        if (self.priority)(&existing.rank, &incoming.rank) == Ordering::Greater {
            let (less, found, greater) = self.split(&Some(incoming), &existing.item);
            let item = found.map_or_else(|| Arc::clone(&existing.item), |n| Arc::clone(&n.item));
            return Some(Node::new(
                item,
                Arc::clone(&existing.rank),
                self.union(existing.left.clone(), less),
                self.union(existing.right.clone(), greater),
            ));
        }

        let (less, found, greater) = self.split(&Some(existing), &incoming.item);
        let left = self.union(less, incoming.left.clone());
        let right = self.union(greater, incoming.right.clone());
        match found {
            None => Some(Node::new(
                Arc::clone(&incoming.item),
                Arc::clone(&incoming.rank),
                left,
                right,
            )),
            Some(pinned) => {
                let leaf = Node::new(
                    Arc::clone(&incoming.item),
                    Arc::clone(&pinned.rank),
                    None,
                    None,
                );
                self.join(self.join(left, Some(leaf)), right)
            }
        }
    }
}

pub(crate) fn height<T>(link: &Link<T>) -> usize {
    link.as_ref()
        .map_or(0, |node| 1 + height(&node.left).max(height(&node.right)))
}

pub(crate) fn count<T>(link: &Link<T>) -> usize {
    link.as_ref()
        .map_or(0, |node| 1 + count(&node.left) + count(&node.right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    type Pair = (u8, u8);

    type PairOrders = Orders<fn(&Pair, &Pair) -> Ordering, fn(&Pair, &Pair) -> Ordering>;

    fn orders() -> PairOrders {
        Orders {
            key: |a, b| a.0.cmp(&b.0),
            priority: |a, b| a.1.cmp(&b.1),
        }
    }

    fn insert(orders: &PairOrders, root: Link<Pair>, item: Pair) -> Link<Pair> {
        orders.union(root, Some(Node::leaf(Arc::new(item))))
    }

    fn keys(link: &Link<Pair>, out: &mut Vec<u8>) {
        if let Some(node) = link {
            keys(&node.left, out);
            out.push(node.item.0);
            keys(&node.right, out);
        }
    }

    /// Checks key order and the heap property on ranks.
    fn assert_invariants(link: &Link<Pair>) {
        let mut in_order = Vec::new();
        keys(link, &mut in_order);
        assert!(in_order.windows(2).all(|w| w[0] < w[1]), "keys {in_order:?}");
        assert_heap(link);
    }

    fn assert_heap(link: &Link<Pair>) {
        let Some(node) = link else { return };
        for child in [&node.left, &node.right].into_iter().flatten() {
            assert!(child.rank.1 <= node.rank.1);
        }
        assert_heap(&node.left);
        assert_heap(&node.right);
    }

    #[test]
    fn split_partitions_around_probe() {
        let orders = orders();
        let mut root = None;
        for item in [(5, 50), (2, 20), (8, 80), (1, 10), (9, 90)] {
            root = insert(&orders, root, item);
        }

        let (less, found, greater) = orders.split(&root, &(5, 0));
        assert_eq!(found.map(|n| n.item.0), Some(5));
        let (mut below, mut above) = (Vec::new(), Vec::new());
        keys(&less, &mut below);
        keys(&greater, &mut above);
        assert_eq!(below, [1, 2]);
        assert_eq!(above, [8, 9]);

        let (_, missing, _) = orders.split(&root, &(4, 0));
        assert!(missing.is_none());
    }

    #[test]
    fn split_leaves_source_untouched() {
        let orders = orders();
        let mut root = None;
        for item in [(3, 1), (1, 2), (2, 3)] {
            root = insert(&orders, root, item);
        }
        let before = count(&root);
        let _ = orders.split(&root, &(2, 0));
        assert_eq!(count(&root), before);
        assert_invariants(&root);
    }

    #[test]
    fn join_picks_higher_rank_root() {
        let orders = orders();
        let less = insert(&orders, None, (1, 5));
        let greater = insert(&orders, None, (2, 7));
        let joined = orders.join(less, greater);
        assert_eq!(joined.as_ref().map(|n| n.item.0), Some(2));
        assert_invariants(&joined);
    }

    #[test]
    fn union_keeps_existing_rank() {
        let orders = orders();
        let mut root = None;
        for item in [(1, 100), (2, 200), (3, 250), (1, 240)] {
            root = insert(&orders, root, item);
        }
        // Key 1 is still placed by rank 100, so it stays below key 2.
        let top = root.as_ref().unwrap();
        assert_eq!(top.item.0, 3);
        let middle = top.left.as_ref().unwrap();
        assert_eq!(middle.item.0, 2);
        let bottom = middle.left.as_ref().unwrap();
        assert_eq!(*bottom.item, (1, 240));
        assert_eq!(*bottom.rank, (1, 100));
        assert_eq!(height(&root), 3);
        assert_invariants(&root);
    }

    #[test]
    fn union_of_two_trees() {
        let orders = orders();
        let mut a = None;
        let mut b = None;
        for item in [(1, 9), (3, 4), (5, 7)] {
            a = insert(&orders, a, item);
        }
        for item in [(2, 8), (3, 1), (6, 3)] {
            b = insert(&orders, b, item);
        }
        let merged = orders.union(a, b);
        let mut all = Vec::new();
        keys(&merged, &mut all);
        assert_eq!(all, [1, 2, 3, 5, 6]);
        assert_invariants(&merged);
    }

    proptest! {
        #[test]
        fn prop_invariants_hold(ops in prop::collection::vec((any::<bool>(), 0u8..32, any::<u8>()), 0..64)) {
            let orders = orders();
            let mut root = None;
            for (is_insert, key, priority) in ops {
                if is_insert {
                    root = insert(&orders, root, (key, priority));
                } else {
                    let (less, _, greater) = orders.split(&root, &(key, 0));
                    root = orders.join(less, greater);
                }
                assert_invariants(&root);
            }
        }
    }
}
