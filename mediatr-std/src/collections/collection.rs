//! Ordered, concurrency-safe sequence.

use parking_lot::RwLock;
use std::fmt;
use std::ops::ControlFlow;

/// A concurrency-safe list with positional access.
///
/// Used for subscriber lists, where registration order is delivery order.
/// Positional accessors panic on out-of-range indices, like slice indexing:
/// a bad index is a programming error, not a recoverable condition.
pub struct Collection<T> {
    items: RwLock<Vec<T>>,
}

impl<T> Collection<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Create an empty collection with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: RwLock::new(Vec::with_capacity(capacity)),
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The item at `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn get(&self, index: usize) -> T
    where
        T: Clone,
    {
        self.items.read()[index].clone()
    }

    /// Append an item.
    pub fn add(&self, item: T) {
        self.items.write().push(item);
    }

    /// Prepend an item.
    pub fn unshift(&self, item: T) {
        self.insert(0, item);
    }

    /// Remove and return the first item.
    pub fn shift(&self) -> Option<T> {
        let mut items = self.items.write();
        if items.is_empty() {
            None
        } else {
            Some(items.remove(0))
        }
    }

    /// Insert `item` at `index`, shifting later items back.
    ///
    /// # Panics
    ///
    /// If `index > len`.
    pub fn insert(&self, index: usize, item: T) {
        self.items.write().insert(index, item);
    }

    /// Remove the half-open range `[from, to)`.
    ///
    /// Removed items are dropped before this returns, so the collection
    /// keeps no reference to them.
    ///
    /// # Panics
    ///
    /// If `from > to` or `to > len`.
    pub fn delete(&self, from: usize, to: usize) {
        self.items.write().drain(from..to).for_each(drop);
    }

    /// Visit items in order until `visit` breaks.
    ///
    /// Runs over a snapshot taken under the shared lock.
    pub fn visit<F>(&self, mut visit: F)
    where
        T: Clone,
        F: FnMut(usize, &T) -> ControlFlow<()>,
    {
        for (i, item) in self.items().iter().enumerate() {
            if visit(i, item).is_break() {
                break;
            }
        }
    }

    /// An independent copy of the items.
    pub fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.read().clone()
    }

    /// Remove every item and release the backing storage.
    pub fn clear(&self) {
        *self.items.write() = Vec::new();
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: fmt::Debug> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.read().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_positional_edits() {
        let list = Collection::new();
        assert!(list.is_empty());

        list.add(2);
        list.add(4);
        list.unshift(1);
        list.insert(2, 3);
        assert_eq!(list.items(), vec![1, 2, 3, 4]);
        assert_eq!(list.get(2), 3);

        list.delete(1, 3);
        assert_eq!(list.items(), vec![1, 4]);

        assert_eq!(list.shift(), Some(1));
        assert_eq!(list.shift(), Some(4));
        assert_eq!(list.shift(), None);
    }

    #[test]
    fn test_with_capacity_starts_empty() {
        let list = Collection::with_capacity(4);
        assert!(list.is_empty());

        list.add("a");
        assert_eq!(list.items(), vec!["a"]);
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_range_panics() {
        let list = Collection::from(vec![1]);
        let _ = list.get(1);
    }

    #[test]
    #[should_panic]
    fn test_delete_invalid_range_panics() {
        let list: Collection<i32> = (0..3).collect();
        list.delete(2, 5);
    }

    #[test]
    fn test_delete_releases_references() {
        let shared = Arc::new(());
        let list = Collection::new();
        list.add(Arc::clone(&shared));
        list.add(Arc::clone(&shared));
        assert_eq!(Arc::strong_count(&shared), 3);

        list.delete(0, 2);
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn test_items_is_a_copy() {
        let list = Collection::from(vec![1, 2]);
        let mut snapshot = list.items();
        snapshot.push(3);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_visit_early_stop() {
        let list: Collection<_> = (10..20).collect();
        let mut seen = Vec::new();
        list.visit(|i, item| {
            seen.push((i, *item));
            if i == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(seen, vec![(0, 10), (1, 11), (2, 12)]);
    }

    #[test]
    fn test_clear() {
        let list = Collection::from(vec!["a", "b"]);
        list.clear();
        assert!(list.is_empty());
        list.add("c");
        assert_eq!(list.items(), vec!["c"]);
    }

    #[test]
    fn test_concurrent_appends() {
        let list = Collection::new();
        thread::scope(|s| {
            for t in 0..4 {
                let list = &list;
                s.spawn(move || {
                    for i in 0..250 {
                        list.add(t * 1000 + i);
                    }
                });
            }
        });
        assert_eq!(list.len(), 1000);

        let mut items = list.items();
        items.sort_unstable();
        items.dedup();
        assert_eq!(items.len(), 1000);
    }
}
