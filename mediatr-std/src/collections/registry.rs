//! Insertion-ordered keyed registry.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::mem;
use std::ops::ControlFlow;

/// A concurrency-safe map from key to bound value.
///
/// Entries keep the order in which their key was first inserted: `values`,
/// `keys` and `visit` all iterate in that order. Overwriting a key keeps its
/// original position; removing a key closes the gap.
///
/// # Example
///
/// ```rust
/// use mediatr_std::collections::Registry;
///
/// let registry = Registry::new();
/// registry.set("b", 2);
/// registry.set("a", 1);
/// assert_eq!(registry.values(), vec![2, 1]);
/// assert!(registry.try_insert("a", 10).is_err());
/// ```
pub struct Registry<K, V> {
    inner: RwLock<Entries<K, V>>,
}

struct Entries<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<(K, V)>,
}

impl<K, V> Default for Entries<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            slots: Vec::new(),
        }
    }
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Entries::default()),
        }
    }

    /// Insert or overwrite, returning the previous value.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        let mut entries = self.inner.write();
        if let Some(&slot) = entries.index.get(&key) {
            return Some(mem::replace(&mut entries.slots[slot].1, value));
        }
        let slot = entries.slots.len();
        entries.index.insert(key.clone(), slot);
        entries.slots.push((key, value));
        None
    }

    /// Insert only if `key` is vacant. The check and the insert happen under
    /// one exclusive lock.
    ///
    /// Returns the rejected value when the key is already bound.
    pub fn try_insert(&self, key: K, value: V) -> Result<(), V> {
        let mut entries = self.inner.write();
        if entries.index.contains_key(&key) {
            return Err(value);
        }
        let slot = entries.slots.len();
        entries.index.insert(key.clone(), slot);
        entries.slots.push((key, value));
        Ok(())
    }

    /// Return the value bound to `key`, creating it with `make` if vacant.
    pub fn get_or_insert_with<F>(&self, key: K, make: F) -> V
    where
        V: Clone,
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        self.update_or_insert_with(key, make, V::clone)
    }

    /// Run `apply` on the value bound to `key`, creating it with `make` if
    /// vacant.
    ///
    /// Lookup, creation and `apply` all happen under one exclusive lock, so
    /// no concurrent `remove`, `clear` or `drain` can come between them.
    /// `apply` must not call back into this registry.
    pub fn update_or_insert_with<F, A, T>(&self, key: K, make: F, apply: A) -> T
    where
        F: FnOnce() -> V,
        A: FnOnce(&V) -> T,
    {
        let mut entries = self.inner.write();
        let slot = match entries.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = entries.slots.len();
                entries.index.insert(key.clone(), slot);
                entries.slots.push((key, make()));
                slot
            }
        };
        apply(&entries.slots[slot].1)
    }

    /// The value bound to `key`.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let entries = self.inner.read();
        entries
            .index
            .get(key)
            .map(|&slot| entries.slots[slot].1.clone())
    }

    /// Whether `key` is bound.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().index.contains_key(key)
    }

    /// Unbind `key`, returning its value.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut entries = self.inner.write();
        let slot = entries.index.remove(key)?;
        let (_, value) = entries.slots.remove(slot);
        for idx in entries.index.values_mut() {
            if *idx > slot {
                *idx -= 1;
            }
        }
        Some(value)
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.inner.read().slots.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all values, in insertion order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.inner.read().slots.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Snapshot of all keys, in insertion order.
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().slots.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of all entries, in insertion order.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.inner.read().slots.clone()
    }

    /// Visit entries in insertion order until `visit` breaks.
    ///
    /// Runs over a snapshot: concurrent writers neither block nor affect
    /// the visit, and `visit` may mutate this registry.
    pub fn visit<F>(&self, mut visit: F)
    where
        V: Clone,
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        for (key, value) in self.entries() {
            if visit(&key, &value).is_break() {
                break;
            }
        }
    }

    /// Remove every entry and return the values, in insertion order.
    ///
    /// Emptying and taking happen under one exclusive lock.
    pub fn drain(&self) -> Vec<V> {
        let mut entries = self.inner.write();
        entries.index.clear();
        mem::take(&mut entries.slots)
            .into_iter()
            .map(|(_, value)| value)
            .collect()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        let mut entries = self.inner.write();
        entries.index.clear();
        entries.slots.clear();
    }
}

impl<K, V> Default for Registry<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Registry<K, V>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.inner.read();
        f.debug_struct("Registry")
            .field("keys", &entries.slots.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish()
    }
}
