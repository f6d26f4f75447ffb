//! Provides [`BalancedTree`], an ordered map backed by a red-black tree.
use core::{borrow::Borrow, fmt, ops::Index};

use crate::{
    raw::{RawTree, Search},
    Error,
};

#[cfg(test)]
mod tests;

/// An ordered map based on a red-black tree.
///
/// Every operation takes *O*(log *n*) time no matter in which order the keys
/// are inserted or removed.
///
/// # Duplicate Keys
///
/// The keys are unique. [`insert`](Self::insert) replaces the value of an
/// existing entry, while [`try_insert`](Self::try_insert) refuses to do so.
///
/// # Examples
///
/// ```rust
/// use balanced_tree::{BalancedTree, Error};
///
/// let mut tree = BalancedTree::new();
/// tree.insert(3, "c");
/// tree.insert(1, "a");
/// assert_eq!(tree.insert(3, "C"), Some("c"));
///
/// assert!(tree.contains(&1));
/// assert_eq!(tree.get(&3), Some(&"C"));
/// assert_eq!(tree.remove(&1), Ok("a"));
/// assert_eq!(tree.remove(&1), Err(Error::NotFound));
/// ```
#[derive(Clone)]
pub struct BalancedTree<K, V> {
    raw: RawTree<K, V>,
}

impl<K, V> BalancedTree<K, V> {
    /// Construct an empty `BalancedTree`.
    #[inline]
    pub const fn new() -> Self {
        Self {
            raw: RawTree::new(),
        }
    }

    /// Get the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Get a flag indicating whether the tree has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        log::debug!("Clearing {} entries", self.raw.len());
        self.raw.clear();
    }
}

impl<K: Ord, V> BalancedTree<K, V> {
    /// Insert an entry. If the tree already has an entry with an equal key,
    /// its value is replaced (the key is kept) and the old value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.raw.search(&key) {
            Search::Found(id) => {
                log::trace!("Overwriting the value of an existing entry");
                Some(core::mem::replace(&mut self.raw.node_mut(id).value, value))
            }
            Search::Vacant(position) => {
                self.raw.insert_at(position, key, value);
                None
            }
        }
    }

    /// Insert an entry if the tree has no entry with an equal key. Otherwise,
    /// the tree is left unchanged and [`Error::DuplicateKey`] is returned.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), Error> {
        match self.raw.search(&key) {
            Search::Found(_) => {
                log::trace!("Rejecting a duplicate key");
                Err(Error::DuplicateKey)
            }
            Search::Vacant(position) => {
                self.raw.insert_at(position, key, value);
                Ok(())
            }
        }
    }

    /// Get a flag indicating whether the tree has an entry with the given
    /// key.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.find(key).is_some()
    }

    /// Get a reference to the value associated with the given key.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.find(key).map(|id| &self.raw.node(id).value)
    }

    /// Get a mutable reference to the value associated with the given key.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.raw.find(key)?;
        Some(&mut self.raw.node_mut(id).value)
    }

    /// Get the stored key and value associated with the given key.
    #[inline]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.find(key).map(|id| {
            let node = self.raw.node(id);
            (&node.key, &node.value)
        })
    }

    /// Remove the entry with the given key and return its value.
    ///
    /// Returns [`Error::NotFound`] (leaving the tree untouched) if there's no
    /// such entry.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Remove the entry with the given key and return the stored key and
    /// value.
    ///
    /// Returns [`Error::NotFound`] (leaving the tree untouched) if there's no
    /// such entry.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Result<(K, V), Error>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if let Some(id) = self.raw.find(key) {
            Ok(self.raw.remove(id))
        } else {
            log::trace!("Attempted to remove a nonexistent entry");
            Err(Error::NotFound)
        }
    }
}

impl<K, V> Default for BalancedTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BalancedTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        let mut cursor = self.raw.first();
        while let Some(id) = cursor {
            let node = self.raw.node(id);
            map.entry(&node.key, &node.value);
            cursor = self.raw.successor(id);
        }
        map.finish()
    }
}

impl<K, Q, V> Index<&Q> for BalancedTree<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// Get a reference to the value associated with the given key.
    ///
    /// # Panics
    ///
    /// Panics if there's no such entry.
    #[inline]
    #[track_caller]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for the key")
    }
}

impl<K: Ord, V> Extend<(K, V)> for BalancedTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BalancedTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
