//! Index-addressed node storage
use alloc::vec::Vec;
use core::{
    mem::replace,
    ops::{Index, IndexMut},
};

/// A handle to a value stored in an [`Arena`].
///
/// A handle stays valid until the value is removed by [`Arena::free`]. After
/// that, the slot may be reused by a later allocation, so a stale handle may
/// silently refer to an unrelated value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied(T),
    /// Part of the free list
    Vacant { next_free: Option<NodeId> },
}

/// A `Vec`-backed pool of values. Removed slots are chained into a free list
/// and reused by subsequent allocations.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<NodeId>,
    len: usize,
}

impl<T> Arena<T> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    /// Get the number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Store `value` and return its handle.
    ///
    /// # Panics
    ///
    /// Panics if the arena would need more than `u32::MAX` slots.
    pub fn alloc(&mut self, value: T) -> NodeId {
        let id = if let Some(id) = self.free_head {
            match replace(&mut self.slots[id.index()], Slot::Occupied(value)) {
                Slot::Vacant { next_free } => self.free_head = next_free,
                Slot::Occupied(_) => unreachable!("free list points to a live slot"),
            }
            id
        } else {
            let id = u32::try_from(self.slots.len()).expect("arena capacity overflow");
            self.slots.push(Slot::Occupied(value));
            NodeId(id)
        };

        self.len += 1;
        id
    }

    /// Remove the value referenced by `id` and return it. Removing the last
    /// live value releases the slot storage.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live value.
    pub fn free(&mut self, id: NodeId) -> T {
        let next_free = self.free_head;
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| matches!(slot, Slot::Occupied(_)))
            .unwrap_or_else(|| panic!("{:?} was freed twice", id));

        let value = match replace(slot, Slot::Vacant { next_free }) {
            Slot::Occupied(value) => value,
            Slot::Vacant { .. } => unreachable!(),
        };
        self.free_head = Some(id);
        self.len -= 1;

        if self.len == 0 {
            self.clear();
        }
        value
    }

    /// Drop all values at once.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, id: NodeId) -> &T {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(value)) => value,
            _ => panic!("dangling {:?}", id),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied(value)) => value,
            _ => panic!("dangling {:?}", id),
        }
    }
}
