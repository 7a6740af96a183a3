//! Dense, ID-indexed node storage.
//!
//! An [`Arena`] owns every node of one compilation unit. Handles are plain
//! `u32` indices, so shared and cyclic references between nodes cost nothing
//! to copy. Handles stay stable until [`Arena::compact`] runs at a collection
//! boundary.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Trait for opaque handle types used as arena keys.
pub trait ArenaId: Copy {
    /// Creates a handle from a raw `u32` index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw `u32` index.
    fn as_raw(self) -> u32;
}

/// Defines a `Copy` handle newtype implementing [`ArenaId`].
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        pub struct $name(u32);

        impl $name {
            /// Creates a handle from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl $crate::arena::ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

/// Append-only storage addressed by `I` handles.
#[derive(Debug, Clone)]
pub struct Arena<I: ArenaId, T> {
    items: Vec<T>,
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Stores `item` and returns its handle.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_raw(self.items.len() as u32);
        self.items.push(item);
        id
    }

    /// Returns the item behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is out of bounds.
    pub fn get(&self, id: I) -> &T {
        &self.items[id.as_raw() as usize]
    }

    /// Returns the item behind `id` mutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle is out of bounds.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.as_raw() as usize]
    }

    /// Returns `true` if `id` names an allocated slot.
    pub fn contains(&self, id: I) -> bool {
        (id.as_raw() as usize) < self.items.len()
    }

    /// Number of allocated items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been allocated.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over all handles in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        (0..self.items.len() as u32).map(I::from_raw)
    }

    /// Iterates over `(handle, &item)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_raw(i as u32), item))
    }

    /// Iterates over `(handle, &mut item)` pairs in allocation order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (I, &mut T)> {
        self.items
            .iter_mut()
            .enumerate()
            .map(|(i, item)| (I::from_raw(i as u32), item))
    }

    /// Drops every item whose `live` flag is false, sliding survivors down in
    /// allocation order. Returns the forwarding table indexed by old handle.
    ///
    /// # Panics
    ///
    /// Panics if `live` does not have one flag per item.
    pub fn compact(&mut self, live: &[bool]) -> Vec<Option<I>> {
        assert_eq!(live.len(), self.items.len(), "live map size mismatch");
        let mut forward = Vec::with_capacity(live.len());
        let mut next = 0u32;
        for &keep in live {
            if keep {
                forward.push(Some(I::from_raw(next)));
                next += 1;
            } else {
                forward.push(None);
            }
        }
        let mut flags = live.iter();
        self.items.retain(|_| flags.next().copied().unwrap_or(false));
        forward
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
    }
}
