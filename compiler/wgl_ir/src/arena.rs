//! Typed arenas backing the AST.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Index types that address an [`Arena`].
pub trait ArenaId: Copy {
    fn from_index(index: u32) -> Self;
    fn index(self) -> usize;
}

/// Append-only vector addressed by a typed index.
#[derive(Clone, Debug)]
pub struct Arena<I, T> {
    items: Vec<T>,
    _id: PhantomData<I>,
}

impl<I: ArenaId, T> Arena<I, T> {
    pub fn new() -> Self {
        Arena {
            items: Vec::new(),
            _id: PhantomData,
        }
    }

    /// Store a node and return its index.
    ///
    /// # Panics
    /// Panics past `u32::MAX - 1` nodes; the source size limit keeps real
    /// inputs far below that.
    pub fn alloc(&mut self, item: T) -> I {
        let index = u32::try_from(self.items.len())
            .ok()
            .filter(|&i| i != u32::MAX)
            .unwrap_or_else(|| panic!("arena exhausted"));
        self.items.push(item);
        I::from_index(index)
    }

    #[inline]
    pub fn get(&self, id: I) -> Option<&T> {
        self.items.get(id.index())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    #[inline]
    fn index(&self, id: I) -> &T {
        &self.items[id.index()]
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    #[inline]
    fn index_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.index()]
    }
}
