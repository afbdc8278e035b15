//! Ordered entity pools
//!
//! Live terrain segments and gems are kept in insertion order. The scroller
//! mutates and removes elements in the same pass, so removal goes through
//! [`EntityPool::retire_where`], which visits each element exactly once.

use serde::{Deserialize, Serialize};

use crate::scene::VisualHandle;

/// Anything that owns a visual in the scene
pub trait Entity {
    fn handle(&self) -> VisualHandle;
}

/// Insertion-ordered sequence of live entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPool<T> {
    items: Vec<T>,
}

impl<T> Default for EntityPool<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> EntityPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the element at `index`, shifting later elements down
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Remove everything, keeping the allocation for the next run
    pub fn remove_all(&mut self) -> Vec<T> {
        self.items.drain(..).collect()
    }

    /// Visit every element once in order; remove those where `retire` is true.
    ///
    /// The closure may mutate the element before deciding. Removed elements
    /// are returned in their original order.
    pub fn retire_where<F>(&mut self, mut retire: F) -> Vec<T>
    where
        F: FnMut(&mut T) -> bool,
    {
        let mut retired = Vec::new();
        let mut i = 0;
        while i < self.items.len() {
            if retire(&mut self.items[i]) {
                retired.push(self.items.remove(i));
            } else {
                i += 1;
            }
        }
        retired
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Entity> EntityPool<T> {
    pub fn position_of(&self, handle: VisualHandle) -> Option<usize> {
        self.items.iter().position(|e| e.handle() == handle)
    }

    pub fn find(&self, handle: VisualHandle) -> Option<&T> {
        self.items.iter().find(|e| e.handle() == handle)
    }

    pub fn remove_by_handle(&mut self, handle: VisualHandle) -> Option<T> {
        let index = self.position_of(handle)?;
        self.remove_at(index)
    }
}

impl<'a, T> IntoIterator for &'a EntityPool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
