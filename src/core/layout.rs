//! Board ordering
//!
//! Reordering is a sequence of pairwise transpositions: a drop exchanges
//! the dragged item with the item in the slot it landed on. Nothing is
//! ever inserted before or after another item.

use std::fmt::Debug;

use crate::shared::error::{AppError, AppResult};

/// Ordered sequence of unique identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedList<T> {
    items: Vec<T>,
}

impl<T: PartialEq + Debug> OrderedList<T> {
    /// Fails when `items` contains the same identifier twice.
    pub fn new(items: Vec<T>) -> AppResult<Self> {
        for (i, item) in items.iter().enumerate() {
            if items[..i].contains(item) {
                return Err(AppError::Validation(format!("Duplicate item in order: {:?}", item)));
            }
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn position(&self, id: &T) -> Option<usize> {
        self.items.iter().position(|item| item == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Exchange the positions of `a` and `b`.
    ///
    /// No-op when either is absent or when they are the same item.
    pub fn swap(&mut self, a: &T, b: &T) -> &[T] {
        if a == b {
            return &self.items;
        }

        match (self.position(a), self.position(b)) {
            (Some(i), Some(j)) => {
                self.items.swap(i, j);
                tracing::debug!("Swapped {:?} <-> {:?} (slots {} and {})", a, b, i, j);
            }
            _ => {
                tracing::debug!("Ignoring swap of {:?} and {:?}: not both present", a, b);
            }
        }

        &self.items
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
