//! # Sparse Set
//!
//! Integer-keyed set with O(1) membership test, insert and erase, plus
//! dense iteration over the present values.
//!
//! Two arrays back the set:
//! - `dense`: the present values, packed
//! - `sparse`: value -> position in `dense`
//!
//! A `sparse` entry is only trusted when it round-trips, i.e.
//! `dense[sparse[v]] == v`. Stale entries are never cleared.
//!
//! ## Ordering
//!
//! Erase is a swap-remove: the last dense value moves into the erased
//! slot. Iteration order is therefore NOT insertion order once anything
//! has been erased.

use std::collections::TryReserveError;

use super::entity::Entity;

/// A value that can key a [`SparseSet`].
///
/// The index is used directly as a position in the sparse array, so
/// large values cost memory proportional to their magnitude.
pub trait SparseIndex: Copy + PartialEq {
    /// Converts the value into a sparse array position.
    fn to_index(self) -> usize;
}

macro_rules! impl_sparse_index {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl SparseIndex for $ty {
                #[inline]
                #[allow(clippy::cast_possible_truncation)]
                fn to_index(self) -> usize {
                    self as usize
                }
            }
        )+
    };
}

impl_sparse_index!(u8, u16, u32, u64, usize);

impl SparseIndex for Entity {
    #[inline]
    fn to_index(self) -> usize {
        self.index()
    }
}

/// Sparse set of integer-like values.
///
/// # Example
///
/// ```rust
/// use indie_ecs::SparseSet;
///
/// let mut set: SparseSet<u32> = SparseSet::new();
/// set.insert(3);
/// set.insert(9);
/// assert!(set.has(9));
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.capacity(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct SparseSet<T: SparseIndex> {
    /// Packed present values.
    dense: Vec<T>,
    /// Value -> dense position. Only valid where it round-trips.
    sparse: Vec<usize>,
}

impl<T: SparseIndex> SparseSet<T> {
    /// Creates an empty set with zero capacity.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dense: Vec::new(),
            sparse: Vec::new(),
        }
    }

    /// Creates an empty set able to hold values in `[0, capacity)`
    /// without growing.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut set = Self::new();
        set.reserve(capacity);
        set
    }

    /// Checks if `value` is present.
    ///
    /// Values beyond the current capacity are simply absent.
    #[inline]
    #[must_use]
    pub fn has(&self, value: T) -> bool {
        self.index_of(value).is_some()
    }

    /// Returns the dense position of `value`, if present.
    #[inline]
    #[must_use]
    pub fn index_of(&self, value: T) -> Option<usize> {
        let slot = *self.sparse.get(value.to_index())?;
        match self.dense.get(slot) {
            Some(&stored) if stored == value => Some(slot),
            _ => None,
        }
    }

    /// Inserts `value`, growing capacity to `value + 1` if needed.
    ///
    /// # Returns
    ///
    /// `true` if the value was inserted, `false` if it was already present.
    pub fn insert(&mut self, value: T) -> bool {
        if self.has(value) {
            return false;
        }

        let index = value.to_index();
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, 0);
        }

        self.sparse[index] = self.dense.len();
        self.dense.push(value);
        true
    }

    /// Removes `value` by swapping the last dense value into its slot.
    ///
    /// # Returns
    ///
    /// `true` if the value was present and removed.
    pub fn erase(&mut self, value: T) -> bool {
        let Some(slot) = self.index_of(value) else {
            return false;
        };

        self.dense.swap_remove(slot);
        if let Some(&moved) = self.dense.get(slot) {
            self.sparse[moved.to_index()] = slot;
        }
        true
    }

    /// Grows the set so values in `[0, capacity)` fit without reallocation.
    ///
    /// Never shrinks and never changes membership.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.sparse.len() {
            self.dense.reserve(capacity - self.dense.len());
            self.sparse.resize(capacity, 0);
        }
    }

    /// Fallible version of [`SparseSet::reserve`].
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if either array cannot grow. The set
    /// is left unchanged in that case.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        if capacity > self.sparse.len() {
            self.sparse.try_reserve(capacity - self.sparse.len())?;
            self.dense.try_reserve(capacity - self.dense.len())?;
            self.sparse.resize(capacity, 0);
        }
        Ok(())
    }

    /// Number of present values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Checks if no value is present.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Exclusive upper bound of values that fit without growing.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.sparse.len()
    }

    /// Removes every value. Capacity is kept.
    pub fn clear(&mut self) {
        self.dense.clear();
    }

    /// First value in dense order.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<T> {
        self.dense.first().copied()
    }

    /// Present values in dense order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.dense
    }

    /// Iterates present values in dense order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + '_ {
        self.dense.iter().copied()
    }
}

impl<T: SparseIndex> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: SparseIndex> IntoIterator for &'a SparseSet<T> {
    type Item = T;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.dense.iter().copied()
    }
}
