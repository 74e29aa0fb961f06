//! Fixed-capacity list with explicit truncation reporting

use heapless::Vec;

/// Outcome of a full-replace sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncReport {
    /// Entries now held
    pub stored: usize,
    /// Entries offered beyond capacity and discarded
    pub dropped: usize,
}

impl SyncReport {
    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }
}

/// A list of at most `N` entries, only ever replaced wholesale
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedList<T, const N: usize> {
    items: Vec<T, N>,
}

impl<T, const N: usize> Default for BoundedList<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> BoundedList<T, N> {
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Empty the list, then insert from `items` until full
    ///
    /// Entries past capacity are counted, not stored.
    pub fn replace_from<I>(&mut self, items: I) -> SyncReport
    where
        I: IntoIterator<Item = T>,
    {
        self.items.clear();
        let mut dropped = 0;
        for item in items {
            if self.items.push(item).is_err() {
                dropped += 1;
            }
        }
        SyncReport {
            stored: self.items.len(),
            dropped,
        }
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a BoundedList<T, N> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
