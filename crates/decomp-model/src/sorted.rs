//! A [`Seq`] that keeps itself ordered under a comparison rule.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

use crate::observable::{Observable, ObservableCollection, PropertyChanged, Subscription};
use crate::seq::{ChangeAction, Seq};
use crate::session::Session;

/// Comparison rule of a [`SortedSeq`].
pub type Order<T> = fn(&T, &T) -> Ordering;

/// Ordered container whose elements are always non-decreasing under its
/// comparison rule.
///
/// Positional insertion is not offered: [`SortedSeq::add`] places an element
/// immediately before the first element comparing greater, and
/// [`SortedSeq::modify`] re-homes an element whose sort key changed.
pub struct SortedSeq<T> {
    seq: Seq<T>,
    order: Order<T>,
}

impl<T: Observable + 'static> SortedSeq<T> {
    pub fn new(order: Order<T>) -> Self {
        Self {
            seq: Seq::new(),
            order,
        }
    }

    pub fn from_iter_with(order: Order<T>, items: impl IntoIterator<Item = T>) -> Self {
        let mut sorted = Self::new(order);
        for item in items {
            sorted.add(item);
        }
        sorted
    }

    /// Insert `item` in order and return the index it landed at.
    pub fn add(&mut self, item: T) -> usize {
        let index = self
            .seq
            .position(|existing| (self.order)(existing, &item) == Ordering::Greater)
            .unwrap_or(self.seq.len());
        self.seq.insert(index, item);
        index
    }

    /// Positional insertion is redefined as [`SortedSeq::add`]; the index is
    /// ignored.
    pub fn insert(&mut self, _index: usize, item: T) -> usize {
        self.add(item)
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> T {
        self.seq.remove_at(index)
    }

    pub fn clear(&mut self) {
        self.seq.clear();
    }

    /// Mutate the element at `index` in place, then move it if it now
    /// violates the order against either neighbour. Returns the element's
    /// index after the call, or `None` if `index` is out of bounds.
    pub fn modify<R>(&mut self, index: usize, f: impl FnOnce(&mut T) -> R) -> Option<(usize, R)> {
        let result = f(self.seq.get_mut(index)?);
        if self.in_place(index) {
            return Some((index, result));
        }
        let item = self.seq.remove_at(index);
        Some((self.add(item), result))
    }

    fn in_place(&self, index: usize) -> bool {
        let item = &self.seq[index];
        let after_previous = index == 0
            || (self.order)(item, &self.seq[index - 1]) != Ordering::Less;
        let before_next = index + 1 >= self.seq.len()
            || (self.order)(item, &self.seq[index + 1]) != Ordering::Greater;
        after_previous && before_next
    }
}

impl<T> SortedSeq<T> {
    pub fn is_sorted(&self) -> bool {
        self.seq
            .as_slice()
            .windows(2)
            .all(|pair| (self.order)(&pair[0], &pair[1]) != Ordering::Greater)
    }
}

impl<T> Deref for SortedSeq<T> {
    type Target = Seq<T>;

    fn deref(&self) -> &Seq<T> {
        &self.seq
    }
}

impl<'a, T> IntoIterator for &'a SortedSeq<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.seq.iter()
    }
}

impl<T: PartialEq> PartialEq for SortedSeq<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<T: fmt::Debug> fmt::Debug for SortedSeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.seq.fmt(f)
    }
}

impl<T: Observable + 'static> ObservableCollection for SortedSeq<T> {
    fn watch_structure(&self, handler: impl Fn(ChangeAction) + 'static) -> Subscription {
        self.seq.watch_structure(handler)
    }

    fn watch_items(&self, handler: impl Fn(&PropertyChanged) + 'static) -> Subscription {
        self.seq.watch_items(handler)
    }

    fn attach_session(&self, session: &Session) {
        self.seq.attach(session);
    }
}

/// Order two optional keys, placing a missing key after every present one.
pub fn nulls_last<K: Ord>(a: Option<K>, b: Option<K>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
