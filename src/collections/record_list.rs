//! Insertion-ordered record list.
//!
//! `RecordList` is a singly linked list whose nodes live in an index-addressed
//! arena. Appends go through a tail index, every lookup is a linear scan from
//! the head that stops at the first element accepted by the caller's
//! predicate. Matching is never defined by the list itself.
//!
//! ```
//! use sapiens_server::collections::RecordList;
//!
//! let mut list = RecordList::new();
//! list.push("A");
//! list.push("B");
//! list.push("C");
//!
//! assert_eq!(list.find(|x| *x == "B"), Some(&"B"));
//! assert_eq!(list.remove(|x| *x == "B"), Some("B"));
//! assert_eq!(list.to_vec(), vec!["A", "C"]);
//! ```

use std::fmt;

/// A set of field changes that can be applied to a record of type `T`.
///
/// Changesets are closed types: the settable fields are known at compile time,
/// so there is no way to name a field the record does not have.
pub trait Changeset<T> {
    fn apply_to(self, target: &mut T);
}

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    next: Option<usize>,
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied(Node<T>),
    Vacant,
}

/// Ordered container of opaque records.
#[derive(Clone)]
pub struct RecordList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> RecordList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `value` at the tail.
    pub fn push(&mut self, value: T) {
        let node = Node { value, next: None };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Slot::Occupied(node);
                idx
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
    }

    /// Removes the first element (from the head) accepted by `predicate`.
    ///
    /// Returns the removed element, or `None` when nothing matched. At most one
    /// element is removed per call.
    pub fn remove<P>(&mut self, mut predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        let mut prev: Option<usize> = None;
        let mut cursor = self.head;

        while let Some(idx) = cursor {
            let node = self.node(idx);
            let next = node.next;

            if predicate(&node.value) {
                match prev {
                    Some(p) => self.node_mut(p).next = next,
                    None => self.head = next,
                }
                if self.tail == Some(idx) {
                    self.tail = prev;
                }

                let slot = std::mem::replace(&mut self.slots[idx], Slot::Vacant);
                self.free.push(idx);
                self.len -= 1;

                return match slot {
                    Slot::Occupied(node) => Some(node.value),
                    Slot::Vacant => None,
                };
            }

            prev = Some(idx);
            cursor = next;
        }

        None
    }

    /// Returns the first element accepted by `predicate`.
    pub fn find<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().find(|value| predicate(*value))
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut<P>(&mut self, mut predicate: P) -> Option<&mut T>
    where
        P: FnMut(&T) -> bool,
    {
        let idx = self.position(&mut predicate)?;
        Some(&mut self.node_mut(idx).value)
    }

    /// Applies `changes` to the first element accepted by `predicate`.
    ///
    /// Returns `false` and leaves every element untouched when nothing matched.
    pub fn update<P, C>(&mut self, predicate: P, changes: C) -> bool
    where
        P: FnMut(&T) -> bool,
        C: Changeset<T>,
    {
        match self.find_mut(predicate) {
            Some(target) => {
                changes.apply_to(target);
                true
            }
            None => false,
        }
    }

    /// Iterates from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Owned snapshot of every element in insertion order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    fn position<P>(&self, predicate: &mut P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.node(idx);
            if predicate(&node.value) {
                return Some(idx);
            }
            cursor = node.next;
        }
        None
    }

    // Linked indices always point at occupied slots.
    fn node(&self, idx: usize) -> &Node<T> {
        match &self.slots[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant => unreachable!("linked index {idx} points at a vacant slot"),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<T> {
        match &mut self.slots[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant => unreachable!("linked index {idx} points at a vacant slot"),
        }
    }
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for RecordList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for RecordList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl<T> Extend<T> for RecordList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for RecordList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a RecordList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing head-to-tail iterator over a [`RecordList`].
pub struct Iter<'a, T> {
    list: &'a RecordList<T>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.node(idx);
        self.cursor = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
