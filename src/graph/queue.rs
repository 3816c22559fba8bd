//! Frontier containers used by the graph searches.

use std::collections::VecDeque;

/// First-in, first-out queue.
#[derive(Debug, Clone)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> Queue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Removes the oldest item, or `None` if the queue is empty.
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// The oldest item, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }
}

/// Last-in, first-out stack.
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Stack<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }
}

/// An item stored in a [`MinHeap`] with its priority.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeapEntry<T> {
    pub item: T,
    pub priority: f64,
}

/// Binary min-heap keyed by `f64` priority.
///
/// Unlike [`std::collections::BinaryHeap`] this supports
/// [`decrease_priority_or_insert`](Self::decrease_priority_or_insert), locating
/// the existing entry by a linear scan. Ties keep whatever order the sift
/// operations leave them in, which is deterministic for a fixed insertion order.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    entries: Vec<HeapEntry<T>>,
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: PartialEq> MinHeap<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The minimum-priority entry, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&HeapEntry<T>> {
        self.entries.first()
    }

    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.position_of(item).is_some()
    }

    pub fn insert(&mut self, item: T, priority: f64) {
        self.entries.push(HeapEntry { item, priority });
        self.sift_up(self.entries.len() - 1);
    }

    /// Removes and returns the minimum-priority entry.
    pub fn extract_min(&mut self) -> Option<HeapEntry<T>> {
        if self.entries.is_empty() {
            return None;
        }
        let root = self.entries.swap_remove(0);
        self.sift_down(0);
        Some(root)
    }

    /// Lowers the priority of `item` if present, otherwise inserts it.
    ///
    /// The new priority replaces the old one unconditionally; callers only use
    /// this after finding a strictly better tentative distance.
    pub fn decrease_priority_or_insert(&mut self, item: T, priority: f64) {
        match self.position_of(&item) {
            Some(index) => {
                self.entries[index].priority = priority;
                self.sift_up(index);
            }
            None => self.insert(item, priority),
        }
    }

    fn position_of(&self, item: &T) -> Option<usize> {
        self.entries.iter().position(|entry| entry.item == *item)
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.entries[index].priority < self.entries[parent].priority {
                self.entries.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = index * 2 + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.entries[left].priority < self.entries[smallest].priority {
                smallest = left;
            }
            if right < len && self.entries[right].priority < self.entries[smallest].priority {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.entries.swap(index, smallest);
            index = smallest;
        }
    }
}
