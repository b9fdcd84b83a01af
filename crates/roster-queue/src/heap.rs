//! Array-backed binary min-heap.
//!
//! Slot `i` has children `2i + 1` and `2i + 2`; every parent compares less
//! than or equal to its children. Debug builds re-verify the whole array
//! after every rebuild and panic if it fails.

#[derive(Debug, Clone)]
pub(crate) struct MinHeap<T> {
    items: Vec<T>,
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Ord> MinHeap<T> {
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Unordered view of the backing array.
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let top = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    /// Drop every item failing `keep` and rebuild the heap. O(n).
    pub(crate) fn retain_collect(&mut self, mut keep: impl FnMut(&T) -> bool) -> Vec<T> {
        let (kept, removed): (Vec<T>, Vec<T>) =
            std::mem::take(&mut self.items).into_iter().partition(|item| keep(item));
        self.items = kept;
        self.heapify();
        removed
    }

    /// All items in ascending order.
    pub(crate) fn sorted(&self) -> Vec<&T> {
        let mut all: Vec<&T> = self.items.iter().collect();
        all.sort();
        all
    }

    fn heapify(&mut self) {
        for index in (0..self.items.len() / 2).rev() {
            self.sift_down(index);
        }
        self.debug_check();
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.items[index] >= self.items[parent] {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.items[left] < self.items[smallest] {
                smallest = left;
            }
            if right < len && self.items[right] < self.items[smallest] {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.items.swap(index, smallest);
            index = smallest;
        }
    }

    fn debug_check(&self) {
        if cfg!(debug_assertions) {
            self.assert_heap_order();
        }
    }

    pub(crate) fn assert_heap_order(&self) {
        for index in 1..self.items.len() {
            let parent = (index - 1) / 2;
            assert!(
                self.items[parent] <= self.items[index],
                "request heap corrupted: slot {parent} orders after its child {index}"
            );
        }
    }
}
