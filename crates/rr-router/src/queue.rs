//! Priority queue of path states.
//!
//! A 1-indexed binary min-heap of [`ResultId`]s ordered by `sortby`.  Slot 0
//! is unused so the parent/child arithmetic is branch-free (`parent = i / 2`,
//! `children = 2i, 2i + 1`).  Every queued state stores its heap slot in
//! `queued`, which makes decrease-key an in-place sift-up instead of a
//! re-insertion — the heap never holds stale duplicates.

use rr_core::ResultId;

use crate::results::{NOT_QUEUED, Results};

/// Min-heap over `sortby` with back-indexed decrease-key.
pub struct Queue {
    /// `data[0]` is a sentinel; live entries start at slot 1.
    data: Vec<ResultId>,
}

impl Queue {
    pub fn new() -> Queue {
        Queue { data: vec![ResultId::INVALID] }
    }

    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    }

    /// Insert `id`, or restore heap order after its `sortby` decreased.
    ///
    /// The caller must only have decreased (or kept equal) the key since the
    /// state was queued; an increased key would need a sift-down this
    /// operation does not perform.
    pub fn insert(&mut self, results: &mut Results, id: ResultId) {
        let mut index = results[id].queued as usize;

        if index == NOT_QUEUED as usize {
            self.data.push(id);
            index = self.data.len() - 1;
            results[id].queued = index as u32;
        }

        // Bubble up.
        while index > 1 {
            let parent = index / 2;
            if results[self.data[index]].sortby < results[self.data[parent]].sortby {
                self.data.swap(index, parent);
                results[self.data[index]].queued = index as u32;
                results[self.data[parent]].queued = parent as u32;
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Remove and return the state with the lowest `sortby`.
    pub fn pop(&mut self, results: &mut Results) -> Option<ResultId> {
        if self.is_empty() {
            return None;
        }

        let top = self.data[1];
        results[top].queued = NOT_QUEUED;

        let last = self.data.pop()?;
        if self.data.len() > 1 {
            self.data[1] = last;
            results[last].queued = 1;

            // Bubble down the newly promoted value.
            let mut index = 1;
            loop {
                let mut smallest = index;
                for child in [2 * index, 2 * index + 1] {
                    if child < self.data.len()
                        && results[self.data[child]].sortby < results[self.data[smallest]].sortby
                    {
                        smallest = child;
                    }
                }
                if smallest == index {
                    break;
                }
                self.data.swap(index, smallest);
                results[self.data[index]].queued = index as u32;
                results[self.data[smallest]].queued = smallest as u32;
                index = smallest;
            }
        }

        Some(top)
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}
