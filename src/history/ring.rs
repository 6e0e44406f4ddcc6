//! # History Ring
//!
//! Fixed number of snapshot slots plus a head index.
//!
//! Walking forward from `head + 1` (mod capacity) visits the retained
//! snapshots oldest first; walking backward from `head` visits them newest
//! first. Slots that have not been written since the last reset hold an empty
//! snapshot.

use std::iter::FusedIterator;
use tracing::{debug, info};

use super::snapshot::Snapshot;

/// Default number of retained snapshots
pub const DEFAULT_HISTORY_DEPTH: usize = 3;

/// Circular snapshot history
#[derive(Debug, Clone)]
pub struct HistoryRing {
    slots: Vec<Snapshot>,
    head: usize,
    pushes: usize,
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl HistoryRing {
    /// Create a ring of `capacity` empty slots (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Snapshot::default(); capacity.max(1)],
            head: 0,
            pushes: 0,
        }
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots written since the last reset
    pub fn len(&self) -> usize {
        self.pushes.min(self.capacity())
    }

    /// Nothing pushed since the last reset
    pub fn is_empty(&self) -> bool {
        self.pushes == 0
    }

    /// Store `snapshot` as the new head
    ///
    /// Advances the head index and overwrites that slot; the snapshot that
    /// occupied it (the oldest one once the ring is full) is dropped.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.head = (self.head + 1) % self.capacity();
        self.slots[self.head] = snapshot;
        self.pushes = self.pushes.saturating_add(1);
    }

    /// Most recent snapshot; an empty snapshot before the first push
    pub fn head(&self) -> &Snapshot {
        &self.slots[self.head]
    }

    /// Snapshots from the head backwards: head, head-1, ... (`capacity` items)
    ///
    /// The iterator borrows the ring and can be recreated at any time.
    pub fn iter_from_head(&self) -> Iter<'_> {
        Iter {
            slots: &self.slots,
            head: self.head,
            front: 0,
            back: self.slots.len(),
        }
    }

    /// Snapshots oldest first, ending at the head (`capacity` items)
    pub fn iter_oldest_first(&self) -> std::iter::Rev<Iter<'_>> {
        self.iter_from_head().rev()
    }

    /// Replace every slot with an empty snapshot of the new depth
    ///
    /// All history is discarded and the head resets to slot 0. Depths below
    /// one are ignored.
    pub fn reconfigure(&mut self, capacity: usize) {
        if capacity < 1 {
            debug!("Ignoring history depth {} (must be at least 1)", capacity);
            return;
        }

        info!(
            "History depth set to {} (was {}), discarding {} snapshots",
            capacity,
            self.capacity(),
            self.len()
        );
        self.slots = vec![Snapshot::default(); capacity];
        self.head = 0;
        self.pushes = 0;
    }
}

/// Newest-first walk over a [`HistoryRing`]
///
/// Double-ended: `rev()` walks oldest first.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    slots: &'a [Snapshot],
    head: usize,
    front: usize,
    back: usize,
}

impl<'a> Iter<'a> {
    /// Slot holding the `age`-th newest snapshot
    fn slot(&self, age: usize) -> &'a Snapshot {
        let capacity = self.slots.len();
        &self.slots[(self.head + capacity - age) % capacity]
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Snapshot;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let snapshot = self.slot(self.front);
        self.front += 1;
        Some(snapshot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a> DoubleEndedIterator for Iter<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.slot(self.back))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
