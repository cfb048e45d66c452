//! Event queue driving the sweep
//!
//! Events are ordered by `(y, x)` ascending. Remaining ties are broken by
//! insertion order, so a run never depends on heap internals.

use glam::DVec2;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::beachline::ArcId;

/// Three arcs converging to a Voronoi vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CircleEvent {
    /// Middle arc, the one squeezed out when the event fires
    pub arc: ArcId,
    /// Generation of `arc` when the event was scheduled
    pub generation: u32,
    /// Circumcenter of the three sites
    pub vertex: DVec2,
    /// Sweep position at which the event fires
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Event {
    /// A site reaches the sweep line; `index` points into the swept sites
    Site { index: usize, position: DVec2 },
    Circle(CircleEvent),
}

impl Event {
    #[inline]
    pub fn y(&self) -> f64 {
        match self {
            Event::Site { position, .. } => position.y,
            Event::Circle(circle) => circle.y,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        match self {
            Event::Site { position, .. } => position.x,
            Event::Circle(circle) => circle.vertex.x,
        }
    }
}

#[derive(Debug)]
struct Queued {
    event: Event,
    seq: u64,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    // Reversed so the max-heap pops the smallest (y, x) first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .event
            .y()
            .total_cmp(&self.event.y())
            .then_with(|| other.event.x().total_cmp(&self.event.x()))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue of pending site and circle events
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    heap: BinaryHeap<Queued>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Queued { event, seq });
    }

    pub fn extract_min(&mut self) -> Option<Event> {
        self.heap.pop().map(|queued| queued.event)
    }

    #[allow(dead_code)]
    pub fn peek(&self) -> Option<&Event> {
        self.heap.peek().map(|queued| &queued.event)
    }

    /// Remove a previously inserted event wherever it sits in the heap
    ///
    /// Linear scan followed by a rebuild, O(n). Returns `false` if the event
    /// was not queued.
    pub fn remove(&mut self, event: &Event) -> bool {
        let before = self.heap.len();
        self.heap.retain(|queued| queued.event != *event);
        self.heap.len() != before
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
