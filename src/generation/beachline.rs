//! Beachline of parabolic arcs
//!
//! Arcs live in an arena and are never freed during a sweep: removing an arc
//! tombstones its slot and bumps its generation, so ids held by pending
//! events can never dangle. Arcs are doubly linked in left-to-right order and
//! also threaded through a treap (heap-ordered random priorities, parent
//! links) whose in-order sequence is the same left-to-right order. Searching
//! the treap by breakpoint gives expected O(log n) arc lookup.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::events::CircleEvent;
use super::EPSILON;
use crate::cell::SiteId;

/// Index of an arc in the beachline arena
pub(crate) type ArcId = usize;

/// One site's parabolic piece of the beachline
#[derive(Debug, Clone)]
pub(crate) struct ArcNode {
    pub site: SiteId,
    pub focus: DVec2,
    pub prev: Option<ArcId>,
    pub next: Option<ArcId>,
    /// Builder half-edge traced by the breakpoint with `prev`
    pub left_edge: Option<usize>,
    /// Builder half-edge traced by the breakpoint with `next`
    pub right_edge: Option<usize>,
    /// Pending event that would squeeze this arc out
    pub circle_event: Option<CircleEvent>,
    /// Bumped whenever the arc's neighbourhood changes or it is removed
    pub generation: u32,
    pub alive: bool,
    parent: Option<ArcId>,
    left: Option<ArcId>,
    right: Option<ArcId>,
    priority: u32,
}

/// X-coordinate where the parabolas of two adjacent arcs meet
///
/// `left` and `right` are the foci of the arcs on either side of the
/// breakpoint, `directrix` the current sweep position (not below either
/// focus).
pub(crate) fn breakpoint(left: DVec2, right: DVec2, directrix: f64) -> f64 {
    if (left.y - right.y).abs() < EPSILON {
        return (left.x + right.x) * 0.5;
    }
    if (left.y - directrix).abs() < EPSILON {
        return left.x;
    }
    if (right.y - directrix).abs() < EPSILON {
        return right.x;
    }

    // y = ((x - fx)^2 + fy^2 - d^2) / (2 (fy - d)) for each focus; equate
    let dl = 2.0 * (left.y - directrix);
    let dr = 2.0 * (right.y - directrix);
    let a = dr - dl;
    let b = -2.0 * dr * left.x + 2.0 * dl * right.x;
    let c = dr * (left.x * left.x + left.y * left.y - directrix * directrix)
        - dl * (right.x * right.x + right.y * right.y - directrix * directrix);

    let discriminant = (b * b - 4.0 * a * c).max(0.0);
    // Smaller root when the left focus is further from the sweep, larger
    // root otherwise; the sign of `a` makes this one expression.
    (-b - discriminant.sqrt()) / (2.0 * a)
}

/// The ordered sequence of arcs on the sweep front
#[derive(Debug)]
pub(crate) struct Beachline {
    arcs: Vec<ArcNode>,
    root: Option<ArcId>,
    rng: ChaCha8Rng,
}

impl Beachline {
    pub fn new(seed: u64) -> Self {
        Self {
            arcs: Vec::new(),
            root: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[inline]
    pub fn arc(&self, id: ArcId) -> &ArcNode {
        &self.arcs[id]
    }

    #[inline]
    pub fn arc_mut(&mut self, id: ArcId) -> &mut ArcNode {
        &mut self.arcs[id]
    }

    fn alloc(&mut self, site: SiteId, focus: DVec2) -> ArcId {
        let id = self.arcs.len();
        let priority = self.rng.gen::<u32>();
        self.arcs.push(ArcNode {
            site,
            focus,
            prev: None,
            next: None,
            left_edge: None,
            right_edge: None,
            circle_event: None,
            generation: 0,
            alive: true,
            parent: None,
            left: None,
            right: None,
            priority,
        });
        id
    }

    /// Start the beachline with its first arc
    pub fn insert_first(&mut self, site: SiteId, focus: DVec2) -> ArcId {
        debug_assert!(self.root.is_none());
        let id = self.alloc(site, focus);
        self.root = Some(id);
        id
    }

    /// Insert a new arc immediately to the right of `anchor`
    pub fn insert_after(&mut self, anchor: ArcId, site: SiteId, focus: DVec2) -> ArcId {
        let id = self.alloc(site, focus);

        let next = self.arcs[anchor].next;
        self.arcs[id].prev = Some(anchor);
        self.arcs[id].next = next;
        self.arcs[anchor].next = Some(id);
        if let Some(next) = next {
            self.arcs[next].prev = Some(id);
        }

        match self.arcs[anchor].right {
            None => {
                self.arcs[anchor].right = Some(id);
                self.arcs[id].parent = Some(anchor);
            }
            Some(mut node) => {
                while let Some(left) = self.arcs[node].left {
                    node = left;
                }
                self.arcs[node].left = Some(id);
                self.arcs[id].parent = Some(node);
            }
        }

        self.sift_up(id);
        id
    }

    /// Insert a new arc immediately to the left of `anchor`
    pub fn insert_before(&mut self, anchor: ArcId, site: SiteId, focus: DVec2) -> ArcId {
        let id = self.alloc(site, focus);

        let prev = self.arcs[anchor].prev;
        self.arcs[id].next = Some(anchor);
        self.arcs[id].prev = prev;
        self.arcs[anchor].prev = Some(id);
        if let Some(prev) = prev {
            self.arcs[prev].next = Some(id);
        }

        match self.arcs[anchor].left {
            None => {
                self.arcs[anchor].left = Some(id);
                self.arcs[id].parent = Some(anchor);
            }
            Some(mut node) => {
                while let Some(right) = self.arcs[node].right {
                    node = right;
                }
                self.arcs[node].right = Some(id);
                self.arcs[id].parent = Some(node);
            }
        }

        self.sift_up(id);
        id
    }

    /// Unlink an arc, relinking its neighbours to each other
    ///
    /// The slot stays in the arena as a tombstone with a bumped generation.
    pub fn remove(&mut self, id: ArcId) {
        // Rotate the node down until it has at most one child
        loop {
            let child = match (self.arcs[id].left, self.arcs[id].right) {
                (Some(l), Some(r)) => {
                    if self.arcs[l].priority < self.arcs[r].priority {
                        l
                    } else {
                        r
                    }
                }
                _ => break,
            };
            self.rotate_up(child);
        }

        let child = self.arcs[id].left.or(self.arcs[id].right);
        let parent = self.arcs[id].parent;
        if let Some(child) = child {
            self.arcs[child].parent = parent;
        }
        self.replace_child(parent, id, child);

        let (prev, next) = (self.arcs[id].prev, self.arcs[id].next);
        if let Some(prev) = prev {
            self.arcs[prev].next = next;
        }
        if let Some(next) = next {
            self.arcs[next].prev = prev;
        }

        let arc = &mut self.arcs[id];
        arc.alive = false;
        arc.generation = arc.generation.wrapping_add(1);
        arc.circle_event = None;
        arc.prev = None;
        arc.next = None;
        arc.parent = None;
        arc.left = None;
        arc.right = None;
    }

    /// Drop the arc's pending circle event, returning it for removal from the
    /// queue, and bump the generation so any copy still queued is stale
    pub fn invalidate(&mut self, id: ArcId) -> Option<CircleEvent> {
        let arc = &mut self.arcs[id];
        arc.generation = arc.generation.wrapping_add(1);
        arc.circle_event.take()
    }

    /// Arc whose parabola lies over `x` when the sweep is at `directrix`
    ///
    /// On an exact breakpoint either neighbour may be returned. `None` only
    /// when the beachline is empty.
    pub fn find_arc_above(&self, x: f64, directrix: f64) -> Option<ArcId> {
        let mut node = self.root?;
        loop {
            let arc = &self.arcs[node];

            if let Some(prev) = arc.prev {
                if x < breakpoint(self.arcs[prev].focus, arc.focus, directrix) {
                    match arc.left {
                        Some(left) => {
                            node = left;
                            continue;
                        }
                        None => return Some(node),
                    }
                }
            }

            if let Some(next) = arc.next {
                if x > breakpoint(arc.focus, self.arcs[next].focus, directrix) {
                    match arc.right {
                        Some(right) => {
                            node = right;
                            continue;
                        }
                        None => return Some(node),
                    }
                }
            }

            return Some(node);
        }
    }

    /// Live arcs from left to right
    pub fn iter(&self) -> impl Iterator<Item = ArcId> + '_ {
        let mut first = self.root;
        while let Some(left) = first.and_then(|node| self.arcs[node].left) {
            first = Some(left);
        }
        std::iter::successors(first, move |&id| self.arcs[id].next)
    }

    fn sift_up(&mut self, id: ArcId) {
        while let Some(parent) = self.arcs[id].parent {
            if self.arcs[parent].priority <= self.arcs[id].priority {
                break;
            }
            self.rotate_up(id);
        }
    }

    /// Rotate `id` above its parent, preserving in-order sequence
    fn rotate_up(&mut self, id: ArcId) {
        let Some(parent) = self.arcs[id].parent else {
            return;
        };
        let grandparent = self.arcs[parent].parent;

        if self.arcs[parent].left == Some(id) {
            let inner = self.arcs[id].right;
            self.arcs[parent].left = inner;
            if let Some(inner) = inner {
                self.arcs[inner].parent = Some(parent);
            }
            self.arcs[id].right = Some(parent);
        } else {
            let inner = self.arcs[id].left;
            self.arcs[parent].right = inner;
            if let Some(inner) = inner {
                self.arcs[inner].parent = Some(parent);
            }
            self.arcs[id].left = Some(parent);
        }

        self.arcs[parent].parent = Some(id);
        self.arcs[id].parent = grandparent;
        self.replace_child(grandparent, parent, Some(id));
    }

    fn replace_child(&mut self, parent: Option<ArcId>, old: ArcId, new: Option<ArcId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                if self.arcs[parent].left == Some(old) {
                    self.arcs[parent].left = new;
                } else {
                    self.arcs[parent].right = new;
                }
            }
        }
    }

    #[cfg(test)]
    fn height(&self) -> usize {
        fn walk(arcs: &[ArcNode], node: Option<ArcId>) -> usize {
            match node {
                None => 0,
                Some(id) => 1 + walk(arcs, arcs[id].left).max(walk(arcs, arcs[id].right)),
            }
        }
        walk(&self.arcs, self.root)
    }

    #[cfg(test)]
    fn in_order(&self) -> Vec<ArcId> {
        fn walk(arcs: &[ArcNode], node: Option<ArcId>, out: &mut Vec<ArcId>) {
            if let Some(id) = node {
                walk(arcs, arcs[id].left, out);
                out.push(id);
                walk(arcs, arcs[id].right, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.arcs, self.root, &mut out);
        out
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        let listed: Vec<ArcId> = self.iter().collect();
        assert_eq!(listed, self.in_order(), "list and tree order diverge");
        for &id in &listed {
            let arc = &self.arcs[id];
            assert!(arc.alive);
            for child in [arc.left, arc.right].into_iter().flatten() {
                assert_eq!(self.arcs[child].parent, Some(id));
                assert!(self.arcs[child].priority >= arc.priority, "heap order broken");
            }
            if let Some(next) = arc.next {
                assert_eq!(self.arcs[next].prev, Some(id));
            }
        }
    }
}
