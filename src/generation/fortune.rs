//! Fortune's sweepline
//!
//! The sweep moves towards increasing y. Site events split the arc above the
//! new site; circle events squeeze an arc out of the beachline and emit a
//! Voronoi vertex. Half-edges are built as the events fire.

use glam::DVec2;
use tracing::{debug, trace};

use super::beachline::{ArcId, Beachline};
use super::circle;
use super::events::{CircleEvent, Event, EventQueue};
use super::EPSILON;
use crate::cell::{Site, SiteId};
use crate::dcel::{twin_of, VertexId};

/// Half-edge under construction
///
/// Pairs are allocated together: index `2k` and `2k + 1` are twins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OpenHalfEdge {
    pub left_site: SiteId,
    pub right_site: SiteId,
    pub start: Option<VertexId>,
    pub end: Option<VertexId>,
}

/// Incremental half-edge mesh fed by the sweep
#[derive(Debug)]
pub(crate) struct MeshBuilder {
    pub vertices: Vec<DVec2>,
    pub half_edges: Vec<OpenHalfEdge>,
    /// Per site id, half-edges with that site on their left, in the order
    /// they received their first vertex
    pub cells: Vec<Vec<usize>>,
    registered: Vec<bool>,
}

impl MeshBuilder {
    pub fn new(cell_count: usize) -> Self {
        Self {
            vertices: Vec::new(),
            half_edges: Vec::new(),
            cells: vec![Vec::new(); cell_count],
            registered: Vec::new(),
        }
    }

    pub fn add_vertex(&mut self, position: DVec2) -> VertexId {
        self.vertices.push(position);
        self.vertices.len() - 1
    }

    /// Allocate a twin pair; the returned half-edge has `left` on its left
    pub fn add_pair(&mut self, left: SiteId, right: SiteId) -> usize {
        let id = self.half_edges.len();
        self.half_edges.push(OpenHalfEdge {
            left_site: left,
            right_site: right,
            start: None,
            end: None,
        });
        self.half_edges.push(OpenHalfEdge {
            left_site: right,
            right_site: left,
            start: None,
            end: None,
        });
        self.registered.push(false);
        id
    }

    /// Start a traced half-edge at `vertex`
    pub fn open(&mut self, half_edge: usize, vertex: VertexId) {
        self.half_edges[half_edge].start = Some(vertex);
        self.half_edges[twin_of(half_edge)].end = Some(vertex);
        self.register(half_edge / 2);
    }

    /// End a traced half-edge at `vertex`
    pub fn close(&mut self, half_edge: usize, vertex: VertexId) {
        self.half_edges[half_edge].end = Some(vertex);
        self.half_edges[twin_of(half_edge)].start = Some(vertex);
        self.register(half_edge / 2);
    }

    /// Add both halves of a pair to the cells they bound, once
    pub fn register(&mut self, pair: usize) {
        if std::mem::replace(&mut self.registered[pair], true) {
            return;
        }
        for half_edge in [2 * pair, 2 * pair + 1] {
            let site = self.half_edges[half_edge].left_site;
            self.cells[site].push(half_edge);
        }
    }

    #[inline]
    pub fn pair_count(&self) -> usize {
        self.registered.len()
    }
}

/// Counters reported once a sweep finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SweepStats {
    pub site_events: usize,
    pub circle_events: usize,
    pub stale_events: usize,
}

/// State of one sweep
pub(crate) struct Sweep<'a> {
    sites: &'a [Site],
    queue: EventQueue,
    beachline: Beachline,
    mesh: MeshBuilder,
    sweep_y: f64,
    stats: SweepStats,
}

impl<'a> Sweep<'a> {
    /// Prepare a sweep over distinct, finite sites
    ///
    /// `cell_count` is one more than the largest site id.
    pub fn new(sites: &'a [Site], cell_count: usize, seed: u64) -> Self {
        let mut queue = EventQueue::new();
        for (index, site) in sites.iter().enumerate() {
            queue.insert(Event::Site {
                index,
                position: site.position(),
            });
        }

        Self {
            sites,
            queue,
            beachline: Beachline::new(seed),
            mesh: MeshBuilder::new(cell_count),
            sweep_y: f64::NEG_INFINITY,
            stats: SweepStats::default(),
        }
    }

    /// Process every event and hand back the unbounded mesh
    pub fn run(mut self) -> (MeshBuilder, SweepStats) {
        while let Some(event) = self.queue.extract_min() {
            match event {
                Event::Site { index, .. } => self.handle_site(index),
                Event::Circle(circle) => self.handle_circle(circle),
            }
        }

        debug!(
            sites = self.sites.len(),
            site_events = self.stats.site_events,
            circle_events = self.stats.circle_events,
            stale_events = self.stats.stale_events,
            vertices = self.mesh.vertices.len(),
            edges = self.mesh.pair_count(),
            "sweep finished"
        );
        (self.mesh, self.stats)
    }

    fn handle_site(&mut self, index: usize) {
        let site = self.sites[index];
        let position = site.position();
        self.sweep_y = position.y;
        self.stats.site_events += 1;
        trace!(site = site.id, x = position.x, y = position.y, "site event");

        if self.beachline.is_empty() {
            self.beachline.insert_first(site.id, position);
            return;
        }

        let Some(above) = self.beachline.find_arc_above(position.x, position.y) else {
            return;
        };

        // Foci sharing the sweep line: their bisector is vertical and the arc
        // above has no width to split
        let arc = self.beachline.arc(above);
        if (arc.focus.y - position.y).abs() < EPSILON {
            let free_side = if position.x > arc.focus.x {
                arc.next.is_none()
            } else {
                arc.prev.is_none()
            };
            if free_side {
                self.insert_beside(above, site);
                return;
            }
        }

        self.insert_site(above, site);
    }

    /// Split `above` into left copy, new arc, right copy
    ///
    /// Returns the new arc and the half-edges traced by its left and right
    /// breakpoints.
    fn insert_site(&mut self, above: ArcId, site: Site) -> (ArcId, usize, usize) {
        self.cancel_circle(above);

        let (old_site, old_focus, old_right_edge) = {
            let arc = self.beachline.arc(above);
            (arc.site, arc.focus, arc.right_edge)
        };

        let new_arc = self.beachline.insert_after(above, site.id, site.position());
        let right_copy = self.beachline.insert_after(new_arc, old_site, old_focus);

        let left_edge = self.mesh.add_pair(old_site, site.id);
        let right_edge = twin_of(left_edge);

        self.beachline.arc_mut(above).right_edge = Some(left_edge);
        {
            let arc = self.beachline.arc_mut(new_arc);
            arc.left_edge = Some(left_edge);
            arc.right_edge = Some(right_edge);
        }
        {
            let arc = self.beachline.arc_mut(right_copy);
            arc.left_edge = Some(right_edge);
            arc.right_edge = old_right_edge;
        }

        if let Some(prev) = self.beachline.arc(above).prev {
            self.schedule_circle(prev, above, new_arc);
        }
        if let Some(next) = self.beachline.arc(right_copy).next {
            self.schedule_circle(new_arc, right_copy, next);
        }

        (new_arc, left_edge, right_edge)
    }

    /// Place a new arc next to a degenerate arc on the sweep line
    fn insert_beside(&mut self, above: ArcId, site: Site) -> (ArcId, usize, usize) {
        self.cancel_circle(above);

        let above_site = self.beachline.arc(above).site;
        let (new_arc, left, right) = if site.x > self.beachline.arc(above).focus.x {
            let id = self.beachline.insert_after(above, site.id, site.position());
            (id, above, id)
        } else {
            let id = self.beachline.insert_before(above, site.id, site.position());
            (id, id, above)
        };

        let (left_site, right_site) = if left == above {
            (above_site, site.id)
        } else {
            (site.id, above_site)
        };
        let edge = self.mesh.add_pair(left_site, right_site);
        self.beachline.arc_mut(left).right_edge = Some(edge);
        self.beachline.arc_mut(right).left_edge = Some(edge);

        if let Some(prev) = self.beachline.arc(left).prev {
            self.schedule_circle(prev, left, right);
        }
        if let Some(next) = self.beachline.arc(right).next {
            self.schedule_circle(left, right, next);
        }

        (new_arc, edge, twin_of(edge))
    }

    fn handle_circle(&mut self, event: CircleEvent) {
        let arc = self.beachline.arc(event.arc);
        if !arc.alive || arc.generation != event.generation {
            self.stats.stale_events += 1;
            trace!(arc = event.arc, "stale circle event");
            return;
        }
        let (Some(prev), Some(next)) = (arc.prev, arc.next) else {
            self.stats.stale_events += 1;
            return;
        };
        let (left_edge, right_edge) = (arc.left_edge, arc.right_edge);

        self.sweep_y = event.y;
        self.stats.circle_events += 1;
        trace!(
            arc = event.arc,
            x = event.vertex.x,
            y = event.vertex.y,
            "circle event"
        );

        let vertex = self.mesh.add_vertex(event.vertex);
        for edge in [left_edge, right_edge].into_iter().flatten() {
            self.mesh.close(edge, vertex);
        }

        self.beachline.remove(event.arc);
        self.cancel_circle(prev);
        self.cancel_circle(next);

        let (prev_site, next_site) = (
            self.beachline.arc(prev).site,
            self.beachline.arc(next).site,
        );
        let edge = self.mesh.add_pair(prev_site, next_site);
        self.mesh.open(edge, vertex);
        self.beachline.arc_mut(prev).right_edge = Some(edge);
        self.beachline.arc_mut(next).left_edge = Some(edge);

        if let Some(before) = self.beachline.arc(prev).prev {
            self.schedule_circle(before, prev, next);
        }
        if let Some(after) = self.beachline.arc(next).next {
            self.schedule_circle(prev, next, after);
        }
    }

    /// Evaluate a triple and queue its event on the middle arc
    ///
    /// The middle arc must have no live event.
    fn schedule_circle(&mut self, left: ArcId, middle: ArcId, right: ArcId) {
        if let Some(event) = circle::evaluate(&self.beachline, left, middle, right, self.sweep_y) {
            self.beachline.arc_mut(middle).circle_event = Some(event);
            self.queue.insert(Event::Circle(event));
        }
    }

    fn cancel_circle(&mut self, arc: ArcId) {
        if let Some(event) = self.beachline.invalidate(arc) {
            self.queue.remove(&Event::Circle(event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep(points: &[(f64, f64)]) -> (MeshBuilder, SweepStats) {
        let sites = Site::from_points(points);
        Sweep::new(&sites, sites.len(), 1).run()
    }

    fn assert_twins(mesh: &MeshBuilder) {
        for (id, half_edge) in mesh.half_edges.iter().enumerate() {
            let twin = mesh.half_edges[twin_of(id)];
            assert_eq!(twin.left_site, half_edge.right_site);
            assert_eq!(twin.right_site, half_edge.left_site);
            assert_eq!(twin.start, half_edge.end);
            assert_eq!(twin.end, half_edge.start);
        }
    }

    #[test]
    fn test_empty_and_single() {
        let (mesh, stats) = sweep(&[]);
        assert!(mesh.vertices.is_empty());
        assert!(mesh.half_edges.is_empty());
        assert_eq!(stats, SweepStats::default());

        let (mesh, stats) = sweep(&[(3.0, 4.0)]);
        assert!(mesh.vertices.is_empty());
        assert!(mesh.half_edges.is_empty());
        assert_eq!(mesh.cells.len(), 1);
        assert_eq!(stats.site_events, 1);
    }

    #[test]
    fn test_triangle() {
        let (mesh, stats) = sweep(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]);
        assert_eq!(mesh.vertices.len(), 1);
        assert_eq!(stats.circle_events, 1);
        assert!((mesh.vertices[0] - DVec2::new(5.0, 3.75)).length() < 1e-9);
        assert_eq!(mesh.pair_count(), 3);
        assert_twins(&mesh);

        // Every pair touches the single vertex exactly once
        for pair in 0..mesh.pair_count() {
            let half_edge = mesh.half_edges[2 * pair];
            let touches = [half_edge.start, half_edge.end]
                .iter()
                .filter(|v| **v == Some(0))
                .count();
            assert_eq!(touches, 1);
        }
        for cell in &mesh.cells {
            assert_eq!(cell.len(), 2);
        }
    }

    #[test]
    fn test_horizontal_collinear() {
        let (mesh, stats) = sweep(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        assert!(mesh.vertices.is_empty());
        assert_eq!(stats.circle_events, 0);
        assert_eq!(mesh.pair_count(), 2);
        assert_eq!(mesh.half_edges[0].left_site, 0);
        assert_eq!(mesh.half_edges[0].right_site, 1);
        assert_eq!(mesh.half_edges[2].left_site, 1);
        assert_eq!(mesh.half_edges[2].right_site, 2);
    }

    #[test]
    fn test_vertical_collinear() {
        let (mesh, _) = sweep(&[(0.0, 0.0), (0.0, 5.0), (0.0, 10.0)]);
        assert!(mesh.vertices.is_empty());
        assert_eq!(mesh.pair_count(), 2);
        assert_twins(&mesh);
    }

    #[test]
    fn test_square_is_cocircular() {
        // Four cocircular sites meet in one point; two coincident vertices
        let (mesh, _) = sweep(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        assert!(!mesh.vertices.is_empty());
        for vertex in &mesh.vertices {
            assert!((*vertex - DVec2::new(5.0, 5.0)).length() < 1e-9);
        }
        assert_twins(&mesh);
    }

    #[test]
    fn test_vertices_are_circumcenters() {
        let points = [
            (1.0, 2.0),
            (7.5, 0.5),
            (4.0, 6.0),
            (9.0, 8.0),
            (2.5, 9.5),
            (6.0, 3.5),
        ];
        let (mesh, _) = sweep(&points);
        let sites = Site::from_points(&points);
        assert_twins(&mesh);

        // Each vertex is equidistant from at least three sites, and no site
        // is closer than those
        for vertex in &mesh.vertices {
            let mut distances: Vec<f64> = sites
                .iter()
                .map(|s| s.position().distance(*vertex))
                .collect();
            distances.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert!((distances[2] - distances[0]).abs() < 1e-6);
        }
    }
}
