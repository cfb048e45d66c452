//! Ray extension and clipping of a finished sweep
//!
//! Half-edges the sweep left open are unbounded. Each is turned into a long
//! segment along its bisector, then every edge is clipped to the bounds with
//! Cohen–Sutherland. Edges falling outside are dropped and the surviving
//! half-edges are renumbered into twin pairs.

use glam::DVec2;
use tracing::debug;

use super::fortune::MeshBuilder;
use super::EPSILON;
use crate::cell::{Site, VoronoiCell};
use crate::config::{BoundingBox, DiagramConfig};
use crate::dcel::{Edge, HalfEdge};

const OUTCODE_LEFT: u8 = 1;
const OUTCODE_RIGHT: u8 = 2;
const OUTCODE_BOTTOM: u8 = 4;
const OUTCODE_TOP: u8 = 8;

/// Each endpoint moves at most once per rectangle side
const MAX_CLIP_STEPS: usize = 8;

/// Clipped mesh ready to be wrapped in a diagram
#[derive(Debug, Default)]
pub(crate) struct FinishedMesh {
    pub vertices: Vec<DVec2>,
    pub half_edges: Vec<HalfEdge>,
    pub edges: Vec<Edge>,
    pub cells: Vec<VoronoiCell>,
}

fn compute_outcode(p: DVec2, bounds: &BoundingBox) -> u8 {
    let mut code = 0;
    if p.x < bounds.min_x {
        code |= OUTCODE_LEFT;
    } else if p.x > bounds.max_x {
        code |= OUTCODE_RIGHT;
    }
    if p.y < bounds.min_y {
        code |= OUTCODE_BOTTOM;
    } else if p.y > bounds.max_y {
        code |= OUTCODE_TOP;
    }
    code
}

/// Clip segment `p1`-`p2` to `bounds`
///
/// Returns `None` when no part of the segment lies inside. An out-coded
/// endpoint always differs from the other endpoint along the axis it is
/// clipped on, so the divisions below never see a zero denominator.
pub(crate) fn clip_segment(
    mut p1: DVec2,
    mut p2: DVec2,
    bounds: &BoundingBox,
) -> Option<(DVec2, DVec2)> {
    let mut outcode1 = compute_outcode(p1, bounds);
    let mut outcode2 = compute_outcode(p2, bounds);

    for _ in 0..MAX_CLIP_STEPS {
        if (outcode1 | outcode2) == 0 {
            let min = DVec2::new(bounds.min_x, bounds.min_y);
            let max = DVec2::new(bounds.max_x, bounds.max_y);
            return Some((p1.clamp(min, max), p2.clamp(min, max)));
        }
        if (outcode1 & outcode2) != 0 {
            return None;
        }

        let outcode_out = if outcode1 != 0 { outcode1 } else { outcode2 };
        let d = p2 - p1;
        let intersection = if (outcode_out & OUTCODE_TOP) != 0 {
            DVec2::new(p1.x + d.x * (bounds.max_y - p1.y) / d.y, bounds.max_y)
        } else if (outcode_out & OUTCODE_BOTTOM) != 0 {
            DVec2::new(p1.x + d.x * (bounds.min_y - p1.y) / d.y, bounds.min_y)
        } else if (outcode_out & OUTCODE_RIGHT) != 0 {
            DVec2::new(bounds.max_x, p1.y + d.y * (bounds.max_x - p1.x) / d.x)
        } else {
            DVec2::new(bounds.min_x, p1.y + d.y * (bounds.min_x - p1.x) / d.x)
        };

        if outcode_out == outcode1 {
            p1 = intersection;
            outcode1 = compute_outcode(p1, bounds);
        } else {
            p2 = intersection;
            outcode2 = compute_outcode(p2, bounds);
        }
    }

    None
}

/// Direction a half-edge with these sites runs in: the left site is on the
/// left-hand side
#[inline]
fn bisector_direction(left: DVec2, right: DVec2) -> DVec2 {
    (right - left).perp().normalize_or_zero()
}

/// Extend open rays, clip to `bounds`, and rebuild the half-edge mesh
///
/// `sites` is the full input, indexed by site id.
pub(crate) fn finalize(
    mesh: MeshBuilder,
    sites: &[Site],
    bounds: &BoundingBox,
    config: &DiagramConfig,
) -> FinishedMesh {
    let base_extent = config.resolve_ray_extent(bounds);
    let pair_count = mesh.pair_count();

    // Output edge for each builder pair, if it survives clipping
    let mut kept: Vec<Option<usize>> = vec![None; pair_count];
    let mut edges = Vec::new();
    let mut half_edges = Vec::new();

    for (pair, slot) in kept.iter_mut().enumerate() {
        let half_edge = mesh.half_edges[2 * pair];
        let left = sites[half_edge.left_site].position();
        let right = sites[half_edge.right_site].position();
        let direction = bisector_direction(left, right);

        let start_vertex = half_edge.start.map(|v| mesh.vertices[v]);
        let end_vertex = half_edge.end.map(|v| mesh.vertices[v]);
        let anchor = start_vertex
            .or(end_vertex)
            .unwrap_or((left + right) * 0.5);
        let extent = match config.ray_extent {
            Some(_) => base_extent,
            None => base_extent + anchor.distance(bounds.center()),
        };

        let start = start_vertex.unwrap_or(anchor - direction * extent);
        let end = end_vertex.unwrap_or(anchor + direction * extent);

        let Some((clipped_start, clipped_end)) = clip_segment(start, end, bounds) else {
            continue;
        };
        if clipped_start.distance(clipped_end) <= EPSILON {
            continue;
        }

        let edge_id = edges.len();
        let id = half_edges.len();
        let start_id = half_edge.start.filter(|_| clipped_start == start);
        let end_id = half_edge.end.filter(|_| clipped_end == end);

        half_edges.push(HalfEdge {
            left_site: half_edge.left_site,
            right_site: half_edge.right_site,
            start_vertex: start_id,
            end_vertex: end_id,
            twin: id + 1,
            edge: edge_id,
        });
        half_edges.push(HalfEdge {
            left_site: half_edge.right_site,
            right_site: half_edge.left_site,
            start_vertex: end_id,
            end_vertex: start_id,
            twin: id,
            edge: edge_id,
        });
        edges.push(Edge {
            start: clipped_start,
            end: clipped_end,
            start_vertex: start_id,
            end_vertex: end_id,
            left_site: half_edge.left_site,
            right_site: half_edge.right_site,
            half_edge: id,
        });
        *slot = Some(edge_id);
    }

    // Cells keep the order the sweep finalized their half-edges in; pairs
    // that never met a vertex go last
    let mut cells: Vec<VoronoiCell> = sites.iter().map(|site| VoronoiCell::new(*site)).collect();
    let mut placed = vec![false; pair_count];
    for (site, builder_half_edges) in mesh.cells.iter().enumerate() {
        for &builder_id in builder_half_edges {
            placed[builder_id / 2] = true;
            if let Some(edge) = kept[builder_id / 2] {
                cells[site].half_edges.push(2 * edge + builder_id % 2);
            }
        }
    }
    for pair in (0..pair_count).filter(|&pair| !placed[pair]) {
        if let Some(edge) = kept[pair] {
            let half_edge = &half_edges[2 * edge];
            cells[half_edge.left_site].half_edges.push(2 * edge);
            cells[half_edge.right_site].half_edges.push(2 * edge + 1);
        }
    }

    debug!(
        edges = edges.len(),
        discarded = pair_count - edges.len(),
        "clipped diagram to bounds"
    );

    FinishedMesh {
        vertices: mesh.vertices,
        half_edges,
        edges,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(0.0, 10.0, 0.0, 10.0).unwrap()
    }

    #[test]
    fn test_clip_inside_untouched() {
        let a = DVec2::new(1.0, 2.0);
        let b = DVec2::new(8.0, 9.0);
        assert_eq!(clip_segment(a, b, &unit_box()), Some((a, b)));
    }

    #[test]
    fn test_clip_same_region_rejected() {
        let result = clip_segment(DVec2::new(-5.0, 1.0), DVec2::new(-1.0, 9.0), &unit_box());
        assert!(result.is_none());
        let result = clip_segment(DVec2::new(1.0, 11.0), DVec2::new(9.0, 20.0), &unit_box());
        assert!(result.is_none());
    }

    #[test]
    fn test_clip_crossing_segment() {
        let (a, b) =
            clip_segment(DVec2::new(-5.0, 5.0), DVec2::new(15.0, 5.0), &unit_box()).unwrap();
        assert_eq!(a, DVec2::new(0.0, 5.0));
        assert_eq!(b, DVec2::new(10.0, 5.0));

        let (a, b) =
            clip_segment(DVec2::new(5.0, -100.0), DVec2::new(5.0, 3.0), &unit_box()).unwrap();
        assert_eq!(a, DVec2::new(5.0, 0.0));
        assert_eq!(b, DVec2::new(5.0, 3.0));
    }

    #[test]
    fn test_clip_diagonal_through_corner_regions() {
        let (a, b) =
            clip_segment(DVec2::new(-5.0, -5.0), DVec2::new(15.0, 15.0), &unit_box()).unwrap();
        assert!((a - DVec2::new(0.0, 0.0)).length() < 1e-12);
        assert!((b - DVec2::new(10.0, 10.0)).length() < 1e-12);
    }

    #[test]
    fn test_clip_misses_corner() {
        // Both ends out on different sides but the line passes the corner
        let result = clip_segment(DVec2::new(-2.0, 9.0), DVec2::new(3.0, 14.0), &unit_box());
        assert!(result.is_none());
    }

    #[test]
    fn test_bisector_direction_keeps_left_site_left() {
        let left = DVec2::new(0.0, 0.0);
        let right = DVec2::new(10.0, 0.0);
        let direction = bisector_direction(left, right);
        assert_eq!(direction, DVec2::new(0.0, 1.0));
        // Left site lies on the left of the direction of travel
        assert!(direction.perp_dot(left - DVec2::new(5.0, 0.0)) > 0.0);
    }
}
