//! Half-edge mesh of a finished diagram
//!
//! Edges are stored once; each edge owns a pair of half-edges at indices
//! `2k` and `2k + 1` that are each other's twin.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::SiteId;

/// Index into the diagram's vertex list
pub type VertexId = usize;

/// Index into the diagram's half-edge list
pub type HalfEdgeId = usize;

/// Index into the diagram's edge list
pub type EdgeId = usize;

/// Directed boundary between two cells
///
/// `left_site` lies on the left when walking from `start` to `end`. The twin
/// runs the other way with the sites swapped.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfEdge {
    pub left_site: SiteId,
    pub right_site: SiteId,
    /// Voronoi vertex at the start, `None` if the start was clipped or unbounded
    pub start_vertex: Option<VertexId>,
    /// Voronoi vertex at the end, `None` if the end was clipped or unbounded
    pub end_vertex: Option<VertexId>,
    pub twin: HalfEdgeId,
    pub edge: EdgeId,
}

/// A clipped Voronoi edge
///
/// `start` and `end` always lie inside the diagram bounds. When an endpoint is
/// a Voronoi vertex that survived clipping, its index is recorded too.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: DVec2,
    pub end: DVec2,
    pub start_vertex: Option<VertexId>,
    pub end_vertex: Option<VertexId>,
    pub left_site: SiteId,
    pub right_site: SiteId,
    /// Half-edge running from `start` to `end`; its twin is `half_edge ^ 1`
    pub half_edge: HalfEdgeId,
}

impl Edge {
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    #[inline]
    pub fn midpoint(&self) -> DVec2 {
        (self.start + self.end) * 0.5
    }

    /// Whether the edge separates the given site from another
    #[inline]
    pub fn borders(&self, site: SiteId) -> bool {
        self.left_site == site || self.right_site == site
    }
}

/// Twin of a half-edge under the paired layout
#[inline]
pub(crate) fn twin_of(half_edge: HalfEdgeId) -> HalfEdgeId {
    half_edge ^ 1
}
