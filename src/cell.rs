//! Sites and Voronoi Cells
//!
//! A site is an immutable input point. Each site owns exactly one cell, stored
//! at the site's id, that collects the half-edges bounding it.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dcel::HalfEdgeId;

/// Index of a site (and of its cell)
pub type SiteId = usize;

/// An input point of the diagram
///
/// The id is the site's position in the input slice; cells are indexed by it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub id: SiteId,
    pub x: f64,
    pub y: f64,
}

impl Site {
    #[inline]
    pub fn new(id: SiteId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Build sites from raw coordinates, assigning ids in input order
    ///
    /// # Example
    ///
    /// ```rust
    /// use rust_voronoi_plane::Site;
    ///
    /// let sites = Site::from_points(&[(0.0, 0.0), (10.0, 0.0)]);
    /// assert_eq!(sites[1].id, 1);
    /// assert_eq!(sites[1].x, 10.0);
    /// ```
    pub fn from_points(points: &[(f64, f64)]) -> Vec<Site> {
        points
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| Site::new(id, x, y))
            .collect()
    }
}

/// The region of the plane closer to one site than to any other
///
/// Holds the ids of the half-edges whose `left_site` is this cell's site,
/// i.e. the boundary as seen from inside the cell. A cell of a lone site, or
/// of a skipped duplicate, has no half-edges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    /// The site that owns this cell
    pub site: Site,

    /// Bounding half-edges, in the order they were finalized
    pub half_edges: Vec<HalfEdgeId>,
}

impl VoronoiCell {
    pub fn new(site: Site) -> Self {
        Self {
            site,
            half_edges: Vec::new(),
        }
    }

    /// Cell id, equal to the site id
    #[inline]
    pub fn id(&self) -> SiteId {
        self.site.id
    }

    #[inline]
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    /// Whether no clipped edge bounds this cell
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.half_edges.is_empty()
    }
}
