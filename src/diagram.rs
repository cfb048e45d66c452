//! VoronoiDiagram main structure

use glam::DVec2;
use std::collections::HashSet;

use crate::cell::{Site, SiteId, VoronoiCell};
use crate::config::{BoundingBox, DiagramConfig};
use crate::dcel::{Edge, HalfEdge, HalfEdgeId};
use crate::error::{Result, VoronoiError};
use crate::generation::build_mesh;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A planar Voronoi diagram clipped to a bounding box
///
/// Built in one call by Fortune's sweepline. The diagram owns its sites, the
/// Voronoi vertices, the clipped edges with their twin half-edges, and one
/// cell per input site (indexed by site id).
///
/// # Examples
///
/// ```
/// use rust_voronoi_plane::*;
///
/// let config = DiagramConfigBuilder::new()
///     .bounds(0.0, 20.0, 0.0, 20.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let diagram =
///     VoronoiDiagram::from_points(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)], config).unwrap();
///
/// assert_eq!(diagram.vertex_count(), 1);
/// assert_eq!(diagram.edge_count(), 3);
/// assert_eq!(diagram.cell_count(), 3);
/// ```
#[derive(Clone)]
pub struct VoronoiDiagram {
    /// Configuration used to build this diagram
    config: DiagramConfig,

    /// Rectangle every edge was clipped to
    bounds: BoundingBox,

    /// Input sites, indexed by id
    sites: Vec<Site>,

    /// Voronoi vertices in the order the sweep emitted them
    vertices: Vec<DVec2>,

    /// Twin pairs at `2k` / `2k + 1`
    half_edges: Vec<HalfEdge>,

    edges: Vec<Edge>,

    /// One cell per input site (indexed by site id)
    cells: Vec<VoronoiCell>,

    /// Nearest-site lookups (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: Option<SpatialIndex>,
}

impl VoronoiDiagram {
    /// Build the diagram of `sites`
    ///
    /// Site ids must equal their index in the slice. Bounds default to a
    /// padded box around the sites when the config leaves them unset.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if a site id does not match its index
    /// - `NonFiniteSite` for NaN or infinite coordinates
    /// - `InvalidBounds` for an empty or inverted rectangle
    /// - `DuplicateSite` for coincident sites under `DuplicateSitePolicy::Reject`
    pub fn generate(sites: &[Site], config: DiagramConfig) -> Result<Self> {
        crate::generation::validate_sites(sites)?;
        let bounds = config.resolve_bounds(sites);

        let (mesh, swept) = build_mesh(sites, &bounds, &config)?;

        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::new(&swept);
        #[cfg(not(feature = "spatial-index"))]
        let _ = swept;

        Ok(Self {
            config,
            bounds,
            sites: sites.to_vec(),
            vertices: mesh.vertices,
            half_edges: mesh.half_edges,
            edges: mesh.edges,
            cells: mesh.cells,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Build the diagram of raw `(x, y)` points; ids follow input order
    pub fn from_points(points: &[(f64, f64)], config: DiagramConfig) -> Result<Self> {
        Self::generate(&Site::from_points(points), config)
    }

    #[inline]
    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Voronoi vertices, including any lying outside the bounds
    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Clipped edges; all endpoints lie within the bounds
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    #[inline]
    pub fn cells(&self) -> &[VoronoiCell] {
        &self.cells
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get a cell by site id
    ///
    /// Returns `None` if the id is out of bounds.
    #[inline]
    pub fn get_cell(&self, id: SiteId) -> Option<&VoronoiCell> {
        self.cells.get(id)
    }

    /// Get a cell by site id, as an error when missing
    pub fn cell(&self, id: SiteId) -> Result<&VoronoiCell> {
        self.cells.get(id).ok_or(VoronoiError::CellNotFound(id))
    }

    #[inline]
    pub fn half_edge(&self, id: HalfEdgeId) -> Option<&HalfEdge> {
        self.half_edges.get(id)
    }

    /// The oppositely directed half-edge of `id`
    pub fn twin(&self, id: HalfEdgeId) -> Option<&HalfEdge> {
        self.half_edges
            .get(id)
            .and_then(|half_edge| self.half_edges.get(half_edge.twin))
    }

    /// Sites whose cells share a clipped edge with this one
    ///
    /// Sorted ascending; empty for an unknown id.
    pub fn cell_neighbors(&self, id: SiteId) -> Vec<SiteId> {
        let Some(cell) = self.cells.get(id) else {
            return Vec::new();
        };

        let mut neighbors: Vec<SiteId> = cell
            .half_edges
            .iter()
            .map(|&half_edge| self.half_edges[half_edge].right_site)
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    /// Find cells within a given hop count from a center cell (BFS)
    ///
    /// Includes the center cell; empty if `center_id` is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_plane::*;
    /// let points = [(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)];
    /// let diagram = VoronoiDiagram::from_points(&points, DiagramConfig::default()).unwrap();
    ///
    /// let mut nearby = diagram.find_cells_within_hops(0, 2);
    /// nearby.sort();
    /// assert_eq!(nearby, vec![0, 1, 2]);
    /// ```
    pub fn find_cells_within_hops(&self, center_id: SiteId, hops: usize) -> Vec<SiteId> {
        if center_id >= self.cells.len() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut current = vec![center_id];
        visited.insert(center_id);

        // BFS with hop limit
        for _ in 0..hops {
            let mut next = Vec::new();
            for &cell_id in &current {
                for neighbor in self.cell_neighbors(cell_id) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            current = next;
        }

        visited.into_iter().collect()
    }

    /// Find the cell containing a position (requires spatial-index feature)
    ///
    /// Returns the id of the nearest swept site, `None` for an empty diagram.
    /// Skipped duplicates resolve to the site they duplicate.
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, position: DVec2) -> Option<SiteId> {
        self.spatial_index
            .as_ref()
            .map(|index| index.find_nearest(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DiagramConfigBuilder, DuplicateSitePolicy};

    fn bounded(min: f64, max: f64) -> DiagramConfig {
        DiagramConfigBuilder::new()
            .bounds(min, max, min, max)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_triangle_scenario() {
        let diagram =
            VoronoiDiagram::from_points(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)], bounded(0.0, 20.0))
                .unwrap();

        assert_eq!(diagram.vertex_count(), 1);
        assert!((diagram.vertices()[0] - DVec2::new(5.0, 3.75)).length() < 1e-9);
        assert_eq!(diagram.edge_count(), 3);
        assert_eq!(diagram.cell_count(), 3);
        for cell in diagram.cells() {
            assert!(!cell.is_empty());
        }

        // Every edge starts or ends at the vertex and leaves the box
        for edge in diagram.edges() {
            assert!(edge.start_vertex == Some(0) || edge.end_vertex == Some(0));
        }
    }

    #[test]
    fn test_zero_sites() {
        let diagram = VoronoiDiagram::generate(&[], DiagramConfig::default()).unwrap();
        assert_eq!(diagram.vertex_count(), 0);
        assert_eq!(diagram.edge_count(), 0);
        assert_eq!(diagram.cell_count(), 0);
        assert!(diagram.half_edges().is_empty());
        #[cfg(feature = "spatial-index")]
        assert_eq!(diagram.find_cell_at(DVec2::ZERO), None);
    }

    #[test]
    fn test_single_site() {
        let diagram = VoronoiDiagram::from_points(&[(4.0, 2.0)], DiagramConfig::default()).unwrap();
        assert!(diagram.vertices().is_empty());
        assert!(diagram.edges().is_empty());
        assert_eq!(diagram.cell_count(), 1);
        assert_eq!(diagram.cells()[0].site, Site::new(0, 4.0, 2.0));
        assert!(diagram.cells()[0].half_edges.is_empty());
    }

    #[test]
    fn test_collinear_sites() {
        let diagram = VoronoiDiagram::from_points(
            &[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)],
            DiagramConfig::default(),
        )
        .unwrap();

        assert_eq!(diagram.vertex_count(), 0);
        assert_eq!(diagram.edge_count(), 2);
        assert_eq!(diagram.cell_count(), 3);
        let mut xs: Vec<f64> = diagram.edges().iter().map(|e| e.start.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, vec![2.5, 7.5]);
        for edge in diagram.edges() {
            assert_eq!(edge.start.x, edge.end.x, "edge should be vertical");
        }
    }

    #[test]
    fn test_neighbors_and_twins() {
        let diagram =
            VoronoiDiagram::from_points(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)], bounded(-50.0, 50.0))
                .unwrap();

        assert_eq!(diagram.cell_neighbors(0), vec![1, 2]);
        assert_eq!(diagram.cell_neighbors(2), vec![0, 1]);
        assert!(diagram.cell_neighbors(99).is_empty());

        for id in 0..diagram.half_edges().len() {
            let half_edge = diagram.half_edge(id).unwrap();
            let twin = diagram.twin(id).unwrap();
            assert_eq!(twin.twin, id);
            assert_eq!(twin.left_site, half_edge.right_site);
            assert_eq!(twin.right_site, half_edge.left_site);
        }
    }

    #[test]
    fn test_cell_lookup_errors() {
        let diagram = VoronoiDiagram::from_points(&[(0.0, 0.0)], DiagramConfig::default()).unwrap();
        assert!(diagram.cell(0).is_ok());
        assert_eq!(diagram.cell(3).unwrap_err(), VoronoiError::CellNotFound(3));
        assert!(diagram.get_cell(1).is_none());
    }

    #[test]
    fn test_duplicate_sites() {
        let points = [(0.0, 0.0), (10.0, 0.0), (0.0, 0.0), (5.0, 10.0)];
        let diagram = VoronoiDiagram::from_points(&points, bounded(-20.0, 20.0)).unwrap();
        assert_eq!(diagram.cell_count(), 4);
        assert!(diagram.cells()[2].is_empty());
        assert_eq!(diagram.vertex_count(), 1);

        let strict = DiagramConfigBuilder::new()
            .duplicate_policy(DuplicateSitePolicy::Reject)
            .build()
            .unwrap();
        assert_eq!(
            VoronoiDiagram::from_points(&points, strict).err(),
            Some(VoronoiError::DuplicateSite {
                site: 2,
                duplicate_of: 0
            })
        );
    }

    #[test]
    fn test_invalid_input() {
        let result = VoronoiDiagram::from_points(&[(0.0, f64::INFINITY)], DiagramConfig::default());
        assert_eq!(result.err(), Some(VoronoiError::NonFiniteSite(0)));

        let mut config = DiagramConfig::default();
        config.bounds = Some(BoundingBox {
            min_x: 0.0,
            max_x: 0.0,
            min_y: 0.0,
            max_y: 1.0,
        });
        let result = VoronoiDiagram::from_points(&[(0.0, 0.0)], config);
        assert!(matches!(result, Err(VoronoiError::InvalidBounds { .. })));
    }

    #[test]
    fn test_find_cells_within_hops() {
        let points = [(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)];
        let diagram = VoronoiDiagram::from_points(&points, DiagramConfig::default()).unwrap();

        assert_eq!(diagram.find_cells_within_hops(0, 0), vec![0]);
        let mut two = diagram.find_cells_within_hops(1, 1);
        two.sort();
        assert_eq!(two, vec![0, 1, 2]);
        assert_eq!(diagram.find_cells_within_hops(0, 10).len(), 4);
        assert!(diagram.find_cells_within_hops(42, 1).is_empty());
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_cell_at() {
        let points = [(0.0, 0.0), (10.0, 0.0), (5.0, 10.0), (0.0, 0.0)];
        let diagram = VoronoiDiagram::from_points(&points, DiagramConfig::default()).unwrap();

        assert_eq!(diagram.find_cell_at(DVec2::new(1.0, 1.0)), Some(0));
        assert_eq!(diagram.find_cell_at(DVec2::new(9.0, 1.0)), Some(1));
        assert_eq!(diagram.find_cell_at(DVec2::new(5.0, 9.0)), Some(2));
    }
}
