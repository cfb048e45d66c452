//! Spatial indexing for fast position-to-cell lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::DVec2;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

#[cfg(feature = "spatial-index")]
use crate::cell::{Site, SiteId};

/// Wrapper around KD-tree for nearest-site queries
///
/// The site nearest to a point owns the Voronoi cell containing it, so this
/// answers point-location without walking the half-edge mesh.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
    /// Site id of each tree item
    ids: Vec<SiteId>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build spatial index from sites
    ///
    /// Returns `None` for an empty site list.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_plane::*;
    /// use glam::DVec2;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let sites = Site::from_points(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]);
    ///
    /// let index = SpatialIndex::new(&sites).unwrap();
    /// assert_eq!(index.find_nearest(DVec2::new(9.0, 1.0)), 1);
    /// # }
    /// ```
    pub fn new(sites: &[Site]) -> Option<Self> {
        if sites.is_empty() {
            return None;
        }

        let points: Vec<[f64; 2]> = sites.iter().map(|s| [s.x, s.y]).collect();

        Some(Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            ids: sites.iter().map(|s| s.id).collect(),
        })
    }

    /// Id of the site nearest to `position`
    pub fn find_nearest(&self, position: DVec2) -> SiteId {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        self.ids[result.item as usize]
    }

    /// Number of indexed sites
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
