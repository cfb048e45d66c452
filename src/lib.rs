//! Planar Voronoi diagrams via Fortune's sweepline
//!
//! Computes the partition of the plane into one cell per site as a half-edge
//! mesh (vertices, twin half-edges, per-site cells), clipped to a bounding
//! rectangle.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_voronoi_plane::*;
//!
//! let config = DiagramConfigBuilder::new()
//!     .bounds(0.0, 100.0, 0.0, 100.0)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let bounds = config.bounds.unwrap();
//! let sites = generation::random_sites(500, &bounds, 42);
//! let diagram = VoronoiDiagram::generate(&sites, config).unwrap();
//!
//! println!(
//!     "{} cells, {} edges, {} vertices",
//!     diagram.cell_count(),
//!     diagram.edge_count(),
//!     diagram.vertex_count()
//! );
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, sites and mesh types

// Modules
pub mod error;
pub mod config;
pub mod cell;
pub mod dcel;
pub mod generation;
pub mod diagram;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use config::{BoundingBox, DiagramConfig, DiagramConfigBuilder, DuplicateSitePolicy};
pub use cell::{Site, SiteId, VoronoiCell};
pub use dcel::{Edge, EdgeId, HalfEdge, HalfEdgeId, VertexId};
pub use diagram::VoronoiDiagram;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
