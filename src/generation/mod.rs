//! Core Voronoi generation algorithm
//!
//! Validates the input sites, runs Fortune's sweepline over the distinct
//! ones, and clips the resulting half-edge mesh to the bounding box.

mod beachline;
mod circle;
mod events;
mod finalize;
mod fortune;
mod points;

pub use points::{jittered_grid_sites, random_sites};

pub(crate) use finalize::FinishedMesh;

use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::cell::Site;
use crate::config::{BoundingBox, DiagramConfig, DuplicateSitePolicy};
use crate::error::{Result, VoronoiError};

/// Geometric tolerance for degenerate configurations
pub(crate) const EPSILON: f64 = 1e-10;

/// Check ids match positions and coordinates are finite
pub(crate) fn validate_sites(sites: &[Site]) -> Result<()> {
    for (index, site) in sites.iter().enumerate() {
        if site.id != index {
            return Err(VoronoiError::InvalidConfig(format!(
                "site at index {} has id {}",
                index, site.id
            )));
        }
        if !site.is_finite() {
            return Err(VoronoiError::NonFiniteSite(site.id));
        }
    }
    Ok(())
}

/// Sites with exact duplicates removed, keeping the lowest id of each group
///
/// Sorted by `(y, x)`, the order the sweep consumes them in.
pub(crate) fn distinct_sites(sites: &[Site], policy: DuplicateSitePolicy) -> Result<Vec<Site>> {
    let mut sorted: Vec<Site> = sites.to_vec();
    sorted.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
            .then(a.id.cmp(&b.id))
    });

    let mut distinct: Vec<Site> = Vec::with_capacity(sorted.len());
    for site in sorted {
        if let Some(kept) = distinct.last() {
            if kept.x == site.x && kept.y == site.y {
                match policy {
                    DuplicateSitePolicy::Reject => {
                        return Err(VoronoiError::DuplicateSite {
                            site: site.id,
                            duplicate_of: kept.id,
                        });
                    }
                    DuplicateSitePolicy::Skip => {
                        warn!(site = site.id, duplicate_of = kept.id, "skipping duplicate site");
                        continue;
                    }
                }
            }
        }
        distinct.push(site);
    }
    Ok(distinct)
}

/// Build the clipped mesh for validated sites
///
/// Returns the mesh and the distinct sites that took part in the sweep.
pub(crate) fn build_mesh(
    sites: &[Site],
    bounds: &BoundingBox,
    config: &DiagramConfig,
) -> Result<(FinishedMesh, Vec<Site>)> {
    validate_sites(sites)?;
    bounds.validate()?;

    // Step 1: Drop coincident sites
    let distinct = distinct_sites(sites, config.duplicate_policy)?;

    // Step 2: Sweep
    let (mesh, stats) = fortune::Sweep::new(&distinct, sites.len(), config.seed).run();

    // Step 3: Extend rays and clip
    let finished = finalize::finalize(mesh, sites, bounds, config);

    debug!(
        sites = sites.len(),
        distinct = distinct.len(),
        stale_events = stats.stale_events,
        vertices = finished.vertices.len(),
        edges = finished.edges.len(),
        "diagram generated"
    );

    Ok((finished, distinct))
}
