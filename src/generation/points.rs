//! Deterministic site generators
//!
//! Seeded with `ChaCha8Rng`, so the same arguments always produce the same
//! sites on every platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cell::Site;
use crate::config::BoundingBox;

/// Uniformly distributed sites inside `bounds`
///
/// # Example
///
/// ```rust
/// use rust_voronoi_plane::BoundingBox;
/// use rust_voronoi_plane::generation::random_sites;
///
/// let bounds = BoundingBox::new(0.0, 100.0, 0.0, 50.0).unwrap();
/// let sites = random_sites(200, &bounds, 42);
/// assert_eq!(sites.len(), 200);
/// assert!(sites.iter().all(|s| bounds.contains(s.position(), 0.0)));
/// ```
pub fn random_sites(count: usize, bounds: &BoundingBox, seed: u64) -> Vec<Site> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|id| {
            let x = rng.gen_range(bounds.min_x..bounds.max_x);
            let y = rng.gen_range(bounds.min_y..bounds.max_y);
            Site::new(id, x, y)
        })
        .collect()
}

/// Sites on a `columns` x `rows` grid, each moved randomly within its grid cell
///
/// `jitter` is the largest offset as a fraction of the grid spacing and is
/// clamped to `[0, 0.5]`; 0 gives a perfect (highly cocircular) grid.
pub fn jittered_grid_sites(
    columns: usize,
    rows: usize,
    bounds: &BoundingBox,
    jitter: f64,
    seed: u64,
) -> Vec<Site> {
    if columns == 0 || rows == 0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let jitter = jitter.clamp(0.0, 0.5);
    let step_x = bounds.width() / columns as f64;
    let step_y = bounds.height() / rows as f64;

    let mut sites = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for column in 0..columns {
            let mut x = bounds.min_x + (column as f64 + 0.5) * step_x;
            let mut y = bounds.min_y + (row as f64 + 0.5) * step_y;
            if jitter > 0.0 {
                x += rng.gen_range(-jitter..jitter) * step_x;
                y += rng.gen_range(-jitter..jitter) * step_y;
            }
            sites.push(Site::new(sites.len(), x, y));
        }
    }
    sites
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_sites_deterministic() {
        let bounds = BoundingBox::new(-5.0, 5.0, -5.0, 5.0).unwrap();
        let a = random_sites(50, &bounds, 7);
        let b = random_sites(50, &bounds, 7);
        let c = random_sites(50, &bounds, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        for (id, site) in a.iter().enumerate() {
            assert_eq!(site.id, id);
            assert!(bounds.contains(site.position(), 0.0));
        }
    }

    #[test]
    fn test_grid_sites_layout() {
        let bounds = BoundingBox::new(0.0, 40.0, 0.0, 20.0).unwrap();
        let sites = jittered_grid_sites(4, 2, &bounds, 0.0, 1);
        assert_eq!(sites.len(), 8);
        assert_eq!((sites[0].x, sites[0].y), (5.0, 5.0));
        assert_eq!((sites[7].x, sites[7].y), (35.0, 15.0));

        let jittered = jittered_grid_sites(4, 2, &bounds, 0.4, 1);
        for (plain, moved) in sites.iter().zip(&jittered) {
            assert!((plain.x - moved.x).abs() <= 0.4 * 10.0);
            assert!((plain.y - moved.y).abs() <= 0.4 * 10.0);
        }

        assert!(jittered_grid_sites(0, 3, &bounds, 0.1, 1).is_empty());
    }
}
