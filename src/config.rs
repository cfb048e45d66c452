//! Diagram Configuration and Builder
//!
//! This module provides the clipping rectangle and the knobs that control
//! ray extension, duplicate handling, and the beachline tree seed.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::Site;
use crate::error::{Result, VoronoiError};

/// Default seed for the beachline tree priorities
pub const DEFAULT_SEED: u64 = 0x5EED_F0A7;

/// Default multiple of the bounds diagonal used to extend unbounded rays
pub const DEFAULT_RAY_EXTENT_FACTOR: f64 = 2.0;

/// Fraction of the site extent added on every side of the default bounds
const DEFAULT_PADDING_FRACTION: f64 = 0.1;

/// Minimum padding of the default bounds, so a single row or column of sites
/// still gets a non-empty rectangle
const MIN_PADDING: f64 = 1.0;

/// Axis-aligned clipping rectangle
///
/// Always satisfies `min_x < max_x` and `min_y < max_y` with finite values
/// when built through [`BoundingBox::new`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a validated bounding box
    ///
    /// # Errors
    ///
    /// Returns `InvalidBounds` if any bound is non-finite or if
    /// `min_x >= max_x` or `min_y >= max_y`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rust_voronoi_plane::BoundingBox;
    ///
    /// let bounds = BoundingBox::new(0.0, 20.0, 0.0, 10.0).unwrap();
    /// assert_eq!(bounds.width(), 20.0);
    /// assert!(BoundingBox::new(5.0, 5.0, 0.0, 1.0).is_err());
    /// ```
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Result<Self> {
        let bounds = Self {
            min_x,
            max_x,
            min_y,
            max_y,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Check the box is finite and non-degenerate
    pub fn validate(&self) -> Result<()> {
        let finite = [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(VoronoiError::InvalidBounds {
                min_x: self.min_x,
                max_x: self.max_x,
                min_y: self.min_y,
                max_y: self.max_y,
            });
        }
        Ok(())
    }

    /// Padded bounding box around a set of sites
    ///
    /// Each side is pushed out by 10% of the site extent along that axis, and
    /// by at least 1.0. An empty site set yields the unit square.
    pub fn around_sites(sites: &[Site]) -> Self {
        let finite = sites.iter().filter(|s| s.is_finite());
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        for site in finite {
            min = min.min(site.position());
            max = max.max(site.position());
        }

        if min.x > max.x {
            return Self {
                min_x: 0.0,
                max_x: 1.0,
                min_y: 0.0,
                max_y: 1.0,
            };
        }

        let pad = ((max - min) * DEFAULT_PADDING_FRACTION).max(DVec2::splat(MIN_PADDING));
        Self {
            min_x: min.x - pad.x,
            max_x: max.x + pad.x,
            min_y: min.y - pad.y,
            max_y: max.y + pad.y,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Length of the box diagonal
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// Whether a point lies inside the box, boundary included, with slack `eps`
    pub fn contains(&self, point: DVec2, eps: f64) -> bool {
        point.x >= self.min_x - eps
            && point.x <= self.max_x + eps
            && point.y >= self.min_y - eps
            && point.y <= self.max_y + eps
    }
}

/// What to do with sites that coincide with an earlier site
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateSitePolicy {
    /// Drop later duplicates before the sweep; their cells stay empty
    #[default]
    Skip,
    /// Fail with `DuplicateSite`
    Reject,
}

/// Configuration for diagram construction
///
/// The same configuration and the same sites always produce a bit-identical
/// diagram.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_plane::*;
///
/// let config = DiagramConfigBuilder::new()
///     .bounds(0.0, 100.0, 0.0, 100.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DiagramConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Clipping rectangle; `None` uses [`BoundingBox::around_sites`]
    pub bounds: Option<BoundingBox>,

    /// Unbounded rays are extended by this multiple of the bounds diagonal
    pub ray_extent_factor: f64,

    /// Fixed ray extension length, overriding `ray_extent_factor`
    pub ray_extent: Option<f64>,

    /// Handling of coincident input sites
    pub duplicate_policy: DuplicateSitePolicy,

    /// Seed for the beachline tree priorities
    ///
    /// Only affects the shape of the internal search tree, never the output.
    pub seed: u64,
}

impl DiagramConfig {
    /// Bounds to clip against for the given sites
    #[inline]
    pub fn resolve_bounds(&self, sites: &[Site]) -> BoundingBox {
        self.bounds
            .unwrap_or_else(|| BoundingBox::around_sites(sites))
    }

    /// Ray extension length for the given bounds
    #[inline]
    pub fn resolve_ray_extent(&self, bounds: &BoundingBox) -> f64 {
        self.ray_extent
            .unwrap_or(self.ray_extent_factor * bounds.diagonal())
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            bounds: None,
            ray_extent_factor: DEFAULT_RAY_EXTENT_FACTOR,
            ray_extent: None,
            duplicate_policy: DuplicateSitePolicy::default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Builder for creating DiagramConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voronoi_plane::*;
///
/// let config = DiagramConfigBuilder::new()
///     .bounds(-10.0, 10.0, -10.0, 10.0)
///     .unwrap()
///     .ray_extent_factor(4.0)
///     .unwrap()
///     .duplicate_policy(DuplicateSitePolicy::Reject)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.ray_extent_factor, 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct DiagramConfigBuilder {
    config: DiagramConfig,
}

impl DiagramConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - bounds: padded box around the sites
    /// - ray_extent_factor: 2.0
    /// - ray_extent: None
    /// - duplicate_policy: Skip
    /// - seed: fixed constant
    pub fn new() -> Self {
        Self {
            config: DiagramConfig::default(),
        }
    }

    /// Set the clipping rectangle
    ///
    /// # Errors
    ///
    /// Returns `InvalidBounds` for empty, inverted or non-finite rectangles
    pub fn bounds(mut self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Result<Self> {
        self.config.bounds = Some(BoundingBox::new(min_x, max_x, min_y, max_y)?);
        Ok(self)
    }

    /// Set the clipping rectangle from an existing box
    ///
    /// # Errors
    ///
    /// Returns `InvalidBounds` if the box fails validation
    pub fn bounding_box(mut self, bounds: BoundingBox) -> Result<Self> {
        bounds.validate()?;
        self.config.bounds = Some(bounds);
        Ok(self)
    }

    /// Set the ray extension factor (multiple of the bounds diagonal)
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless the factor is finite and >= 1.0; shorter
    /// rays could stop inside the box.
    pub fn ray_extent_factor(mut self, factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor < 1.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "ray extent factor must be finite and >= 1 (got {})",
                factor
            )));
        }
        self.config.ray_extent_factor = factor;
        Ok(self)
    }

    /// Set a fixed ray extension length
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the length is not finite and positive
    pub fn ray_extent(mut self, length: f64) -> Result<Self> {
        if !length.is_finite() || length <= 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "ray extent must be positive (got {})",
                length
            )));
        }
        self.config.ray_extent = Some(length);
        Ok(self)
    }

    /// Set the duplicate site policy
    pub fn duplicate_policy(mut self, policy: DuplicateSitePolicy) -> Self {
        self.config.duplicate_policy = policy;
        self
    }

    /// Set the beachline tree seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DiagramConfig> {
        Ok(self.config)
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
