//! Error types for diagram construction and queries

use thiserror::Error;

/// Errors that can occur while validating input or querying a diagram
///
/// The sweep itself never fails: degenerate geometry (collinear triples,
/// shared y-coordinates) is skipped, not reported. Everything here is raised
/// while checking the input before the sweep starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoronoiError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Bounding rectangle is empty, inverted, or not finite
    #[error("invalid bounds: x [{min_x}, {max_x}], y [{min_y}, {max_y}]")]
    InvalidBounds {
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
    },

    /// A site coordinate is NaN or infinite
    #[error("site {0} has a non-finite coordinate")]
    NonFiniteSite(usize),

    /// Two sites coincide and the configured policy rejects duplicates
    #[error("site {site} coincides with site {duplicate_of}")]
    DuplicateSite { site: usize, duplicate_of: usize },

    /// Requested cell ID does not exist
    #[error("cell not found: {0}")]
    CellNotFound(usize),
}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = VoronoiError::DuplicateSite {
            site: 4,
            duplicate_of: 1,
        };
        assert_eq!(err.to_string(), "site 4 coincides with site 1");

        let err = VoronoiError::CellNotFound(7);
        assert_eq!(err.to_string(), "cell not found: 7");
    }
}
