//! Error types for the physics kernel.

use thiserror::Error;

/// Errors that can occur during physics computations.
///
/// "No collision found" is not an error; collision-time solvers report it
/// by returning `+∞`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PhysicsError {
    /// A zero-length vector where a direction was required.
    #[error("degenerate zero-length vector: {0}")]
    DegenerateVector(&'static str),

    /// Cushion segment endpoints coincide.
    #[error("degenerate cushion segment: endpoints coincide")]
    DegenerateCushion,

    /// Cue strike offsets lie outside the ball surface.
    #[error("strike offset ({a}, {b}) lies outside a ball of radius {radius}")]
    InvalidStrikeOffset {
        /// Effective horizontal offset (m).
        a: f64,
        /// Effective vertical offset (m).
        b: f64,
        /// Ball radius (m).
        radius: f64,
    },

    /// Cushion lip height is incompatible with the ball radius.
    #[error("cushion height {height} incompatible with ball radius {radius}")]
    InvalidCushionHeight {
        /// Cushion lip height (m).
        height: f64,
        /// Ball radius (m).
        radius: f64,
    },

    /// A physical constant that must be strictly positive was not.
    #[error("{name} must be strictly positive, got {value}")]
    NonPositiveParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}

/// Result type for physics operations.
pub type Result<T> = std::result::Result<T, PhysicsError>;
