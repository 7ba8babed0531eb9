//! Ball state, motion regimes, and table geometry descriptors.
//!
//! All geometry is supplied by the caller; the kernel owns no table
//! layout. Units are SI throughout.

use baize_math::{rotate_z, Vec3, TOL};
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Kinematic state of a single ball: position, linear velocity, and
/// angular velocity in table-fixed Cartesian coordinates.
///
/// Motion is confined to the table plane, so the z-components of `r` and
/// `v` stay zero except transiently inside cushion-frame rotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallState {
    /// Position of the ball center (m).
    pub r: Vec3,
    /// Linear velocity (m/s).
    pub v: Vec3,
    /// Angular velocity (rad/s).
    pub w: Vec3,
}

impl BallState {
    /// A ball at rest at position `r`.
    pub fn at_rest(r: Vec3) -> Self {
        Self {
            r,
            v: Vec3::zeros(),
            w: Vec3::zeros(),
        }
    }

    /// Rotate all three component vectors about the z-axis by `angle`.
    ///
    /// Used to move between the table frame and a contact-normal-aligned
    /// frame; rotating by `angle` then `-angle` is an identity up to
    /// floating-point tolerance.
    pub fn rotated(&self, angle: f64) -> Self {
        Self {
            r: rotate_z(&self.r, angle),
            v: rotate_z(&self.v, angle),
            w: rotate_z(&self.w, angle),
        }
    }

    /// Velocity of the ball's contact point with the cloth,
    /// `v + R·(ẑ × w)`.
    ///
    /// Zero for a rolling ball; while sliding, its direction is the slip
    /// direction.
    pub fn relative_velocity(&self, radius: f64) -> Vec3 {
        self.v + radius * Vec3::z().cross(&self.w)
    }
}

/// Motion regime of a ball.
///
/// During free flight the regime decays monotonically
/// `Sliding → Rolling → Spinning → Stationary`; any regime transitions to
/// `Pocketed` on contact with a pocket. `Stationary` and `Pocketed` are
/// terminal: only a collision or a cue strike restarts motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionState {
    /// At rest on the table.
    Stationary,
    /// No translation; only z-axis spin decaying.
    Spinning,
    /// Translating with the contact point at rest on the cloth.
    Rolling,
    /// Translating with a slipping contact point.
    Sliding,
    /// Off the table, in a pocket.
    Pocketed,
}

impl MotionState {
    /// Whether the ball's center translates in this regime.
    pub fn is_translating(self) -> bool {
        matches!(self, Self::Rolling | Self::Sliding)
    }

    /// Whether the regime is a terminal fixed point of free flight.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stationary | Self::Pocketed)
    }
}

/// Per-ball physical constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallParams {
    /// Ball radius (m).
    pub radius: f64,
    /// Ball mass (kg).
    pub mass: f64,
}

impl BallParams {
    /// Create ball parameters, rejecting non-positive values.
    pub fn new(radius: f64, mass: f64) -> Result<Self> {
        require_positive("ball radius", radius)?;
        require_positive("ball mass", mass)?;
        Ok(Self { radius, mass })
    }

    /// Moment of inertia of a uniform sphere, `2/5·m·R²`.
    pub fn moment_of_inertia(&self) -> f64 {
        0.4 * self.mass * self.radius * self.radius
    }
}

/// Cloth friction coefficients and gravity.
///
/// All values must be strictly positive: a zero coefficient makes its
/// regime last forever, and the caller's event loop would never converge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrictionParams {
    /// Sliding friction coefficient (u_s).
    pub sliding: f64,
    /// Spinning friction coefficient (u_sp).
    pub spinning: f64,
    /// Rolling friction coefficient (u_r).
    pub rolling: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
}

impl FrictionParams {
    /// Create friction parameters, rejecting non-positive values.
    pub fn new(sliding: f64, spinning: f64, rolling: f64, gravity: f64) -> Result<Self> {
        require_positive("sliding friction", sliding)?;
        require_positive("spinning friction", spinning)?;
        require_positive("rolling friction", rolling)?;
        require_positive("gravity", gravity)?;
        Ok(Self {
            sliding,
            spinning,
            rolling,
            gravity,
        })
    }
}

/// Cushion material response coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CushionParams {
    /// Coefficient of restitution (e_c).
    pub restitution: f64,
    /// Coefficient of friction (f_c).
    pub friction: f64,
}

/// Which side(s) of a linear cushion segment balls may approach from,
/// in terms of the sign of the line equation offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CushionSide {
    /// Contact at signed distance `+R` from the line.
    Positive,
    /// Contact at signed distance `-R` from the line.
    Negative,
    /// Both sides are playable.
    Both,
}

/// A straight cushion segment with its precomputed line equation.
///
/// The line through `p1` and `p2` is stored as `lx·x + ly·y + l0 = 0`
/// with `(lx, ly)` unit length, so the signed distance of a point to the
/// cushion line is `lx·x + ly·y + l0` directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCushion {
    /// First endpoint.
    pub p1: Vec3,
    /// Second endpoint.
    pub p2: Vec3,
    /// Cushion lip height above the cloth (m).
    pub height: f64,
    /// Playable side(s) of the segment.
    pub side: CushionSide,
    lx: f64,
    ly: f64,
    l0: f64,
}

impl LinearCushion {
    /// Build a segment from its endpoints, precomputing the normalized
    /// line equation. Coincident endpoints are rejected.
    pub fn new(p1: Vec3, p2: Vec3, height: f64, side: CushionSide) -> Result<Self> {
        require_positive("cushion height", height)?;
        let (lx, ly, l0) = if (p2.x - p1.x).abs() < TOL {
            if (p2.y - p1.y).abs() < TOL {
                return Err(PhysicsError::DegenerateCushion);
            }
            (1.0, 0.0, -p1.x)
        } else {
            let slope = (p2.y - p1.y) / (p2.x - p1.x);
            let norm = (slope * slope + 1.0).sqrt();
            (-slope / norm, 1.0 / norm, (slope * p1.x - p1.y) / norm)
        };
        Ok(Self {
            p1,
            p2,
            height,
            side,
            lx,
            ly,
            l0,
        })
    }

    /// Unit normal of the cushion line (z component zero).
    pub fn normal(&self) -> Vec3 {
        Vec3::new(self.lx, self.ly, 0.0)
    }

    /// Normalized line equation coefficients `(lx, ly, l0)`.
    pub fn line_coeffs(&self) -> (f64, f64, f64) {
        (self.lx, self.ly, self.l0)
    }

    /// Signed distance from `p` to the cushion line.
    pub fn signed_distance(&self, p: &Vec3) -> f64 {
        self.lx * p.x + self.ly * p.y + self.l0
    }

    /// Fraction of the segment span at which `p` projects, 0 at `p1`
    /// and 1 at `p2`. Values outside `[0, 1]` fall beyond an endpoint.
    pub fn span_fraction(&self, p: &Vec3) -> f64 {
        let d = self.p2 - self.p1;
        (p - self.p1).dot(&d) / d.dot(&d)
    }
}

/// A circular cushion segment (rounded corner or cushion joint).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularCushion {
    /// Center of the arc (z component zero).
    pub center: Vec3,
    /// Arc radius (m).
    pub radius: f64,
    /// Cushion lip height above the cloth (m).
    pub height: f64,
}

impl CircularCushion {
    /// Unit normal at a contact point `p` on (or near) the arc.
    pub fn normal_at(&self, p: &Vec3) -> Result<Vec3> {
        baize_math::try_unit(&(p - self.center))
            .ok_or(PhysicsError::DegenerateVector("circular cushion contact"))
    }
}

/// A pocket, sensed by the ball center crossing its radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pocket {
    /// Pocket center (z component zero).
    pub center: Vec3,
    /// Pocket radius (m).
    pub radius: f64,
}

/// Total kinetic energy of a ball, linear plus rotational.
pub fn ball_energy(state: &BallState, ball: &BallParams) -> f64 {
    let linear = 0.5 * ball.mass * state.v.norm_squared();
    let rotational = 0.5 * ball.moment_of_inertia() * state.w.norm_squared();
    linear + rotational
}

/// Whether two balls geometrically overlap.
pub fn balls_overlap(s1: &BallState, s2: &BallState, r1: f64, r2: f64) -> bool {
    (s1.r - s2.r).norm() < r1 + r2
}

fn require_positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::NonPositiveParameter { name, value })
    }
}
