//! Cue-strike model: converts a strike description into post-strike
//! linear and angular velocity.

use baize_math::{rotate_z, Vec3};

use crate::error::{PhysicsError, Result};
use crate::state::BallParams;

/// Fraction of the requested tip offset that actually reaches the ball.
///
/// The rigid-impact model imparts unrealistically large spin at full
/// offset, so the requested english is damped by this factor.
pub const ENGLISH_FRACTION: f64 = 0.5;

/// Strike a ball, returning its table-frame `(v, w)`.
///
/// `phi` is the azimuthal strike direction and `theta` the cue elevation,
/// both in degrees. `a` and `b` are side and vertical english as
/// fractions of the radius in `[-1, 1]`, damped by [`ENGLISH_FRACTION`];
/// the effective contact point `(a, b, c)` with `c = √(R² - a² - b²)`
/// must lie on the ball surface or the strike is rejected.
///
/// The impulse model follows Leckie & Greenspan with the cue mass in the
/// numerator of the impact force
/// (<https://billiards.colostate.edu/faq/cue-tip/force/>).
pub fn cue_strike(
    ball: &BallParams,
    cue_mass: f64,
    v0: f64,
    phi: f64,
    theta: f64,
    a: f64,
    b: f64,
) -> Result<(Vec3, Vec3)> {
    if cue_mass <= 0.0 {
        return Err(PhysicsError::NonPositiveParameter {
            name: "cue mass",
            value: cue_mass,
        });
    }
    if v0 <= 0.0 {
        return Err(PhysicsError::NonPositiveParameter {
            name: "strike speed",
            value: v0,
        });
    }

    let radius = ball.radius;
    let mass = ball.mass;

    let a = a * radius * ENGLISH_FRACTION;
    let b = b * radius * ENGLISH_FRACTION;
    if a * a + b * b > radius * radius {
        return Err(PhysicsError::InvalidStrikeOffset { a, b, radius });
    }
    let c = (radius * radius - a * a - b * b).sqrt();

    let phi = phi.to_radians();
    let theta = theta.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();

    let inertia = ball.moment_of_inertia();

    let numerator = 2.0 * cue_mass * v0;
    let offset_term = a * a + (b * cos_t).powi(2) + (c * cos_t).powi(2)
        - 2.0 * b * c * cos_t * sin_t;
    let denominator = 1.0 + mass / cue_mass + 2.5 / (radius * radius) * offset_term;
    let force = numerator / denominator;

    // Elevation is flattened onto the table plane (no vertical velocity).
    let v_b = Vec3::new(0.0, -force / mass * cos_t, 0.0);
    let w_b = force / inertia
        * Vec3::new(-c * sin_t + b * cos_t, a * sin_t, -a * cos_t);

    // The ball frame has the cue pointing along -y; rotate into the table
    // frame heading.
    let rot = phi + std::f64::consts::FRAC_PI_2;
    Ok((rotate_z(&v_b, rot), rotate_z(&w_b, rot)))
}
