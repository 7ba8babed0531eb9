//! Post-contact resolution: updated kinematic states at the instant two
//! bodies touch.
//!
//! Pure transformations; nothing here advances the clock or talks to the
//! caller's event scheduler.

use baize_math::{heading, rotate_z, try_unit, Vec3};

use crate::error::{PhysicsError, Result};
use crate::state::{BallParams, BallState, CushionParams, MotionState, Pocket};

/// Resolve an instantaneous, elastic, equal-mass ball-ball collision.
///
/// The relative velocity magnitude is redistributed along the contact
/// tangent (ball 1) and normal (ball 2), both frame-shifted by ball 2's
/// pre-collision velocity. Spin transfer and mass asymmetry are
/// deliberately ignored in this model.
pub fn resolve_ball_ball_collision(
    s1: &BallState,
    s2: &BallState,
) -> Result<(BallState, BallState)> {
    let v_rel = s1.v - s2.v;
    let v_mag = v_rel.norm();

    let normal = try_unit(&(s2.r - s1.r))
        .ok_or(PhysicsError::DegenerateVector("ball-ball contact normal"))?;
    let tangent = rotate_z(&normal, std::f64::consts::FRAC_PI_2);

    // Signed decomposition angle of the relative velocity against the
    // contact normal.
    let beta = heading(&v_rel) - heading(&normal);

    let mut out1 = *s1;
    let mut out2 = *s2;
    out1.v = tangent * v_mag * beta.sin() + s2.v;
    out2.v = normal * v_mag * beta.cos() + s2.v;
    Ok((out1, out2))
}

/// Cushion restitution for an impact state expressed in the cushion frame.
///
/// Velocity-dependent fits exist in the literature, but measured play is
/// served well by the configured constant, so this is a pass-through.
pub fn ball_cushion_restitution(_state: &BallState, e_c: f64) -> f64 {
    e_c
}

/// Cushion friction for an impact state expressed in the cushion frame.
/// Constant pass-through, same contract as [`ball_cushion_restitution`].
pub fn ball_cushion_friction(_state: &BallState, f_c: f64) -> f64 {
    f_c
}

/// Resolve a ball-cushion impact with the Han (2005) rigid-body impulse
/// model.
///
/// The state is rotated into the cushion frame (normal along +x), the
/// impulse branch is chosen by comparing the sticking threshold `PzS`
/// against the elastic threshold `PzE`, and the updated state is rotated
/// back. The z linear velocity is left untouched: motion stays in the
/// table plane.
pub fn resolve_ball_cushion_collision(
    state: &BallState,
    normal: &Vec3,
    cushion_height: f64,
    ball: &BallParams,
    cushion: &CushionParams,
) -> Result<BallState> {
    let radius = ball.radius;
    let mass = ball.mass;

    let ratio = cushion_height / radius - 1.0;
    if !(-1.0..=1.0).contains(&ratio) {
        return Err(PhysicsError::InvalidCushionHeight {
            height: cushion_height,
            radius,
        });
    }

    // Orient the normal to point with the incoming velocity, away from
    // the playing surface.
    let normal = if normal.dot(&state.v) > 0.0 {
        *normal
    } else {
        -normal
    };

    // Cushion frame: the normal becomes the local +x axis.
    let psi = heading(&normal);
    let mut st = state.rotated(-psi);

    // Incidence angle of the velocity in the rotated frame.
    let phi = heading(&st.v);

    let e = ball_cushion_restitution(&st, cushion.restitution);
    let mu = ball_cushion_friction(&st, cushion.friction);

    // Contact geometry depends on the cushion lip height.
    let theta_a = ratio.asin();
    let (sin_a, cos_a) = theta_a.sin_cos();

    // Surface slip components at the contact point (Han eqs. 14).
    let sx = st.v.x * sin_a - st.v.z * cos_a + radius * st.w.y;
    let sy = -st.v.y - radius * st.w.z * cos_a + radius * st.w.x * sin_a;
    // Normal-direction velocity component; table-plane assumption.
    let c = st.v.x * cos_a;

    let inertia = ball.moment_of_inertia();
    let a_coef = 3.5 / mass;
    let b_coef = 1.0 / mass;

    // Impulse thresholds (Han eqs. 16, 17 & 20).
    let pz_e = (1.0 + e) * c / b_coef;
    let pz_s = (sx * sx + sy * sy).sqrt() / a_coef;

    let (px, py, pz) = if pz_s <= pz_e {
        // Sliding and sticking: tangential slip is fully arrested.
        (
            -sx / a_coef * sin_a - (1.0 + e) * c / b_coef * cos_a,
            sy / a_coef,
            sx / a_coef * cos_a - (1.0 + e) * c / b_coef * sin_a,
        )
    } else {
        // Forward sliding: the impulse is friction-limited.
        let base = mu * (1.0 + e) * c / b_coef;
        (
            -base * phi.cos() * sin_a - (1.0 + e) * c / b_coef * cos_a,
            base * phi.sin(),
            base * phi.cos() * cos_a - (1.0 + e) * c / b_coef * sin_a,
        )
    };

    st.v.x += px / mass;
    st.v.y += py / mass;
    // st.v.z stays as-is: 2D table-plane assumption.

    st.w.x += -radius / inertia * py * sin_a;
    st.w.y += radius / inertia * (px * sin_a - pz * cos_a);
    st.w.z += radius / inertia * py * cos_a;

    Ok(st.rotated(psi))
}

/// Drop a ball into a pocket.
///
/// Reaching the pocket geometry is terminal: the ball is parked at the
/// pocket center with all motion zeroed, and no impulse is computed.
pub fn resolve_ball_pocket_collision(
    state: &BallState,
    pocket: &Pocket,
) -> (BallState, MotionState) {
    let mut out = *state;
    out.r = Vec3::new(pocket.center.x, pocket.center.y, 0.0);
    out.v = Vec3::zeros();
    out.w = Vec3::zeros();
    (out, MotionState::Pocketed)
}
