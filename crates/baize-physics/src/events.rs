//! Collision-time solvers: earliest contact between a ball and another
//! ball, a cushion segment, or a pocket.
//!
//! Each solver assumes both participants keep evolving in their current
//! regime (the caller's scheduler takes the global minimum across events
//! and re-queries after each one). Within a regime a ball's position is
//! quadratic in time, so the touching condition becomes a quadratic
//! (linear cushion) or quartic (everything else) polynomial whose
//! smallest strictly-future real root is the answer. `+∞` means "no
//! contact in this regime".

use baize_math::{
    heading, min_future_root, quadratic_roots, quartic_roots, rotate_z, segments_intersect,
    try_unit, Complex64, Vec3, TOL,
};
use rayon::prelude::*;

use crate::error::{PhysicsError, Result};
use crate::evolve::{evolve_state_motion, roll_time};
use crate::state::{
    BallParams, BallState, CircularCushion, CushionSide, FrictionParams, LinearCushion,
    MotionState, Pocket,
};

/// Friction coefficient governing a ball's trajectory in its regime.
fn regime_friction(motion: MotionState, friction: &FrictionParams) -> f64 {
    match motion {
        MotionState::Sliding => friction.sliding,
        _ => friction.rolling,
    }
}

/// Coefficients of a ball's table-frame trajectory,
/// `p(t) = (cx, cy) + (bx, by)·t + (ax, ay)·t²`.
struct TrajectoryCoeffs {
    ax: f64,
    ay: f64,
    bx: f64,
    by: f64,
    cx: f64,
    cy: f64,
}

fn trajectory_coeffs(
    state: &BallState,
    motion: MotionState,
    ball: &BallParams,
    friction: &FrictionParams,
) -> Result<TrajectoryCoeffs> {
    let (cx, cy) = (state.r.x, state.r.y);
    if !motion.is_translating() {
        return Ok(TrajectoryCoeffs {
            ax: 0.0,
            ay: 0.0,
            bx: 0.0,
            by: 0.0,
            cx,
            cy,
        });
    }

    let phi = heading(&state.v);
    let speed = state.v.norm();

    // Deceleration direction in the ball frame: along +x when rolling,
    // along the slip direction when sliding.
    let u = if motion == MotionState::Rolling {
        Vec3::x()
    } else {
        let slip = try_unit(&state.relative_velocity(ball.radius))
            .ok_or(PhysicsError::DegenerateVector("sliding contact velocity"))?;
        rotate_z(&slip, -phi)
    };

    let k = -0.5 * regime_friction(motion, friction) * friction.gravity;
    let (sin_phi, cos_phi) = phi.sin_cos();
    Ok(TrajectoryCoeffs {
        ax: k * (u.x * cos_phi - u.y * sin_phi),
        ay: k * (u.x * sin_phi + u.y * cos_phi),
        bx: speed * cos_phi,
        by: speed * sin_phi,
        cx,
        cy,
    })
}

/// Cheap pre-check ruling out impossible ball-ball collisions without a
/// quartic solve.
///
/// Skips when neither ball translates, when either is pocketed, when two
/// rolling balls recede from each other along their straight lines, and
/// when a rolling ball's heading cone cannot reach a non-translating
/// target.
pub fn skip_ball_ball_collision(
    s1: &BallState,
    s2: &BallState,
    m1: MotionState,
    m2: MotionState,
    r1: f64,
    r2: f64,
) -> bool {
    if !m1.is_translating() && !m2.is_translating() {
        return true;
    }
    if m1 == MotionState::Pocketed || m2 == MotionState::Pocketed {
        return true;
    }

    if m1 == MotionState::Rolling && m2 == MotionState::Rolling {
        // Both trajectories are straight lines; receding balls never meet.
        let r12 = s2.r - s1.r;
        if r12.dot(&s1.v) <= 0.0 && r12.dot(&s2.v) >= 0.0 {
            return true;
        }
    }

    if m1 == MotionState::Rolling && !m2.is_translating() && heading_cone_misses(s1, s2, r1, r2)
    {
        return true;
    }
    if m2 == MotionState::Rolling && !m1.is_translating() && heading_cone_misses(s2, s1, r1, r2)
    {
        return true;
    }

    false
}

/// Whether a rolling ball's straight-line heading cone excludes a
/// stationary target.
fn heading_cone_misses(mover: &BallState, target: &BallState, r1: f64, r2: f64) -> bool {
    let r12 = target.r - mover.r;
    let d = r12.norm();
    let (Some(unit_d), Some(unit_v)) = (try_unit(&r12), try_unit(&mover.v)) else {
        return false;
    };
    let angle = unit_d.dot(&unit_v).clamp(-1.0, 1.0).acos();
    let max_hit_angle =
        std::f64::consts::FRAC_PI_2 - ((r1 + r2) / d).clamp(-1.0, 1.0).acos();
    angle > max_hit_angle
}

/// Time until two balls first touch (center distance `R1 + R2`), or `+∞`.
pub fn ball_ball_collision_time(
    s1: &BallState,
    s2: &BallState,
    m1: MotionState,
    m2: MotionState,
    b1: &BallParams,
    b2: &BallParams,
    friction: &FrictionParams,
) -> Result<f64> {
    if skip_ball_ball_collision(s1, s2, m1, m2, b1.radius, b2.radius) {
        return Ok(f64::INFINITY);
    }

    let t1 = trajectory_coeffs(s1, m1, b1, friction)?;
    let t2 = trajectory_coeffs(s2, m2, b2, friction)?;

    let ax = t2.ax - t1.ax;
    let ay = t2.ay - t1.ay;
    let bx = t2.bx - t1.bx;
    let by = t2.by - t1.by;
    let cx = t2.cx - t1.cx;
    let cy = t2.cy - t1.cy;

    let a = ax * ax + ay * ay;
    let b = 2.0 * (ax * bx + ay * by);
    let c = bx * bx + by * by + 2.0 * (ax * cx + ay * cy);
    let d = 2.0 * (bx * cx + by * cy);
    let sum = b1.radius + b2.radius;
    let e = cx * cx + cy * cy - sum * sum;

    Ok(min_future_root(&quartic_roots(a, b, c, d, e)))
}

/// Pre-check for the linear cushion: a rolling ball's straight segment to
/// its stopping point must cross one of the two R-offset cushion lines.
///
/// Sliding trajectories curve, so only the rolling case is pre-checked.
pub fn skip_ball_linear_cushion_collision(
    state: &BallState,
    motion: MotionState,
    cushion: &LinearCushion,
    ball: &BallParams,
    friction: &FrictionParams,
) -> bool {
    if !motion.is_translating() {
        return true;
    }
    if motion != MotionState::Rolling {
        return false;
    }
    let Some(v_hat) = try_unit(&state.v) else {
        return false;
    };

    let normal = cushion.normal();
    let p11 = cushion.p1 + ball.radius * normal;
    let p12 = cushion.p1 - ball.radius * normal;
    let p21 = cushion.p2 + ball.radius * normal;
    let p22 = cushion.p2 - ball.radius * normal;

    let t = roll_time(state, friction);
    let stop = state.r + state.v * t
        - 0.5 * friction.rolling * friction.gravity * t * t * v_hat;

    !segments_intersect(&state.r, &stop, &p11, &p21)
        && !segments_intersect(&state.r, &stop, &p12, &p22)
}

/// Time until a ball contacts a linear cushion segment, or `+∞`.
///
/// The signed distance to the cushion line is linear in position, so each
/// approach side yields a quadratic in `t`. Candidate roots are validated
/// by trial-evolving the ball and requiring the contact to project within
/// the segment span.
pub fn ball_linear_cushion_collision_time(
    state: &BallState,
    motion: MotionState,
    cushion: &LinearCushion,
    ball: &BallParams,
    friction: &FrictionParams,
) -> Result<f64> {
    if skip_ball_linear_cushion_collision(state, motion, cushion, ball, friction) {
        return Ok(f64::INFINITY);
    }

    let tc = trajectory_coeffs(state, motion, ball, friction)?;
    let (lx, ly, l0) = cushion.line_coeffs();

    let a = lx * tc.ax + ly * tc.ay;
    let b = lx * tc.bx + ly * tc.by;
    let c0 = l0 + lx * tc.cx + ly * tc.cy;

    // (lx, ly) is unit length, so contact sits at signed distance ±R.
    let mut roots: [Complex64; 4] = [Complex64::new(f64::NAN, f64::NAN); 4];
    match cushion.side {
        CushionSide::Positive => {
            roots[..2].copy_from_slice(&quadratic_roots(a, b, c0 + ball.radius));
        }
        CushionSide::Negative => {
            roots[..2].copy_from_slice(&quadratic_roots(a, b, c0 - ball.radius));
        }
        CushionSide::Both => {
            roots[..2].copy_from_slice(&quadratic_roots(a, b, c0 + ball.radius));
            roots[2..].copy_from_slice(&quadratic_roots(a, b, c0 - ball.radius));
        }
    }

    let mut best = f64::INFINITY;
    for root in &roots {
        if root.im.abs() > TOL || root.re <= TOL || root.re >= best {
            continue;
        }
        // Reject contacts beyond the segment endpoints: evolve to the
        // candidate time and project onto the span.
        let (trial, _) = evolve_state_motion(motion, state, ball, friction, root.re)?;
        let fraction = cushion.span_fraction(&trial.r);
        if (0.0..=1.0).contains(&fraction) {
            best = root.re;
        }
    }
    Ok(best)
}

/// Time until a ball contacts a circular cushion segment (center distance
/// `r + R`), or `+∞`.
pub fn ball_circular_cushion_collision_time(
    state: &BallState,
    motion: MotionState,
    cushion: &CircularCushion,
    ball: &BallParams,
    friction: &FrictionParams,
) -> Result<f64> {
    if !motion.is_translating() {
        return Ok(f64::INFINITY);
    }
    let reach = cushion.radius + ball.radius;
    circular_contact_time(state, motion, &cushion.center, reach, ball, friction)
}

/// Time until a ball's center crosses a pocket radius, or `+∞`.
///
/// Reaching the pocket is terminal; no impulse is ever computed for it.
pub fn ball_pocket_collision_time(
    state: &BallState,
    motion: MotionState,
    pocket: &Pocket,
    ball: &BallParams,
    friction: &FrictionParams,
) -> Result<f64> {
    if !motion.is_translating() {
        return Ok(f64::INFINITY);
    }
    circular_contact_time(state, motion, &pocket.center, pocket.radius, ball, friction)
}

/// Shared quartic for "distance from trajectory to a fixed center equals
/// `reach`".
fn circular_contact_time(
    state: &BallState,
    motion: MotionState,
    center: &Vec3,
    reach: f64,
    ball: &BallParams,
    friction: &FrictionParams,
) -> Result<f64> {
    let tc = trajectory_coeffs(state, motion, ball, friction)?;
    let (a, b) = (center.x, center.y);

    let qa = 0.5 * (tc.ax * tc.ax + tc.ay * tc.ay);
    let qb = tc.ax * tc.bx + tc.ay * tc.by;
    let qc = tc.ax * (tc.cx - a) + tc.ay * (tc.cy - b) + 0.5 * (tc.bx * tc.bx + tc.by * tc.by);
    let qd = tc.bx * (tc.cx - a) + tc.by * (tc.cy - b);
    let qe = 0.5 * (a * a + b * b + tc.cx * tc.cx + tc.cy * tc.cy - reach * reach)
        - (tc.cx * a + tc.cy * b);

    Ok(min_future_root(&quartic_roots(qa, qb, qc, qd, qe)))
}

/// Earliest ball-ball collision across all pairs, searched in parallel.
///
/// Every query only reads ball states; the minimum is reduced serially
/// afterward. Returns the `(i, j)` pair indices with the smallest finite
/// collision time, or `None` when no pair collides.
pub fn next_ball_ball_collision(
    balls: &[(BallState, MotionState)],
    ball: &BallParams,
    friction: &FrictionParams,
) -> Result<Option<((usize, usize), f64)>> {
    let pairs: Vec<(usize, usize)> = (0..balls.len())
        .flat_map(|i| ((i + 1)..balls.len()).map(move |j| (i, j)))
        .collect();

    let times = pairs
        .par_iter()
        .map(|&(i, j)| {
            let (s1, m1) = &balls[i];
            let (s2, m2) = &balls[j];
            ball_ball_collision_time(s1, s2, *m1, *m2, ball, ball, friction)
                .map(|t| ((i, j), t))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(times
        .into_iter()
        .filter(|(_, t)| t.is_finite())
        .min_by(|x, y| x.1.total_cmp(&y.1)))
}
