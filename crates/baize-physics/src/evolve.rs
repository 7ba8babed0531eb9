//! Free-flight evolution of a ball's kinematic state under friction.
//!
//! Each motion regime has a closed-form trajectory; [`evolve_ball_motion`]
//! chains regimes by consuming each one's remaining lifetime, while
//! [`evolve_state_motion`] stays strictly within the current regime so
//! collision-time solvers can ask "where would this ball be at `t` if
//! nothing changed".

use baize_math::{heading, rotate_z, try_unit, Vec3, TOL};

use crate::error::{PhysicsError, Result};
use crate::state::{BallParams, BallState, FrictionParams, MotionState};

/// Time until a sliding ball's contact point stops slipping,
/// `2·|u| / (7·u_s·g)`.
pub fn slide_time(state: &BallState, ball: &BallParams, friction: &FrictionParams) -> f64 {
    2.0 * state.relative_velocity(ball.radius).norm()
        / (7.0 * friction.sliding * friction.gravity)
}

/// Time until a rolling ball comes to rest, `|v| / (u_r·g)`.
pub fn roll_time(state: &BallState, friction: &FrictionParams) -> f64 {
    state.v.norm() / (friction.rolling * friction.gravity)
}

/// Time until perpendicular spin decays to zero, `|w_z|·2R / (5·u_sp·g)`.
pub fn spin_time(state: &BallState, ball: &BallParams, friction: &FrictionParams) -> f64 {
    state.w.z.abs() * 0.4 * ball.radius / (friction.spinning * friction.gravity)
}

/// Evolve a sliding ball by `t`, without checking for the slide-to-roll
/// transition.
pub fn evolve_slide_state(
    state: &BallState,
    ball: &BallParams,
    friction: &FrictionParams,
    t: f64,
) -> Result<BallState> {
    if t == 0.0 {
        return Ok(*state);
    }

    // Work in the ball frame: x along the initial velocity heading.
    let phi = heading(&state.v);
    let b0 = state.rotated(-phi);
    let slip = try_unit(&state.relative_velocity(ball.radius))
        .ok_or(PhysicsError::DegenerateVector("sliding contact velocity"))?;
    let u0 = rotate_z(&slip, -phi);

    let decel = friction.sliding * friction.gravity;
    let r = Vec3::new(
        b0.v.x * t - 0.5 * decel * t * t * u0.x,
        -0.5 * decel * t * t * u0.y,
        0.0,
    );
    let v = b0.v - decel * t * u0;
    let mut w = b0.w - 2.5 / ball.radius * decel * t * u0.cross(&Vec3::z());
    w.z = evolve_spin_component(b0.w.z, ball, friction, t);

    let table = BallState { r, v, w }.rotated(phi);
    Ok(BallState {
        r: table.r + state.r,
        v: table.v,
        w: table.w,
    })
}

/// Evolve a rolling ball by `t`, without checking for the roll-to-spin
/// transition.
///
/// The trajectory is a straight line decelerating at `u_r·g`; the x/y
/// angular velocity stays locked to `v/R` rotated 90°.
pub fn evolve_roll_state(
    state: &BallState,
    ball: &BallParams,
    friction: &FrictionParams,
    t: f64,
) -> Result<BallState> {
    if t == 0.0 {
        return Ok(*state);
    }

    let v_hat =
        try_unit(&state.v).ok_or(PhysicsError::DegenerateVector("rolling velocity"))?;
    let decel = friction.rolling * friction.gravity;

    let r = state.r + state.v * t - 0.5 * decel * t * t * v_hat;
    let v = state.v - decel * t * v_hat;
    let mut w = rotate_z(&(v / ball.radius), std::f64::consts::FRAC_PI_2);
    w.z = evolve_spin_component(state.w.z, ball, friction, t);

    Ok(BallState { r, v, w })
}

/// Decay the z angular velocity toward zero at `5·u_sp·g / (2R)`.
///
/// Clamped so the spin can never overshoot past zero; the sign of `w_z`
/// never flips.
pub fn evolve_spin_component(
    wz: f64,
    ball: &BallParams,
    friction: &FrictionParams,
    t: f64,
) -> f64 {
    if t == 0.0 || wz.abs() < TOL {
        return wz;
    }
    let alpha = 2.5 * friction.spinning * friction.gravity / ball.radius;
    let decay_time = wz.abs() / alpha;
    if t >= decay_time - TOL {
        // The spin cannot decay past zero.
        return 0.0;
    }
    wz - wz.signum() * alpha * t
}

/// Evolve a spinning (non-translating) ball by `t`; only `w_z` changes.
pub fn evolve_spin_state(
    state: &BallState,
    ball: &BallParams,
    friction: &FrictionParams,
    t: f64,
) -> BallState {
    let mut out = *state;
    out.w.z = evolve_spin_component(state.w.z, ball, friction, t);
    out
}

/// Evolve strictly within the current regime, with no transition check.
///
/// Collision-time solvers use this to evaluate a candidate contact time:
/// the trajectory formulas they solve against assume the regime holds for
/// the whole interval.
pub fn evolve_state_motion(
    motion: MotionState,
    state: &BallState,
    ball: &BallParams,
    friction: &FrictionParams,
    t: f64,
) -> Result<(BallState, MotionState)> {
    match motion {
        MotionState::Stationary | MotionState::Pocketed => Ok((*state, motion)),
        MotionState::Sliding => Ok((
            evolve_slide_state(state, ball, friction, t)?,
            MotionState::Sliding,
        )),
        MotionState::Rolling => Ok((
            evolve_roll_state(state, ball, friction, t)?,
            MotionState::Rolling,
        )),
        MotionState::Spinning => Ok((
            evolve_spin_state(state, ball, friction, t),
            MotionState::Spinning,
        )),
    }
}

/// Evolve a ball by `t`, crossing regime boundaries as friction drains
/// each regime.
///
/// When `t` outlasts the current regime, that regime's lifetime is
/// consumed, the state transitions, and the remainder evolves in the next
/// regime. `Stationary` and `Pocketed` are fixed points for any `t`.
pub fn evolve_ball_motion(
    motion: MotionState,
    state: &BallState,
    ball: &BallParams,
    friction: &FrictionParams,
    t: f64,
) -> Result<(BallState, MotionState)> {
    if motion.is_terminal() {
        return Ok((*state, motion));
    }

    let mut state = *state;
    let mut motion = motion;
    let mut t = t;

    if motion == MotionState::Sliding {
        let lifetime = slide_time(&state, ball, friction);
        if t >= lifetime {
            state = evolve_slide_state(&state, ball, friction, lifetime)?;
            motion = MotionState::Rolling;
            t -= lifetime;
        } else {
            return Ok((
                evolve_slide_state(&state, ball, friction, t)?,
                MotionState::Sliding,
            ));
        }
    }

    if motion == MotionState::Rolling {
        let lifetime = roll_time(&state, friction);
        if t >= lifetime {
            state = evolve_roll_state(&state, ball, friction, lifetime)?;
            motion = MotionState::Spinning;
            t -= lifetime;
        } else {
            return Ok((
                evolve_roll_state(&state, ball, friction, t)?,
                MotionState::Rolling,
            ));
        }
    }

    let lifetime = spin_time(&state, ball, friction);
    if t >= lifetime {
        Ok((
            evolve_spin_state(&state, ball, friction, lifetime),
            MotionState::Stationary,
        ))
    } else {
        Ok((
            evolve_spin_state(&state, ball, friction, t),
            MotionState::Spinning,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ball_energy;
    use approx::assert_relative_eq;

    fn ball() -> BallParams {
        BallParams::new(0.028, 0.17).unwrap()
    }

    fn friction() -> FrictionParams {
        FrictionParams::new(0.2, 0.01, 0.01, 9.8).unwrap()
    }

    /// A ball struck dead center: translating with zero angular velocity,
    /// so the contact point slips at full speed.
    fn sliding_state(speed: f64) -> BallState {
        BallState {
            r: Vec3::zeros(),
            v: Vec3::new(speed, 0.0, 0.0),
            w: Vec3::zeros(),
        }
    }

    #[test]
    fn test_terminal_states_are_fixed_points() {
        let state = BallState {
            r: Vec3::new(0.1, 0.2, 0.0),
            v: Vec3::zeros(),
            w: Vec3::zeros(),
        };
        for motion in [MotionState::Stationary, MotionState::Pocketed] {
            for &t in &[0.0, 0.5, 100.0] {
                let (out, m) =
                    evolve_ball_motion(motion, &state, &ball(), &friction(), t).unwrap();
                assert_eq!(out, state);
                assert_eq!(m, motion);
            }
        }
    }

    #[test]
    fn test_slide_becomes_natural_roll() {
        // Dead-center strike: no english, pure sliding. At the end of the
        // slide phase the ball rolls at 5/7 of its initial speed.
        let state = sliding_state(2.0);
        let lifetime = slide_time(&state, &ball(), &friction());
        assert!(lifetime > 0.0);

        let (out, motion) =
            evolve_ball_motion(MotionState::Sliding, &state, &ball(), &friction(), lifetime)
                .unwrap();
        assert_eq!(motion, MotionState::Rolling);
        assert_relative_eq!(out.v.norm(), 2.0 * 5.0 / 7.0, epsilon = 1e-9);
        // Natural roll: w = v/R rotated 90°, i.e. (0, v/R, 0) for v along x.
        assert!(out.relative_velocity(ball().radius).norm() < 1e-9);
        assert_relative_eq!(out.w.y, out.v.x / ball().radius, epsilon = 1e-9);
    }

    #[test]
    fn test_roll_decays_to_spin_then_stationary() {
        let radius = ball().radius;
        let rolling = BallState {
            r: Vec3::zeros(),
            v: Vec3::new(1.0, 0.0, 0.0),
            w: Vec3::new(0.0, 1.0 / radius, 0.0),
        };
        let lifetime = roll_time(&rolling, &friction());
        assert_relative_eq!(lifetime, 1.0 / (0.01 * 9.8), epsilon = 1e-12);

        let (out, motion) =
            evolve_ball_motion(MotionState::Rolling, &rolling, &ball(), &friction(), lifetime)
                .unwrap();
        // No perpendicular spin, so the spin phase has zero lifetime.
        assert_eq!(motion, MotionState::Stationary);
        assert!(out.v.norm() < 1e-9);
    }

    #[test]
    fn test_spin_decay_clamps_at_zero() {
        // w = (0, 0, 10), u_sp = 0.01, g = 9.8, R = 0.028:
        // lifetime = 10 · 2 · 0.028 / (5 · 0.01 · 9.8) ≈ 1.1428 s.
        let state = BallState {
            r: Vec3::zeros(),
            v: Vec3::zeros(),
            w: Vec3::new(0.0, 0.0, 10.0),
        };
        let lifetime = spin_time(&state, &ball(), &friction());
        assert_relative_eq!(lifetime, 10.0 * 2.0 * 0.028 / (5.0 * 0.01 * 9.8), epsilon = 1e-12);

        let (out, motion) =
            evolve_ball_motion(MotionState::Spinning, &state, &ball(), &friction(), lifetime)
                .unwrap();
        assert_eq!(motion, MotionState::Stationary);
        assert_eq!(out.w.z, 0.0);

        // Evolving far past the lifetime must not overshoot negative.
        let (out, _) =
            evolve_ball_motion(MotionState::Spinning, &state, &ball(), &friction(), 50.0)
                .unwrap();
        assert_eq!(out.w.z, 0.0);

        // Negative spin decays upward, also clamped.
        let neg = BallState {
            w: Vec3::new(0.0, 0.0, -10.0),
            ..state
        };
        let (out, _) = evolve_ball_motion(MotionState::Spinning, &neg, &ball(), &friction(), 50.0)
            .unwrap();
        assert_eq!(out.w.z, 0.0);
    }

    #[test]
    fn test_spin_sign_never_flips() {
        let state = BallState {
            r: Vec3::zeros(),
            v: Vec3::zeros(),
            w: Vec3::new(0.0, 0.0, 3.0),
        };
        let mut prev = state.w.z;
        for i in 1..=20 {
            let t = i as f64 * 0.05;
            let (out, _) =
                evolve_state_motion(MotionState::Spinning, &state, &ball(), &friction(), t)
                    .unwrap();
            assert!(out.w.z >= 0.0);
            assert!(out.w.z <= prev + 1e-15);
            prev = out.w.z;
        }
    }

    #[test]
    fn test_energy_monotonic_through_decay_chain() {
        let state = BallState {
            r: Vec3::zeros(),
            v: Vec3::new(2.0, 0.5, 0.0),
            w: Vec3::new(5.0, -3.0, 8.0),
        };
        let mut energies = vec![ball_energy(&state, &ball())];
        let mut current = (state, MotionState::Sliding);

        // Step through each regime boundary and record the energy.
        loop {
            let (st, motion) = current;
            let lifetime = match motion {
                MotionState::Sliding => slide_time(&st, &ball(), &friction()),
                MotionState::Rolling => roll_time(&st, &friction()),
                MotionState::Spinning => spin_time(&st, &ball(), &friction()),
                _ => break,
            };
            current = evolve_ball_motion(motion, &st, &ball(), &friction(), lifetime).unwrap();
            energies.push(ball_energy(&current.0, &ball()));
            if current.1 == motion {
                // Lifetime did not advance the regime; avoid looping forever.
                break;
            }
        }

        assert!(*energies.last().unwrap() < 1e-12);
        for pair in energies.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12);
        }
    }

    #[test]
    fn test_transition_continuity() {
        // Position and velocity must be continuous across the slide-to-roll
        // boundary as t crosses the slide lifetime.
        let state = sliding_state(1.5);
        let lifetime = slide_time(&state, &ball(), &friction());
        let eps = 1e-9;

        let (before, m1) = evolve_ball_motion(
            MotionState::Sliding,
            &state,
            &ball(),
            &friction(),
            lifetime - eps,
        )
        .unwrap();
        let (after, m2) = evolve_ball_motion(
            MotionState::Sliding,
            &state,
            &ball(),
            &friction(),
            lifetime + eps,
        )
        .unwrap();

        assert_eq!(m1, MotionState::Sliding);
        assert_eq!(m2, MotionState::Rolling);
        assert!((after.r - before.r).norm() < 1e-6);
        assert!((after.v - before.v).norm() < 1e-6);
    }

    #[test]
    fn test_evolve_state_motion_ignores_transitions() {
        // Evolving far past the slide lifetime in-regime keeps sliding
        // physics; the velocity keeps decaying along the slip direction.
        let state = sliding_state(1.0);
        let lifetime = slide_time(&state, &ball(), &friction());
        let (out, motion) = evolve_state_motion(
            MotionState::Sliding,
            &state,
            &ball(),
            &friction(),
            2.0 * lifetime,
        )
        .unwrap();
        assert_eq!(motion, MotionState::Sliding);
        assert!(out.v.norm() < state.v.norm());
    }

    #[test]
    fn test_degenerate_roll_velocity_is_an_error() {
        let state = BallState::at_rest(Vec3::zeros());
        let result = evolve_roll_state(&state, &ball(), &friction(), 0.1);
        assert!(matches!(result, Err(PhysicsError::DegenerateVector(_))));
    }
}
