#![warn(missing_docs)]

//! Event-based billiards physics for the baize simulator.
//!
//! Balls move under closed-form friction dynamics between events, so the
//! simulation advances by jumping to the next event time rather than
//! stepping a fixed clock. This crate supplies the three pieces that
//! make that work:
//!
//! # Features
//!
//! - Analytic motion evolution for sliding, rolling and spinning balls
//! - Collision-time solvers (quartic/quadratic) for ball-ball, cushion
//!   and pocket events
//! - Instantaneous collision resolution, including the Han (2005)
//!   cushion impulse model
//! - A cue-strike model mapping stroke parameters to post-impact state
//!
//! # Example
//!
//! ```ignore
//! use baize_physics::{
//!     cue_strike, evolve_ball_motion, slide_time, BallParams, BallState,
//!     FrictionParams, MotionState,
//! };
//! use baize_math::Vec3;
//!
//! let ball = BallParams::new(0.028575, 0.170097)?;
//! let friction = FrictionParams::new(0.2, 0.022, 0.01, 9.81)?;
//!
//! let (v, w) = cue_strike(&ball, 0.567, 2.0, 0.0, 0.0, 0.0, 0.0)?;
//! let state = BallState { r: Vec3::zeros(), v, w };
//!
//! // Jump straight to the end of the sliding phase.
//! let t = slide_time(&state, &ball, &friction);
//! let (rolling, motion) =
//!     evolve_ball_motion(MotionState::Sliding, &state, &ball, &friction, t)?;
//! assert_eq!(motion, MotionState::Rolling);
//! ```

mod error;
mod events;
mod evolve;
mod resolve;
mod state;
mod strike;

pub use error::{PhysicsError, Result};
pub use events::{
    ball_ball_collision_time, ball_circular_cushion_collision_time,
    ball_linear_cushion_collision_time, ball_pocket_collision_time, next_ball_ball_collision,
    skip_ball_ball_collision, skip_ball_linear_cushion_collision,
};
pub use evolve::{
    evolve_ball_motion, evolve_roll_state, evolve_slide_state, evolve_spin_component,
    evolve_spin_state, evolve_state_motion, roll_time, slide_time, spin_time,
};
pub use resolve::{
    ball_cushion_friction, ball_cushion_restitution, resolve_ball_ball_collision,
    resolve_ball_cushion_collision, resolve_ball_pocket_collision,
};
pub use state::{
    ball_energy, balls_overlap, BallParams, BallState, CircularCushion, CushionParams,
    CushionSide, FrictionParams, LinearCushion, MotionState, Pocket,
};
pub use strike::{cue_strike, ENGLISH_FRACTION};
