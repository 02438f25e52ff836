//! Per-tick pendulum update.
//!
//! Gravity pulls the body's local down axis back towards world down, the
//! resulting torque is integrated into the angular velocity, the velocity is
//! damped, and the orientation is advanced by the velocity.

use crate::{IntegrationMode, OrientationState, SimulationParams, state::world_down};

/// Below this swing (|down x world_down|) no torque is applied.
pub const TORQUE_EPSILON: f64 = 0.001;

/// Below this angular speed the orientation is left alone, which lets the
/// body settle instead of jittering.
pub const SETTLE_EPSILON: f64 = 0.001;

/// Advance `state` by one tick of `dt` seconds.
///
/// The caller guarantees `dt > 0`, `params.length > 0` and
/// `params.damping` in (0, 1]. These are checked in debug builds only.
pub fn step(state: &mut OrientationState, params: &SimulationParams, dt: f64) {
    debug_assert!(dt > 0.0, "timestep must be positive, got {dt}");
    debug_assert!(
        params.length > 0.0,
        "pendulum length must be positive, got {}",
        params.length
    );
    debug_assert!(
        params.damping > 0.0 && params.damping <= 1.0,
        "damping must be in (0, 1], got {}",
        params.damping
    );

    let dt = params.effective_dt(dt);
    match params.mode {
        IntegrationMode::TorqueAccurate => torque_step(state, params, dt),
        IntegrationMode::SpringApproximation { restoring } => {
            spring_step(state, params.damping, restoring, dt)
        }
    }
}

fn torque_step(state: &mut OrientationState, params: &SimulationParams, dt: f64) {
    // ---- Torque from the swing ----
    let axis = state.local_down().cross(&world_down());
    let swing = axis.norm();
    if swing > TORQUE_EPSILON {
        let torque = params.restoring_rate() * swing;
        state.angular_velocity += (axis / swing) * (torque * dt);
    }

    // ---- Damping, every tick ----
    state.angular_velocity *= params.damping;

    // ---- Rotate by ω dt ----
    if let Some(dq) = exp_quat(&state.angular_velocity, dt) {
        state.orientation = dq * state.orientation;
        state.orientation.renormalize();
    }
}

fn spring_step(state: &mut OrientationState, damping: f64, restoring: f64, dt: f64) {
    // Y is the hanging axis: the spring acts on the swing only, never the twist.
    let (mut swing, mut twist) = swing_twist(&state.orientation);

    state.angular_velocity.x -= swing.x * restoring;
    state.angular_velocity.z -= swing.z * restoring;
    state.angular_velocity *= damping;

    swing.x += state.angular_velocity.x * dt;
    swing.z += state.angular_velocity.z * dt;
    twist += state.angular_velocity.y * dt;
    state.orientation =
        na::UnitQuaternion::from_scaled_axis(na::Vector3::new(swing.x, 0.0, swing.z))
            * na::UnitQuaternion::from_axis_angle(&na::Vector3::y_axis(), twist);
}

/// Split `q` into `swing * twist`, with the twist about Y and the swing about
/// an axis in the XZ plane.
///
/// Returns the swing as a rotation vector (y is ~0) and the twist angle in
/// (-pi, pi].
fn swing_twist(q: &na::UnitQuaternion<f64>) -> (na::Vector3<f64>, f64) {
    let (w, j) = if q.w < 0.0 { (-q.w, -q.j) } else { (q.w, q.j) };
    // A half-turn swing has no recoverable twist.
    if w.hypot(j) < 1e-12 {
        return (q.scaled_axis(), 0.0);
    }
    let twist = 2.0 * j.atan2(w);
    let swing = q * na::UnitQuaternion::from_axis_angle(&na::Vector3::y_axis(), -twist);
    (swing.scaled_axis(), twist)
}

/// Incremental rotation for angular velocity `omega` held for `dt`.
///
/// Returns `None` when the speed is under [`SETTLE_EPSILON`].
fn exp_quat(omega: &na::Vector3<f64>, dt: f64) -> Option<na::UnitQuaternion<f64>> {
    let speed = omega.norm();
    if speed > SETTLE_EPSILON {
        let axis = na::Unit::new_unchecked(omega / speed);
        Some(na::UnitQuaternion::from_axis_angle(&axis, speed * dt))
    } else {
        None
    }
}
