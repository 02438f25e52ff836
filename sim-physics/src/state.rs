//! Orientation state of a body hanging from a fixed pivot.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::SimulationParams;

/// Stored quaternions shorter than this are rejected rather than normalized.
const MIN_QUATERNION_NORM: f64 = 1e-6;

/// World "down". The simulation is Y-up, the same as bevy.
pub fn world_down() -> na::Vector3<f64> {
    na::Vector3::new(0.0, -1.0, 0.0)
}

/// Rotation of the hanging body relative to its rest pose, together with the
/// angular velocity that drives it.
#[derive(Debug, Clone, PartialEq, Component, Serialize, Deserialize)]
pub struct OrientationState {
    /// Orientation: rest pose -> current pose.
    pub orientation: na::UnitQuaternion<f64>,
    /// Angular velocity in WORLD frame, rad/s.
    pub angular_velocity: na::Vector3<f64>,
}

impl Default for OrientationState {
    fn default() -> Self {
        Self::at_rest()
    }
}

impl OrientationState {
    pub fn new(orientation: na::UnitQuaternion<f64>, angular_velocity: na::Vector3<f64>) -> Self {
        Self {
            orientation,
            angular_velocity,
        }
    }

    /// Hanging straight down, not moving.
    pub fn at_rest() -> Self {
        Self::new(na::UnitQuaternion::identity(), na::Vector3::zeros())
    }

    /// Start displaced by `angle` radians about `axis`, not moving.
    pub fn from_axis_angle(axis: &na::Unit<na::Vector3<f64>>, angle: f64) -> Self {
        Self::new(
            na::UnitQuaternion::from_axis_angle(axis, angle),
            na::Vector3::zeros(),
        )
    }

    /// Advance by one tick. See [`crate::step`].
    pub fn step(&mut self, params: &SimulationParams, dt: f64) {
        crate::step(self, params, dt);
    }

    /// The body's own down axis, expressed in world.
    pub fn local_down(&self) -> na::Vector3<f64> {
        self.orientation.transform_vector(&world_down())
    }

    /// Swing angle: how far local down is from world down, in radians.
    ///
    /// Twist about the hanging axis does not count.
    pub fn tilt(&self) -> f64 {
        self.local_down().angle(&world_down())
    }

    /// Total rotation angle away from rest, twist included.
    pub fn angle_from_rest(&self) -> f64 {
        self.orientation.angle()
    }

    /// Magnitude of the angular velocity, rad/s.
    pub fn speed(&self) -> f64 {
        self.angular_velocity.norm()
    }

    /// Add an instantaneous change of angular velocity, e.g. a punch.
    pub fn apply_impulse(&mut self, delta_omega: na::Vector3<f64>) {
        self.angular_velocity += delta_omega;
    }

    /// Flatten to `[qx, qy, qz, qw, wx, wy, wz]`.
    pub fn to_array(&self) -> [f64; 7] {
        let q = self.orientation.quaternion();
        let w = &self.angular_velocity;
        [q.i, q.j, q.k, q.w, w.x, w.y, w.z]
    }

    /// Inverse of [`Self::to_array`]. The quaternion part is normalized on
    /// the way in, so slightly drifted stored values are accepted.
    ///
    /// `None` for non-finite values or a quaternion too short to normalize.
    pub fn from_array(values: [f64; 7]) -> Option<Self> {
        if values.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let [qx, qy, qz, qw, wx, wy, wz] = values;
        let orientation =
            na::UnitQuaternion::try_new(na::Quaternion::new(qw, qx, qy, qz), MIN_QUATERNION_NORM)?;
        Some(Self::new(orientation, na::Vector3::new(wx, wy, wz)))
    }
}
