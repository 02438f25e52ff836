//! Pendulum physics for a body hanging from a fixed pivot.
//!
//! The body has no position to speak of, only an orientation relative to its
//! rest pose and an angular velocity. Gravity swings it back towards rest and
//! damping bleeds the motion off. Everything here is Y-up, with world down
//! being (0, -1, 0).

extern crate nalgebra as na;

mod integrator;
mod params;
mod state;

pub use integrator::{SETTLE_EPSILON, TORQUE_EPSILON, step};
pub use params::{IntegrationMode, SimulationParams};
pub use state::{OrientationState, world_down};
