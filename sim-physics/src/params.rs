//! Per-scene simulation parameters.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Which update rule [`crate::step`] applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum IntegrationMode {
    #[default]
    /// Torque from the cross product of local down and world down, applied
    /// through quaternion composition.
    TorqueAccurate,
    /// Negative feedback spring on the swing angles about X and Z, integrated
    /// directly on the angles. Twist about the hanging Y axis is free.
    SpringApproximation {
        /// Per-tick spring constant.
        restoring: f64,
    },
}

impl IntegrationMode {
    pub fn spring() -> Self {
        IntegrationMode::SpringApproximation { restoring: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq, Component, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Gravitational acceleration, m/s^2.
    pub gravity: f64,
    /// Effective pendulum arm, m. Longer arms restore more slowly.
    pub length: f64,
    /// Multiplicative decay applied to the angular velocity each tick, in (0, 1].
    pub damping: f64,
    pub mode: IntegrationMode,
    /// Upper bound on a single timestep. `None` integrates whatever the host
    /// hands us.
    pub max_dt: Option<f64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            gravity: 9.82,
            length: 2.0,
            damping: 0.98,
            mode: IntegrationMode::default(),
            max_dt: None,
        }
    }
}

impl SimulationParams {
    pub fn new(gravity: f64, length: f64, damping: f64) -> Self {
        Self {
            gravity,
            length,
            damping,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: IntegrationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_dt(mut self, max_dt: f64) -> Self {
        self.max_dt = Some(max_dt);
        self
    }

    /// gravity / length: torque per unit of swing.
    #[inline]
    pub fn restoring_rate(&self) -> f64 {
        self.gravity / self.length
    }

    /// The timestep actually integrated for a host delta of `dt`.
    #[inline]
    pub fn effective_dt(&self, dt: f64) -> f64 {
        match self.max_dt {
            Some(max_dt) => dt.min(max_dt),
            None => dt,
        }
    }
}
