//! Scene configuration.
//!
//! Everything has a default, so a config file only needs to name what it
//! changes. An empty `bags` list is fine: nothing swings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use bevy::prelude::*;
use na::Vector3;
use serde::{Deserialize, Serialize};
use sim_physics::{IntegrationMode, OrientationState, SimulationParams};

/// Looked for when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "assets/swing.json";

#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingConfig {
    /// Physics tick rate, Hz.
    pub fixed_hz: f64,
    /// Where bag states are saved and restored, if anywhere.
    pub snapshot: Option<PathBuf>,
    /// Angular velocity a punch adds, rad/s.
    pub punch: f64,
    pub bags: Vec<BagConfig>,
    /// The file this was read from. `None` means built-in defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for SwingConfig {
    fn default() -> Self {
        SwingConfig {
            fixed_hz: 60.0,
            snapshot: None,
            punch: 3.0,
            bags: vec![BagConfig::default()],
            source: None,
        }
    }
}

/// One hanging body.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BagConfig {
    pub name: String,
    pub params: SimulationParams,
    /// Axis of the initial displacement.
    pub tilt_axis: Vector3<f64>,
    /// Initial displacement, radians.
    pub tilt_angle: f64,
    /// Pivot position in the scene.
    pub offset: [f32; 3],
}

impl Default for BagConfig {
    fn default() -> Self {
        BagConfig {
            name: "bag".to_string(),
            params: SimulationParams::default(),
            tilt_axis: Vector3::x(),
            tilt_angle: 0.3,
            offset: [0.0, 0.0, 0.0],
        }
    }
}

impl BagConfig {
    /// The state this bag starts in, and returns to on reset.
    pub fn initial_state(&self) -> OrientationState {
        if self.tilt_angle == 0.0 {
            return OrientationState::at_rest();
        }
        OrientationState::from_axis_angle(&na::Unit::new_normalize(self.tilt_axis), self.tilt_angle)
    }

    fn validate(&self) -> Result<()> {
        let p = &self.params;
        ensure!(p.length > 0.0, "bag {:?}: length must be positive", self.name);
        ensure!(
            p.damping > 0.0 && p.damping <= 1.0,
            "bag {:?}: damping must be in (0, 1], got {}",
            self.name,
            p.damping
        );
        if let Some(max_dt) = p.max_dt {
            ensure!(max_dt > 0.0, "bag {:?}: max_dt must be positive", self.name);
        }
        if let IntegrationMode::SpringApproximation { restoring } = p.mode {
            ensure!(
                restoring > 0.0,
                "bag {:?}: spring restoring constant must be positive",
                self.name
            );
        }
        ensure!(
            self.tilt_angle == 0.0 || self.tilt_axis.norm() > 1e-9,
            "bag {:?}: tilt axis must be non-zero",
            self.name
        );
        Ok(())
    }
}

impl SwingConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: SwingConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config =
            Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// `swingsim [CONFIG]`. With no argument, [`DEFAULT_CONFIG_PATH`] if it
    /// exists, otherwise the defaults.
    pub fn from_args() -> Result<Self> {
        match std::env::args_os().nth(1) {
            Some(path) => Self::load(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.fixed_hz > 0.0, "fixed_hz must be positive");
        for bag in &self.bags {
            bag.validate()?;
        }
        Ok(())
    }
}
