//! A punching bag hanging from a fixed pivot.
//!
//! The swing is simulated by `sim-physics`; this binary hosts it in a bevy
//! app, one pivot entity per configured bag.
//!
//! Notably, we use Y-up right handed, the same as bevy.

// Recommended alias.
extern crate nalgebra as na;

use bevy::prelude::*;

mod bag;
mod config;
mod snapshot;
mod ui;

use bag::BagPlugin;
use config::SwingConfig;
use ui::UiPlugin;

fn main() -> anyhow::Result<()> {
    let config = SwingConfig::from_args()?;

    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(Time::<Fixed>::from_hz(config.fixed_hz))
        .insert_resource(config)
        .add_plugins((BagPlugin, UiPlugin))
        .run();

    Ok(())
}
