//! The hanging bags.
//!
//! Each bag is a pivot entity carrying its [`OrientationState`] and
//! [`SimulationParams`], with the visible mesh as a child hanging below the
//! pivot. Physics runs in `FixedUpdate`; the transform is posed in `Update`.

use bevy::prelude::*;
use sim_physics::{OrientationState, SimulationParams};

use crate::{config::SwingConfig, snapshot};

#[derive(Component, Debug)]
pub struct Bag {
    /// Position in the config's bag list, which is also its snapshot slot.
    pub index: usize,
    /// Where `R` puts it back.
    pub initial: OrientationState,
}

/// Plugin to spawn the configured bags and keep them swinging.
#[derive(Default)]
pub struct BagPlugin;

impl Plugin for BagPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_bags);
        app.add_systems(FixedUpdate, swing_bags);
        app.add_systems(Update, (bag_keys, pose_bags).chain());
    }
}

fn setup_bags(
    config: Res<SwingConfig>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    match &config.source {
        Some(path) => info!("Scene config from {}", path.display()),
        None => info!("No scene config, using defaults"),
    }

    let restored = restore_states(&config);

    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.12, 0.1),
        perceptual_roughness: 0.85,
        reflectance: 0.02,
        ..default()
    });

    for (index, bag) in config.bags.iter().enumerate() {
        let initial = bag.initial_state();
        let state = restored
            .get(index)
            .cloned()
            .unwrap_or_else(|| initial.clone());

        let length = bag.params.length as f32;
        let radius = (length * 0.15).min(0.35);
        let [x, y, z] = bag.offset;

        info!(
            "Spawning bag {:?}: {:?}, length {} m, tilt {:.3} rad",
            bag.name,
            bag.params.mode,
            bag.params.length,
            state.tilt()
        );

        commands
            .spawn((
                Name::new(bag.name.clone()),
                Transform::from_xyz(x, y, z).with_rotation(sim_quat_to_bevy(&state.orientation)),
                Visibility::default(),
                state,
                bag.params.clone(),
                Bag { index, initial },
            ))
            .with_child((
                Mesh3d(meshes.add(Capsule3d::new(radius, (length - 2.0 * radius).max(0.01)))),
                MeshMaterial3d(material.clone()),
                Transform::from_xyz(0.0, -length / 2.0, 0.0),
            ));
    }

    commands.spawn((
        PointLight {
            intensity: 2_500_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 6.0, 4.0),
        Name::new("Light"),
    ));

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(2.0, -1.0, 6.0).looking_at(Vec3::new(0.0, -1.0, 0.0), Vec3::Y),
        Name::new("Camera"),
    ));
}

/// States from the snapshot file, if one is configured and readable.
fn restore_states(config: &SwingConfig) -> Vec<OrientationState> {
    let Some(path) = &config.snapshot else {
        return Vec::new();
    };
    match snapshot::load(path) {
        Ok(Some(states)) => {
            if states.len() != config.bags.len() {
                warn!(
                    "Snapshot has {} states for {} bags, extra bags start fresh",
                    states.len(),
                    config.bags.len()
                );
            }
            info!("Restored {} bag states from {}", states.len(), path.display());
            states
        }
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!("Ignoring snapshot: {err:#}");
            Vec::new()
        }
    }
}

/// Simulate the pendulum physics.
fn swing_bags(time: Res<Time>, mut query: Query<(&mut OrientationState, &SimulationParams)>) {
    let dt = time.delta_secs_f64();
    if dt <= 0.0 {
        return;
    }

    for (mut state, params) in query.iter_mut() {
        let effective = params.effective_dt(dt);
        if effective < dt {
            debug!("Clamping timestep {dt:.4} s to {effective:.4} s");
        }
        state.step(params, dt);
    }
}

/// Copy the simulated orientation onto the bevy Transform.
fn pose_bags(mut query: Query<(&OrientationState, &mut Transform), Changed<OrientationState>>) {
    for (state, mut transform) in query.iter_mut() {
        transform.rotation = sim_quat_to_bevy(&state.orientation);
    }
}

fn bag_keys(
    kb: Res<ButtonInput<KeyCode>>,
    config: Res<SwingConfig>,
    mut query: Query<(&Bag, &mut OrientationState)>,
) {
    if kb.just_pressed(KeyCode::Space) {
        for (_bag, mut state) in query.iter_mut() {
            state.apply_impulse(punch_impulse(config.punch));
        }
    }

    if kb.just_pressed(KeyCode::KeyR) {
        for (bag, mut state) in query.iter_mut() {
            *state = bag.initial.clone();
        }
    }

    if kb.just_pressed(KeyCode::KeyP) {
        let Some(path) = &config.snapshot else {
            warn!("No snapshot path configured");
            return;
        };

        let mut slots: Vec<_> = query
            .iter()
            .map(|(bag, state)| (bag.index, state.clone()))
            .collect();
        slots.sort_by_key(|(index, _)| *index);
        let states: Vec<_> = slots.into_iter().map(|(_, state)| state).collect();

        match snapshot::save(path, &states) {
            Ok(()) => info!("Saved {} bag states to {}", states.len(), path.display()),
            Err(err) => warn!("Snapshot failed: {err:#}"),
        }
    }
}

/// Angular velocity added by a punch of `strength` rad/s.
///
/// The camera is on the +Z side, so the bottom swings away towards -Z, which
/// is a positive rotation about X.
pub fn punch_impulse(strength: f64) -> na::Vector3<f64> {
    na::Vector3::x() * strength
}

/// Convert a nalgebra quaternion (f64) to a bevy quaternion (f32). The sim is
/// Y-up like bevy, so there is no basis change.
pub fn sim_quat_to_bevy(q: &na::UnitQuaternion<f64>) -> Quat {
    Quat::from_array([q.i as f32, q.j as f32, q.k as f32, q.w as f32]).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bevy_quat_rotates_the_same() {
        let state = OrientationState::from_axis_angle(
            &na::Unit::new_normalize(na::Vector3::new(1.0, 0.3, -0.4)),
            0.7,
        );
        let down = state.local_down();
        let bevy_down = sim_quat_to_bevy(&state.orientation) * Vec3::NEG_Y;

        assert!((bevy_down.x - down.x as f32).abs() < 1e-6);
        assert!((bevy_down.y - down.y as f32).abs() < 1e-6);
        assert!((bevy_down.z - down.z as f32).abs() < 1e-6);
    }

    #[test]
    fn punch_swings_away_from_camera() {
        let params = SimulationParams::default();
        let mut state = OrientationState::at_rest();
        state.apply_impulse(punch_impulse(3.0));
        assert_eq!(state.angular_velocity, na::Vector3::new(3.0, 0.0, 0.0));

        for _ in 0..10 {
            state.step(&params, 1.0 / 60.0);
        }
        let down = state.local_down();
        assert!(down.z < 0.0, "bottom moved to {down:?}");
        assert!(down.x.abs() < 1e-12);
    }
}
