//! The basic UI.
//!
//! A text overlay with the state of every bag and the key bindings.

use bevy::prelude::*;
use sim_physics::{IntegrationMode, OrientationState, SimulationParams};

use crate::bag::Bag;

#[derive(Component)]
pub struct InfoText;

#[derive(Default)]
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_ui);
        app.add_systems(Update, update_ui);
    }
}

fn setup_ui(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            bottom: px(5.0),
            left: px(5.0),
            ..default()
        },
        Name::new("Info Text"),
        InfoText,
    ));
}

fn update_ui(
    mut text: Query<&mut Text, With<InfoText>>,
    bags: Query<(&Bag, &Name, &OrientationState, &SimulationParams)>,
) {
    let Ok(mut text) = text.single_mut() else {
        return;
    };

    let mut rows: Vec<_> = bags.iter().collect();
    rows.sort_by_key(|(bag, _, _, _)| bag.index);

    let mut message = String::new();
    for (_bag, name, state, params) in rows {
        message.push_str(&bag_line(name.as_str(), state, params));
        message.push('\n');
    }
    message.push_str("Space: punch   R: reset   P: save snapshot");
    **text = message;
}

fn bag_line(name: &str, state: &OrientationState, params: &SimulationParams) -> String {
    let mode = match params.mode {
        IntegrationMode::TorqueAccurate => "torque",
        IntegrationMode::SpringApproximation { .. } => "spring",
    };
    format!(
        "{name:>8}: tilt {:6.3} rad  speed {:6.3} rad/s  [{mode}]",
        state.tilt(),
        state.speed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_names_the_mode() {
        let state = OrientationState::at_rest();
        let params = SimulationParams::default().with_mode(IntegrationMode::spring());
        let line = bag_line("tag", &state, &params);
        assert!(line.contains("tag"));
        assert!(line.contains("tilt  0.000"));
        assert!(line.ends_with("[spring]"));
    }

    #[test]
    fn overlay_lists_bags_by_name() {
        use bevy::ecs::system::RunSystemOnce;

        let mut world = World::new();
        world.spawn((Text::new(""), InfoText));
        for (index, name) in [(1, "tag"), (0, "bag")] {
            world.spawn((
                Name::new(name),
                Bag {
                    index,
                    initial: OrientationState::at_rest(),
                },
                OrientationState::at_rest(),
                SimulationParams::default(),
            ));
        }

        world.run_system_once(update_ui).unwrap();

        let mut texts = world.query_filtered::<&Text, With<InfoText>>();
        let text = texts.single(&world).unwrap();
        let lines: Vec<_> = text.0.lines().collect();
        assert!(lines[0].trim_start().starts_with("bag:"), "{lines:?}");
        assert!(lines[1].trim_start().starts_with("tag:"), "{lines:?}");
    }
}
