//! Headless settle trace.
//!
//! Tilts a 1.5 m pendulum by 0.3 rad about X and lets it hang for ten seconds
//! at 60 Hz, once with each integration mode, printing the swing every half
//! second. Both should have come to rest by the end.

extern crate nalgebra as na;

use sim_physics::{IntegrationMode, OrientationState, SimulationParams};

const DT: f64 = 1.0 / 60.0;
const STEPS: usize = 600;

fn main() {
    for mode in [IntegrationMode::TorqueAccurate, IntegrationMode::spring()] {
        let params = SimulationParams::new(9.82, 1.5, 0.98).with_mode(mode);
        let mut state = OrientationState::from_axis_angle(&na::Vector3::x_axis(), 0.3);

        println!("{mode:?}");
        for i in 1..=STEPS {
            state.step(&params, DT);
            if i % 30 == 0 {
                println!(
                    "Time: {:6.3} s Tilt: {:+.5} rad, Speed: {:.5} rad/s",
                    i as f64 * DT,
                    signed_tilt(&state),
                    state.speed(),
                );
            }
        }

        let settled = state.speed() < 0.01 && state.angle_from_rest() < 0.05;
        println!("Settled: {settled}\n");
    }
}

/// Tilt with the sign of the swing about X, so the oscillation is visible.
fn signed_tilt(state: &OrientationState) -> f64 {
    let down = state.local_down();
    if down.z > 0.0 {
        -state.tilt()
    } else {
        state.tilt()
    }
}
