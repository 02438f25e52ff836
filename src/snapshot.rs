//! Saving and restoring bag states.
//!
//! A snapshot is a CBOR list with one `[qx, qy, qz, qw, wx, wy, wz]` entry per
//! bag, in config order.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use sim_physics::OrientationState;

pub fn save(path: &Path, states: &[OrientationState]) -> Result<()> {
    let packed: Vec<[f64; 7]> = states.iter().map(OrientationState::to_array).collect();
    let file =
        File::create(path).with_context(|| format!("creating snapshot {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_cbor::to_writer(&mut writer, &packed)
        .with_context(|| format!("writing snapshot {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// `Ok(None)` when there is no snapshot yet.
pub fn load(path: &Path) -> Result<Option<Vec<OrientationState>>> {
    if !path.exists() {
        return Ok(None);
    }
    let file = File::open(path).with_context(|| format!("opening snapshot {}", path.display()))?;
    let packed: Vec<[f64; 7]> = serde_cbor::from_reader(file)
        .with_context(|| format!("decoding snapshot {}", path.display()))?;
    let states = packed
        .into_iter()
        .enumerate()
        .map(|(slot, values)| {
            OrientationState::from_array(values).ok_or_else(|| {
                anyhow!(
                    "snapshot {} slot {slot}: degenerate or non-finite state {values:?}",
                    path.display()
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(states))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_restore() {
        let path = std::env::temp_dir().join(format!("swingsim-{}.cbor", std::process::id()));
        let mut punched = OrientationState::from_axis_angle(&na::Vector3::z_axis(), 0.2);
        punched.apply_impulse(na::Vector3::new(3.0, 0.0, 0.0));
        let states = vec![OrientationState::at_rest(), punched];

        save(&path, &states).unwrap();
        let restored = load(&path).unwrap().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0], states[0]);
        assert_eq!(restored[1].angular_velocity, states[1].angular_velocity);
        approx::assert_relative_eq!(
            restored[1].orientation,
            states[1].orientation,
            epsilon = 1e-12
        );
    }

    #[test]
    fn zero_quaternion_is_rejected() {
        let path = std::env::temp_dir().join(format!("swingsim-zero-{}.cbor", std::process::id()));
        let packed: Vec<[f64; 7]> = vec![[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0], [0.0; 7]];
        serde_cbor::to_writer(File::create(&path).unwrap(), &packed).unwrap();

        let err = load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(format!("{err:#}").contains("slot 1"), "{err:#}");
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join("swingsim-does-not-exist.cbor");
        assert!(load(&path).unwrap().is_none());
    }
}
