//! Device descriptors and the arm configuration file.
//!
//! A configuration is an ordered list of devices: the base rotor first, then
//! the two levers. Only the levers' lengths and rotation boundaries feed the
//! solver.
//!
//! ```toml
//! [[devices]]
//! device_type = "rotor"
//! order = 1
//!
//! [[devices]]
//! device_type = "lever"
//! order = 2
//! rotation_boundaries = [0, 270]
//! length = 120
//! ```

use crate::error::ConfigError;
use crate::link::LinkSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Index of the first lever in the device list. The second follows it.
pub const FIRST_LEVER_INDEX: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// Rotates the whole working plane about the vertical axis.
    Rotor,
    /// A rigid link driven by a servo at its proximal joint.
    Lever,
}

/// A single device entry of the arm configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub device_type: DeviceType,

    /// Position of the device along the chain, starting at the base.
    pub order: u32,

    /// Servo rotation range in degrees. `None` means unrestricted.
    #[serde(default)]
    pub rotation_boundaries: Option<(f64, f64)>,

    /// Usable sub-range of the servo in degrees. Informational only.
    #[serde(default)]
    pub angle_range: Option<(f64, f64)>,

    /// Link length. Required for levers.
    #[serde(default)]
    pub length: Option<f64>,

    /// Mounting offset of the device.
    #[serde(default)]
    pub static_x: f64,
    #[serde(default)]
    pub static_y: f64,
}

impl DeviceDescriptor {
    pub fn rotor(order: u32) -> Self {
        Self {
            device_type: DeviceType::Rotor,
            order,
            rotation_boundaries: None,
            angle_range: None,
            length: None,
            static_x: 0.0,
            static_y: 0.0,
        }
    }

    pub fn lever(order: u32, length: f64, rotation_boundaries: Option<(f64, f64)>) -> Self {
        Self {
            device_type: DeviceType::Lever,
            order,
            rotation_boundaries,
            angle_range: None,
            length: Some(length),
            static_x: 0.0,
            static_y: 0.0,
        }
    }
}

/// The full device list of an arm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManipulatorConfig {
    pub devices: Vec<DeviceDescriptor>,
}

impl Default for ManipulatorConfig {
    /// A rotor followed by levers of 120 and 135, both limited to 0°..270°.
    fn default() -> Self {
        let mut rotor = DeviceDescriptor::rotor(1);
        rotor.static_x = 45.0;
        rotor.static_y = 50.0;

        let mut lever1 = DeviceDescriptor::lever(2, 120.0, Some((0.0, 270.0)));
        lever1.static_x = 45.0;
        lever1.static_y = 50.0;

        let mut lever2 = DeviceDescriptor::lever(3, 135.0, Some((0.0, 270.0)));
        lever2.angle_range = Some((0.0, 160.0));

        Self {
            devices: vec![rotor, lever1, lever2],
        }
    }
}

impl ManipulatorConfig {
    /// Reads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded arm configuration from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Parses and validates a TOML configuration.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both levers are present with a length and sane boundaries.
    ///
    /// Length positivity is left to the solver, which reports it as
    /// [`KinematicsError::InvalidConfiguration`](crate::KinematicsError::InvalidConfiguration).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for index in FIRST_LEVER_INDEX..FIRST_LEVER_INDEX + 2 {
            let device = self
                .devices
                .get(index)
                .ok_or(ConfigError::MissingDevice(index))?;
            if device.device_type != DeviceType::Lever {
                return Err(ConfigError::NotALever(index));
            }
            if device.length.is_none() {
                return Err(ConfigError::MissingLength(index));
            }
            if let Some((lower, upper)) = device.rotation_boundaries
                && !(lower.is_finite() && upper.is_finite() && lower <= upper)
            {
                return Err(ConfigError::InvalidBoundaries {
                    index,
                    lower,
                    upper,
                });
            }
        }
        Ok(())
    }

    /// Link specs of the two levers, with boundaries converted to radians.
    pub fn link_specs(&self) -> Result<(LinkSpec, LinkSpec), ConfigError> {
        self.validate()?;
        Ok((
            self.lever_spec(FIRST_LEVER_INDEX)?,
            self.lever_spec(FIRST_LEVER_INDEX + 1)?,
        ))
    }

    fn lever_spec(&self, index: usize) -> Result<LinkSpec, ConfigError> {
        let device = self
            .devices
            .get(index)
            .ok_or(ConfigError::MissingDevice(index))?;
        let length = device.length.ok_or(ConfigError::MissingLength(index))?;

        Ok(match device.rotation_boundaries {
            Some((lower, upper)) => LinkSpec::new(length, lower.to_radians(), upper.to_radians()),
            None => LinkSpec::unbounded(length),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARM_TOML: &str = r#"
        [[devices]]
        device_type = "rotor"
        order = 1
        static_x = 45
        static_y = 50

        [[devices]]
        device_type = "lever"
        order = 2
        rotation_boundaries = [0, 270]
        length = 120
        static_x = 45
        static_y = 50

        [[devices]]
        device_type = "lever"
        order = 3
        rotation_boundaries = [0, 270]
        angle_range = [0, 160]
        length = 135
    "#;

    #[test]
    fn parses_default_arm() {
        let config = ManipulatorConfig::from_toml_str(ARM_TOML).unwrap();
        assert_eq!(config, ManipulatorConfig::default());
    }

    #[test]
    fn link_specs_use_radians() {
        let (l1, l2) = ManipulatorConfig::default().link_specs().unwrap();
        assert_eq!(l1.length, 120.0);
        assert_eq!(l2.length, 135.0);
        assert_eq!(l1.angle_lower_bound, 0.0);
        assert_eq!(l2.angle_upper_bound, 270f64.to_radians());
    }

    #[test]
    fn lever_without_boundaries_is_unbounded() {
        let config = ManipulatorConfig {
            devices: vec![
                DeviceDescriptor::rotor(1),
                DeviceDescriptor::lever(2, 10.0, None),
                DeviceDescriptor::lever(3, 10.0, None),
            ],
        };
        let (l1, _) = config.link_specs().unwrap();
        assert_eq!(l1, LinkSpec::unbounded(10.0));
    }

    #[test]
    fn rejects_missing_lever() {
        let config = ManipulatorConfig {
            devices: vec![DeviceDescriptor::rotor(1), DeviceDescriptor::lever(2, 1.0, None)],
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingDevice(2))));
    }

    #[test]
    fn rejects_rotor_in_lever_slot() {
        let config = ManipulatorConfig {
            devices: vec![
                DeviceDescriptor::rotor(1),
                DeviceDescriptor::rotor(2),
                DeviceDescriptor::lever(3, 1.0, None),
            ],
        };
        assert!(matches!(config.validate(), Err(ConfigError::NotALever(1))));
    }

    #[test]
    fn rejects_lever_without_length() {
        let toml = ARM_TOML.replace("length = 135", "");
        assert!(matches!(
            ManipulatorConfig::from_toml_str(&toml),
            Err(ConfigError::MissingLength(2))
        ));
    }

    #[test]
    fn rejects_inverted_boundaries() {
        let toml = ARM_TOML.replacen(
            "rotation_boundaries = [0, 270]",
            "rotation_boundaries = [270, 0]",
            1,
        );
        assert!(matches!(
            ManipulatorConfig::from_toml_str(&toml),
            Err(ConfigError::InvalidBoundaries { index: 1, .. })
        ));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir()
            .join(format!("arm-kinematics-{}.toml", std::process::id()));
        std::fs::write(&path, ARM_TOML).unwrap();

        let config = ManipulatorConfig::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.unwrap(), ManipulatorConfig::default());
    }

    #[test]
    fn load_reports_missing_file() {
        let missing = std::env::temp_dir().join("arm-kinematics-does-not-exist.toml");
        match ManipulatorConfig::load(&missing) {
            Err(ConfigError::Io { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            ManipulatorConfig::from_toml_str("devices = 3"),
            Err(ConfigError::Toml(_))
        ));
    }
}
