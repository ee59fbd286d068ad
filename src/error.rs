//! Error types for kinematic solving and device configuration.

use std::path::PathBuf;

/// Errors produced by the [`KinematicSolver`](crate::KinematicSolver).
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    /// A link length was zero or negative at construction.
    #[error("invalid configuration: link {link} has non-positive length {length}")]
    InvalidConfiguration { link: u8, length: f64 },

    /// The target lies outside the disk of radius `length1 + length2`.
    #[error("unreachable target: distance {distance} exceeds maximum reach {max_reach}")]
    UnreachableTarget { distance: f64, max_reach: f64 },

    /// A solved joint angle falls outside its link's rotation boundaries.
    #[error("joint {joint} angle {angle} rad is outside [{lower}, {upper}] rad")]
    OutOfRange {
        joint: u8,
        angle: f64,
        lower: f64,
        upper: f64,
    },

    /// A target coordinate was NaN or infinite.
    #[error("target coordinates must be finite")]
    NonFiniteTarget,
}

/// Errors that can occur while loading or validating a device configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the TOML content.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The device list has no entry at the given index.
    #[error("missing device at index {0}")]
    MissingDevice(usize),

    /// The device at the given index is expected to be a lever.
    #[error("device at index {0} is not a lever")]
    NotALever(usize),

    /// A lever has no `length` field.
    #[error("lever at index {0} has no length")]
    MissingLength(usize),

    /// Rotation boundaries are not finite or lower > upper.
    #[error("invalid rotation boundaries at index {index}: ({lower}, {upper})")]
    InvalidBoundaries { index: usize, lower: f64, upper: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = KinematicsError::UnreachableTarget {
            distance: 100.0,
            max_reach: 20.0,
        };
        assert_eq!(
            e.to_string(),
            "unreachable target: distance 100 exceeds maximum reach 20"
        );

        let e = KinematicsError::InvalidConfiguration {
            link: 2,
            length: -1.5,
        };
        assert_eq!(
            e.to_string(),
            "invalid configuration: link 2 has non-positive length -1.5"
        );

        let e = ConfigError::MissingLength(1);
        assert_eq!(e.to_string(), "lever at index 1 has no length");
    }

    #[test]
    fn io_error_includes_path() {
        let e = ConfigError::Io {
            path: PathBuf::from("/tmp/arm.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/arm.toml"));
        assert!(msg.contains("not found"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn errors_are_send_sync() {
        assert_send_sync::<KinematicsError>();
        assert_send_sync::<ConfigError>();
    }
}
