use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Geometry and rotation limits of a single articulated link.
///
/// Created once from static configuration and never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    /// Length of the link. Must be > 0 for a solver to accept it.
    pub length: f64,

    /// Lower rotation boundary in radians.
    pub angle_lower_bound: f64,

    /// Upper rotation boundary in radians.
    pub angle_upper_bound: f64,
}

impl LinkSpec {
    pub fn new(length: f64, angle_lower_bound: f64, angle_upper_bound: f64) -> Self {
        Self {
            length,
            angle_lower_bound,
            angle_upper_bound,
        }
    }

    /// A link whose joint may take any angle.
    pub fn unbounded(length: f64) -> Self {
        Self::new(length, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Returns true if some 2π-equivalent of `angle` lies within the boundaries.
    pub fn contains(&self, angle: f64) -> bool {
        if !self.angle_lower_bound.is_finite() || !self.angle_upper_bound.is_finite() {
            return angle >= self.angle_lower_bound && angle <= self.angle_upper_bound;
        }
        let wrapped = self.angle_lower_bound + (angle - self.angle_lower_bound).rem_euclid(TAU);
        wrapped <= self.angle_upper_bound
    }
}

/// The two planar joint angles of the arm, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    /// Angle between the base plane and link 1 (shoulder).
    pub angle1: f64,
    /// Angle between link 1 and link 2 (elbow).
    pub angle2: f64,
}

impl JointAngles {
    pub fn new(angle1: f64, angle2: f64) -> Self {
        Self { angle1, angle2 }
    }

    pub fn to_degrees(self) -> (f64, f64) {
        (self.angle1.to_degrees(), self.angle2.to_degrees())
    }
}

/// Which of the two valid elbow configurations a solution belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElbowBranch {
    /// The `+acos` branch. The only one the single-branch solver produces.
    Up,
    /// The mirrored `-acos` branch.
    Down,
}

/// Immutable outcome of resolving a 3D target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// The world-space target that was resolved.
    pub target: DVec3,

    /// Rotation of the vertical working plane about the vertical axis (radians).
    pub base_angle: f64,

    /// Solved shoulder and elbow angles.
    pub angles: JointAngles,

    /// End of link 1 in the rotated vertical plane.
    pub joint1: DVec2,

    /// End of link 2 (the end effector) in the rotated vertical plane.
    pub joint2: DVec2,
}

/// Mutable state owned by a single solver instance.
///
/// Everything but the lengths is overwritten by each successful solve.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ManipulatorState {
    pub length1: f64,
    pub length2: f64,
    pub base_angle: Option<f64>,
    pub angles: Option<JointAngles>,

    /// Joint 1 and joint 2 positions. Stored as one pair so they are only ever
    /// recomputed together.
    pub joints: Option<(DVec2, DVec2)>,
}

impl ManipulatorState {
    pub fn new(length1: f64, length2: f64) -> Self {
        Self {
            length1,
            length2,
            ..Default::default()
        }
    }

    pub fn joint1(&self) -> Option<DVec2> {
        self.joints.map(|(j1, _)| j1)
    }

    pub fn joint2(&self) -> Option<DVec2> {
        self.joints.map(|(_, j2)| j2)
    }

    pub(crate) fn record(&mut self, resolution: &Resolution) {
        self.base_angle = Some(resolution.base_angle);
        self.angles = Some(resolution.angles);
        self.joints = Some((resolution.joint1, resolution.joint2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn contains_wraps_full_turns() {
        let link = LinkSpec::new(1.0, 0.0, 270f64.to_radians());
        assert!(link.contains(PI));
        assert!(link.contains(-PI));
        assert!(link.contains(PI + TAU));
        assert!(!link.contains(-61f64.to_radians()));
        assert!(link.contains(-100f64.to_radians()));
    }

    #[test]
    fn unbounded_accepts_everything_finite() {
        let link = LinkSpec::unbounded(3.0);
        assert!(link.contains(0.0));
        assert!(link.contains(-123.4));
        assert!(link.contains(1e9));
    }

    #[test]
    fn state_starts_unset() {
        let state = ManipulatorState::new(120.0, 135.0);
        assert_eq!(state.base_angle, None);
        assert_eq!(state.angles, None);
        assert_eq!(state.joint1(), None);
        assert_eq!(state.joint2(), None);
    }
}
