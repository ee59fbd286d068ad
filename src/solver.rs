//! Kinematic solver for a base-rotating two-link arm.
//!
//! The entry point is [`KinematicSolver`]. Build it from two link lengths
//! ([`KinematicSolver::new`]) or two [`LinkSpec`]s ([`KinematicSolver::from_links`]),
//! then call [`KinematicSolver::resolve_target`] with a world-space point.
//!
//! # Frames
//!
//! The world frame has `z` pointing up. The base rotates the arm's vertical
//! working plane about `z` by the base angle; inside that plane the first
//! coordinate is the horizontal distance from the base axis and the second is
//! the height. Joint angles are measured in that plane: `angle1` from the
//! horizontal to link 1, `angle2` from link 1 to link 2.
//!
//! # Elbow branch
//!
//! [`KinematicSolver::inverse_kinematics_2d`] always returns the `+acos`
//! ([`ElbowBranch::Up`]) configuration. The mirrored configuration is only
//! available through [`KinematicSolver::solve_branches`].

use crate::error::KinematicsError;
use crate::link::{ElbowBranch, JointAngles, LinkSpec, ManipulatorState, Resolution};
use glam::{DVec2, DVec3};
use std::f64::consts::FRAC_PI_2;

/// Solves forward and inverse kinematics for one arm instance.
#[derive(Clone, Debug)]
pub struct KinematicSolver {
    links: [LinkSpec; 2],
    enforce_limits: bool,
    state: ManipulatorState,
}

impl KinematicSolver {
    /// Creates a solver for links of the given lengths, with no rotation limits.
    ///
    /// Fails with [`KinematicsError::InvalidConfiguration`] if either length is
    /// not a positive finite number.
    pub fn new(length1: f64, length2: f64) -> Result<Self, KinematicsError> {
        Self::from_links(LinkSpec::unbounded(length1), LinkSpec::unbounded(length2))
    }

    /// Creates a solver from two link specs, keeping their rotation boundaries
    /// for [`with_joint_limits`](Self::with_joint_limits).
    pub fn from_links(link1: LinkSpec, link2: LinkSpec) -> Result<Self, KinematicsError> {
        for (link, spec) in [(1, &link1), (2, &link2)] {
            if !(spec.length > 0.0 && spec.length.is_finite()) {
                return Err(KinematicsError::InvalidConfiguration {
                    link,
                    length: spec.length,
                });
            }
        }

        Ok(Self {
            links: [link1, link2],
            enforce_limits: false,
            state: ManipulatorState::new(link1.length, link2.length),
        })
    }

    /// Enables or disables rejection of solutions outside the links' rotation
    /// boundaries (builder pattern). Disabled by default.
    pub fn with_joint_limits(mut self, enforce: bool) -> Self {
        self.enforce_limits = enforce;
        self
    }

    pub fn enforces_limits(&self) -> bool {
        self.enforce_limits
    }

    pub fn links(&self) -> &[LinkSpec; 2] {
        &self.links
    }

    pub fn lengths(&self) -> (f64, f64) {
        (self.links[0].length, self.links[1].length)
    }

    /// Radius of the reachable disk in the working plane.
    pub fn max_reach(&self) -> f64 {
        self.links[0].length + self.links[1].length
    }

    /// The state recorded by the most recent successful solves.
    pub fn state(&self) -> &ManipulatorState {
        &self.state
    }

    /// Position of the end effector in the working plane for the given joint angles.
    ///
    /// Pure: does not touch the recorded state.
    pub fn forward_kinematics(&self, angle1: f64, angle2: f64) -> DVec2 {
        let (l1, l2) = self.lengths();
        DVec2::from_angle(angle1) * l1 + DVec2::from_angle(angle1 + angle2) * l2
    }

    /// Solves the planar two-link problem for the point `(x, y)` on the
    /// [`ElbowBranch::Up`] branch and records the angles.
    pub fn inverse_kinematics_2d(
        &mut self,
        x: f64,
        y: f64,
    ) -> Result<JointAngles, KinematicsError> {
        let angles = self.solve_branch(x, y, ElbowBranch::Up)?;
        self.check_limits(angles)?;

        self.state.angles = Some(angles);
        Ok(angles)
    }

    /// Both elbow configurations reaching `(x, y)`, `Up` first.
    ///
    /// Limits are not applied; use [`within_limits`](Self::within_limits) to
    /// filter. The recorded state is not touched.
    pub fn solve_branches(&self, x: f64, y: f64) -> Result<[JointAngles; 2], KinematicsError> {
        Ok([
            self.solve_branch(x, y, ElbowBranch::Up)?,
            self.solve_branch(x, y, ElbowBranch::Down)?,
        ])
    }

    /// Returns true if both angles lie within their links' rotation boundaries.
    pub fn within_limits(&self, angles: JointAngles) -> bool {
        self.links[0].contains(angles.angle1) && self.links[1].contains(angles.angle2)
    }

    /// Maps a world-space target to a base angle, joint angles and joint positions.
    ///
    /// On success the result is also recorded into the solver state; on failure
    /// the previous state is left untouched.
    ///
    /// # Steps
    ///
    /// 1. The base angle is `atan(y / x)`. A target on the vertical axis
    ///    (`x == 0`) resolves to `±π/2` by the sign of `y`, or `0` when `y == 0`.
    ///    The angle selects a plane, not a heading: it stays in `[-π/2, π/2]`
    ///    and the horizontal projection is never negative, so a target with
    ///    `x < 0` resolves to its mirror image `(-x, -y, z)`.
    /// 2. The target is projected into the working plane:
    ///    `(sqrt(x² + y²), z)`.
    /// 3. The planar problem is solved with
    ///    [`inverse_kinematics_2d`](Self::inverse_kinematics_2d) semantics.
    /// 4. Joint 1 is the end of link 1; joint 2 is
    ///    [`forward_kinematics`](Self::forward_kinematics) of the solved angles.
    pub fn resolve_target(&mut self, target: DVec3) -> Result<Resolution, KinematicsError> {
        if !target.is_finite() {
            return Err(KinematicsError::NonFiniteTarget);
        }

        let base_angle = plane_azimuth(target.x, target.y);
        log::debug!(
            "Plane angle:        {:5.2}rad {:5.2}°",
            base_angle,
            base_angle.to_degrees()
        );

        let horizontal = target.truncate().length();
        let vertical = target.z;
        log::debug!("Plane target:       ({:.2}, {:.2})", horizontal, vertical);

        let angles = self.solve_branch(horizontal, vertical, ElbowBranch::Up)?;
        self.check_limits(angles)?;

        let joint1 = DVec2::from_angle(angles.angle1) * self.links[0].length;
        let joint2 = self.forward_kinematics(angles.angle1, angles.angle2);
        log::debug!("Joint 1:            ({:.2}, {:.2})", joint1.x, joint1.y);
        log::debug!("Joint 2:            ({:.2}, {:.2})", joint2.x, joint2.y);

        let resolution = Resolution {
            target,
            base_angle,
            angles,
            joint1,
            joint2,
        };
        self.state.record(&resolution);

        Ok(resolution)
    }

    fn solve_branch(
        &self,
        x: f64,
        y: f64,
        branch: ElbowBranch,
    ) -> Result<JointAngles, KinematicsError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(KinematicsError::NonFiniteTarget);
        }

        let (l1, l2) = self.lengths();
        let max_reach = self.max_reach();
        let distance = DVec2::new(x, y).length();
        log::debug!("IK distance:        {:.2} (reach {:.2})", distance, max_reach);

        if distance > max_reach {
            log::warn!(
                "Target ({:.2}, {:.2}) is {:.4} away, beyond reach {:.4}",
                x,
                y,
                distance,
                max_reach
            );
            return Err(KinematicsError::UnreachableTarget {
                distance,
                max_reach,
            });
        }

        let cos_angle2 = elbow_cosine(l1, l2, x * x + y * y);
        let elbow = cos_angle2.acos();
        let angle2 = match branch {
            ElbowBranch::Up => elbow,
            ElbowBranch::Down => -elbow,
        };
        let angle1 = y.atan2(x) - (l2 * angle2.sin()).atan2(l1 + l2 * angle2.cos());

        log::debug!(
            "IK angles {:?}:     {:5.2}° {:5.2}°",
            branch,
            angle1.to_degrees(),
            angle2.to_degrees()
        );

        Ok(JointAngles::new(angle1, angle2))
    }

    fn check_limits(&self, angles: JointAngles) -> Result<(), KinematicsError> {
        if !self.enforce_limits {
            return Ok(());
        }

        for (joint, link, angle) in [
            (1, &self.links[0], angles.angle1),
            (2, &self.links[1], angles.angle2),
        ] {
            if !link.contains(angle) {
                log::warn!("Joint {} angle {:5.2}° is out of range", joint, angle.to_degrees());
                return Err(KinematicsError::OutOfRange {
                    joint,
                    angle,
                    lower: link.angle_lower_bound,
                    upper: link.angle_upper_bound,
                });
            }
        }

        Ok(())
    }
}

/// Law-of-cosines elbow cosine for a point at squared distance `distance_sq`,
/// clamped to `[-1, 1]`.
///
/// Values outside the interval only arise from rounding at the outer boundary
/// or from points inside the inner radius `|l1 - l2|`.
fn elbow_cosine(l1: f64, l2: f64, distance_sq: f64) -> f64 {
    let raw = (distance_sq - l1 * l1 - l2 * l2) / (2.0 * l1 * l2);
    let clamped = raw.clamp(-1.0, 1.0);
    if clamped != raw {
        log::trace!("Clamped elbow cosine {} to {}", raw, clamped);
    }
    clamped
}

/// Rotation of the working plane for a target at `(x, y)`.
fn plane_azimuth(x: f64, y: f64) -> f64 {
    if x == 0.0 {
        if y > 0.0 {
            FRAC_PI_2
        } else if y < 0.0 {
            -FRAC_PI_2
        } else {
            0.0
        }
    } else {
        (y / x).atan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn elbow_cosine_clamps_rounding_overshoot() {
        let reach_sq = (120.0f64 + 135.0).powi(2);
        assert_eq!(elbow_cosine(120.0, 135.0, reach_sq * (1.0 + 1e-12)), 1.0);
        assert_eq!(elbow_cosine(120.0, 135.0, 0.0), -1.0);
        assert_abs_diff_eq!(elbow_cosine(1.0, 1.0, 2.0), 0.0);
    }

    #[test]
    fn plane_azimuth_on_vertical_axis() {
        assert_eq!(plane_azimuth(0.0, 5.0), FRAC_PI_2);
        assert_eq!(plane_azimuth(-0.0, -5.0), -FRAC_PI_2);
        assert_eq!(plane_azimuth(0.0, 0.0), 0.0);
    }

    #[test]
    fn plane_azimuth_is_an_axis_not_a_heading() {
        // atan(y / x) folds opposite headings onto the same plane.
        assert_abs_diff_eq!(plane_azimuth(1.0, 1.0), PI / 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(plane_azimuth(-1.0, -1.0), PI / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn ik_records_angles_but_not_joints() {
        let mut solver = KinematicSolver::new(1.0, 1.0).unwrap();
        let angles = solver.inverse_kinematics_2d(1.0, 1.0).unwrap();

        assert_eq!(solver.state().angles, Some(angles));
        assert_eq!(solver.state().joints, None);
        assert_eq!(solver.state().base_angle, None);
    }
}
