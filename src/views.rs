//! Orthographic projections of a solved arm pose.
//!
//! These are the polylines a plotting front-end draws: base, joint 1 and
//! joint 2, plus a maximum-reach circle centred on the base. Nothing here
//! renders; it only derives 2D coordinates from a [`Resolution`].

use crate::link::Resolution;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Margin applied to the reach radius when scaling plot axes by range.
pub const DEFAULT_VIEW_MARGIN: f64 = 1.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    /// Looking down the vertical axis (world X/Y).
    Top,
    /// Inside the rotated working plane (plane horizontal/Z).
    Plane,
    /// Looking along world Y (world X/Z).
    Front,
}

/// One projected view of the arm.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewProjection {
    pub kind: ViewKind,

    /// Base, joint 1 and joint 2, in that order.
    pub points: [DVec2; 3],

    /// Radius of the maximum-reach circle in this view.
    pub reach_radius: f64,
}

impl ViewProjection {
    /// Projects `resolution` for the given view. `lengths` are the two link lengths.
    pub fn new(kind: ViewKind, resolution: &Resolution, lengths: (f64, f64)) -> Self {
        let (cos, sin) = (resolution.base_angle.cos(), resolution.base_angle.sin());
        let reach = lengths.0 + lengths.1;
        let planar = [DVec2::ZERO, resolution.joint1, resolution.joint2];

        let (points, reach_radius) = match kind {
            ViewKind::Top => (planar.map(|p| DVec2::new(cos * p.x, sin * p.x)), cos * reach),
            ViewKind::Plane => (planar, reach),
            ViewKind::Front => (planar.map(|p| DVec2::new(p.x * cos, p.y)), cos * reach),
        };

        Self {
            kind,
            points,
            reach_radius,
        }
    }

    /// Symmetric axis extent `(-r·margin, r·margin)` for plots scaled by range.
    pub fn bounds(&self, margin: f64) -> (f64, f64) {
        let extent = self.reach_radius.abs() * margin;
        (-extent, extent)
    }
}

/// Projects `resolution` into the top, plane and front views.
pub fn project_all(resolution: &Resolution, lengths: (f64, f64)) -> [ViewProjection; 3] {
    [ViewKind::Top, ViewKind::Plane, ViewKind::Front]
        .map(|kind| ViewProjection::new(kind, resolution, lengths))
}
