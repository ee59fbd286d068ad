//! # arm-kinematics
//!
//! Forward and inverse kinematics for a manipulator made of a rotating base
//! and two levers.
//!
//! A world-space target is reduced to a planar two-link problem in the
//! vertical plane selected by the base rotation. The solved joint angles and
//! joint positions come back as a [`Resolution`], which reporting and plotting
//! front-ends consume directly (see [`views`]).

pub mod device;
pub mod error;
pub mod link;
pub mod solver;
pub mod views;

pub use device::*;
pub use error::*;
pub use link::*;
pub use solver::*;
pub use views::*;
