//! # Geometry Module
//!
//! Cartesian placement from internal coordinates and the measurements used to
//! check and refine placements.
//!
//! ## Key Components
//!
//! - [`placement`] - Places one atom from three references plus bond length,
//!   bond angle and dihedral
//! - [`measure`] - Distances, bond angles, dihedrals and axis rotations

use thiserror::Error;

pub mod measure;
pub mod placement;

pub use measure::{bond_angle, dihedral, distance, rotate_about_axis};
pub use placement::{
    DEGENERACY_EPSILON, GENERAL_BRANCH_CUTOFF, PlacementSpec, place_point,
    place_point_with_tolerance,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Degenerate geometry: {reason}")]
    Degenerate { reason: &'static str },
}
