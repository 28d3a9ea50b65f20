//! # Residue Templates Module
//!
//! Per-variant side-chain construction. Each amino acid maps to a fixed,
//! ordered list of placement steps; the evaluator runs those steps on an
//! already-placed backbone and returns a complete residue.
//!
//! ## Key Components
//!
//! - [`library`] - The closed table of placement steps for the 20 variants
//! - [`evaluator`] - Backbone input types and [`evaluator::build_residue`]

use crate::core::geometry::GeometryError;
use crate::core::models::residue::AminoAcid;
use thiserror::Error;

pub mod evaluator;
pub mod library;

pub use evaluator::{
    AmideHydrogen, AtomSpec, Backbone, ResidueBlueprint, build_residue, build_residue_by_tag,
    build_residue_with_tolerance,
};
pub use library::{PlacementStep, reads_field, template};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Unknown residue variant '{0}'")]
    UnknownVariant(String),
    #[error("Geometry for {residue} is missing field '{field}'")]
    MissingField {
        residue: AminoAcid,
        field: &'static str,
    },
    #[error("Template for {residue} references unplaced atom '{atom}'")]
    MissingReference {
        residue: AminoAcid,
        atom: &'static str,
    },
    #[error("Failed to place atom '{atom}' of {residue}: {source}")]
    Placement {
        residue: AminoAcid,
        atom: &'static str,
        source: GeometryError,
    },
}
