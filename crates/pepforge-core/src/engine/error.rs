use thiserror::Error;

use super::assembler::ChainState;
use crate::core::geometry::GeometryError;
use crate::core::models::residue::AminoAcid;
use crate::core::templates::TemplateError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Failed to place atom '{atom}' of residue {residue}: {source}")]
    DegenerateGeometry {
        residue: isize,
        atom: &'static str,
        source: GeometryError,
    },

    #[error("Unknown residue variant '{0}'")]
    UnknownResidueVariant(String),

    #[error("Cannot {operation} a chain in state {state:?}")]
    ProtocolViolation {
        operation: &'static str,
        state: ChainState,
    },

    #[error("Geometry for {residue} is missing field '{field}'")]
    MissingGeometryField {
        residue: AminoAcid,
        field: &'static str,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Lifts a template failure into the engine, tagging it with the residue
    /// number being built.
    pub(crate) fn from_template(residue: isize, error: TemplateError) -> Self {
        match error {
            TemplateError::UnknownVariant(tag) => EngineError::UnknownResidueVariant(tag),
            TemplateError::MissingField { residue, field } => {
                EngineError::MissingGeometryField { residue, field }
            }
            TemplateError::MissingReference { residue: aa, atom } => EngineError::Internal(
                format!("template for {} references unplaced atom '{}'", aa, atom),
            ),
            TemplateError::Placement { atom, source, .. } => EngineError::DegenerateGeometry {
                residue,
                atom,
                source,
            },
        }
    }
}
