//! # Geometry Parameters Module
//!
//! Internal-coordinate tables for the 20 standard residue types, with
//! built-in defaults and TOML overrides.
//!
//! ## Key Components
//!
//! - [`GeometryLibrary`] - One [`ResidueGeometry`] per amino acid
//! - [`geometry`] - Backbone and side-chain records plus per-call torsions
//! - [`defaults`] - Standard values for every residue type
//!
//! ## File format
//!
//! A geometry file holds one table per three-letter code. Every key is
//! optional and replaces the matching standard value. Keys that are neither
//! backbone fields nor read by the residue's template are dropped with a
//! warning:
//!
//! ```toml
//! [ALA]
//! N_CA_C_angle = 110.5
//! CA_CB_length = 1.53
//!
//! [PRO]
//! phi = -63.0
//! ```

use crate::core::models::residue::AminoAcid;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

pub mod defaults;
pub mod geometry;

pub use geometry::{BackboneDihedrals, BackboneGeometry, ResidueGeometry};

use geometry::ResidueOverride;

#[derive(Debug, Error)]
pub enum GeometryLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Unknown residue '{name}' in '{path}'")]
    UnknownResidue { path: String, name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryLibrary {
    entries: HashMap<AminoAcid, ResidueGeometry>,
}

impl Default for GeometryLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

impl GeometryLibrary {
    pub fn standard() -> Self {
        let entries = AminoAcid::ALL
            .into_iter()
            .map(|aa| (aa, defaults::standard_geometry(aa)))
            .collect();
        Self { entries }
    }

    /// Loads a geometry file on top of the standard tables.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid TOML, or names a table
    /// that is not a standard residue code.
    pub fn load(path: &Path) -> Result<Self, GeometryLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| GeometryLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let tables: HashMap<String, ResidueOverride> =
            toml::from_str(&content).map_err(|e| GeometryLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;

        let mut library = Self::standard();
        let mut replaced = 0;
        for (name, mut overrides) in tables {
            let amino_acid: AminoAcid =
                name.parse().map_err(|_| GeometryLoadError::UnknownResidue {
                    path: path.to_string_lossy().to_string(),
                    name: name.clone(),
                })?;
            for field in overrides.take_unread_fields(amino_acid) {
                warn!(
                    path = %path.display(),
                    residue = %amino_acid,
                    field = %field,
                    "Ignoring geometry key that is not a backbone field and is not read by the residue template"
                );
            }
            let count = library.entry_mut(amino_acid).apply(&overrides);
            debug!(residue = %amino_acid, fields = count, "Applied geometry overrides");
            replaced += count;
        }

        if replaced == 0 {
            warn!(path = %path.display(), "Geometry file overrides no standard values");
        }
        Ok(library)
    }

    pub fn get(&self, amino_acid: AminoAcid) -> Option<&ResidueGeometry> {
        self.entries.get(&amino_acid)
    }

    pub fn insert(&mut self, geometry: ResidueGeometry) {
        self.entries.insert(geometry.amino_acid, geometry);
    }

    fn entry_mut(&mut self, amino_acid: AminoAcid) -> &mut ResidueGeometry {
        self.entries
            .entry(amino_acid)
            .or_insert_with(|| defaults::standard_geometry(amino_acid))
    }
}
