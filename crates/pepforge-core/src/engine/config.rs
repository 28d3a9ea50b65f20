use crate::core::geometry::placement::DEGENERACY_EPSILON;
use thiserror::Error;

pub const DEFAULT_CHAIN_ID: char = 'A';
pub const DEFAULT_FIRST_RESIDUE_NUMBER: isize = 1;
pub const DEFAULT_OXT_BOND_LENGTH: f64 = 1.23;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}

/// Where the carbonyl oxygen of a newly added residue is first put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarbonylDihedral {
    /// N-CA-C-O from the residue geometry.
    #[default]
    Table,
    /// N-CA-C-O fixed at 180°.
    Trans,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    pub chain_id: char,
    pub first_residue_number: isize,
    pub oxt_bond_length: f64,
    pub tolerance: f64,
    pub carbonyl_dihedral: CarbonylDihedral,
    /// Whether the sequence builders finish the chain with OXT.
    pub terminate: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            first_residue_number: DEFAULT_FIRST_RESIDUE_NUMBER,
            oxt_bond_length: DEFAULT_OXT_BOND_LENGTH,
            tolerance: DEGENERACY_EPSILON,
            carbonyl_dihedral: CarbonylDihedral::default(),
            terminate: false,
        }
    }
}

#[derive(Default)]
pub struct AssemblyConfigBuilder {
    chain_id: Option<char>,
    first_residue_number: Option<isize>,
    oxt_bond_length: Option<f64>,
    tolerance: Option<f64>,
    carbonyl_dihedral: Option<CarbonylDihedral>,
    terminate: Option<bool>,
}

impl AssemblyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain_id(mut self, id: char) -> Self {
        self.chain_id = Some(id);
        self
    }
    pub fn first_residue_number(mut self, number: isize) -> Self {
        self.first_residue_number = Some(number);
        self
    }
    pub fn oxt_bond_length(mut self, length: f64) -> Self {
        self.oxt_bond_length = Some(length);
        self
    }
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn carbonyl_dihedral(mut self, mode: CarbonylDihedral) -> Self {
        self.carbonyl_dihedral = Some(mode);
        self
    }
    pub fn terminate(mut self, terminate: bool) -> Self {
        self.terminate = Some(terminate);
        self
    }

    pub fn build(self) -> Result<AssemblyConfig, ConfigError> {
        let defaults = AssemblyConfig::default();

        let oxt_bond_length = self.oxt_bond_length.unwrap_or(defaults.oxt_bond_length);
        if !(oxt_bond_length.is_finite() && oxt_bond_length > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "oxt_bond_length",
                reason: "must be a positive finite length",
            });
        }
        let tolerance = self.tolerance.unwrap_or(defaults.tolerance);
        if !(tolerance.is_finite() && tolerance > 0.0 && tolerance < 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "tolerance",
                reason: "must lie strictly between 0 and 1",
            });
        }
        let chain_id = self.chain_id.unwrap_or(defaults.chain_id);
        if !chain_id.is_ascii_alphanumeric() {
            return Err(ConfigError::InvalidParameter {
                name: "chain_id",
                reason: "must be an ASCII letter or digit",
            });
        }

        Ok(AssemblyConfig {
            chain_id,
            first_residue_number: self
                .first_residue_number
                .unwrap_or(defaults.first_residue_number),
            oxt_bond_length,
            tolerance,
            carbonyl_dihedral: self.carbonyl_dihedral.unwrap_or(defaults.carbonyl_dihedral),
            terminate: self.terminate.unwrap_or(defaults.terminate),
        })
    }
}
