use crate::core::models::residue::AminoAcid;
use crate::core::templates::library::reads_field;
use serde::Deserialize;
use std::collections::HashMap;

/// Omega values below this are a request for the geometry's own default.
pub const OMEGA_DEFAULT_SENTINEL: f64 = -360.0;

/// Internal coordinates shared by every residue's backbone.
///
/// Lengths are in Ångström, angles in degrees. Field names mirror the atom
/// paths they describe (`CA_N_length` is the CA-N bond).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackboneGeometry {
    pub ca_n_length: f64,
    pub ca_c_length: f64,
    pub n_ca_c_angle: f64,
    pub n_h_length: f64,
    pub ca_n_h_angle: f64,
    pub c_ca_n_h_diangle: f64,
    pub c_o_length: f64,
    pub ca_c_o_angle: f64,
    pub n_ca_c_o_diangle: f64,
    pub peptide_bond: f64,
    pub ca_c_n_angle: f64,
    pub c_n_ca_angle: f64,
}

impl Default for BackboneGeometry {
    fn default() -> Self {
        Self {
            ca_n_length: 1.46,
            ca_c_length: 1.52,
            n_ca_c_angle: 111.0,
            n_h_length: 1.01,
            ca_n_h_angle: 119.0,
            c_ca_n_h_diangle: 60.0,
            c_o_length: 1.23,
            ca_c_o_angle: 120.5,
            n_ca_c_o_diangle: 180.0,
            peptide_bond: 1.33,
            ca_c_n_angle: 116.642992978143,
            c_n_ca_angle: 121.382215820277,
        }
    }
}

impl BackboneGeometry {
    pub const FIELD_NAMES: [&'static str; 12] = [
        "CA_N_length",
        "CA_C_length",
        "N_CA_C_angle",
        "N_H_length",
        "CA_N_H_angle",
        "C_CA_N_H_diangle",
        "C_O_length",
        "CA_C_O_angle",
        "N_CA_C_O_diangle",
        "peptide_bond",
        "CA_C_N_angle",
        "C_N_CA_angle",
    ];

    pub fn field(&self, name: &str) -> Option<f64> {
        let value = match name {
            "CA_N_length" => self.ca_n_length,
            "CA_C_length" => self.ca_c_length,
            "N_CA_C_angle" => self.n_ca_c_angle,
            "N_H_length" => self.n_h_length,
            "CA_N_H_angle" => self.ca_n_h_angle,
            "C_CA_N_H_diangle" => self.c_ca_n_h_diangle,
            "C_O_length" => self.c_o_length,
            "CA_C_O_angle" => self.ca_c_o_angle,
            "N_CA_C_O_diangle" => self.n_ca_c_o_diangle,
            "peptide_bond" => self.peptide_bond,
            "CA_C_N_angle" => self.ca_c_n_angle,
            "C_N_CA_angle" => self.c_n_ca_angle,
            _ => return None,
        };
        Some(value)
    }

    fn apply(&mut self, overrides: &BackboneOverride) {
        let slots = [
            (&mut self.ca_n_length, overrides.ca_n_length),
            (&mut self.ca_c_length, overrides.ca_c_length),
            (&mut self.n_ca_c_angle, overrides.n_ca_c_angle),
            (&mut self.n_h_length, overrides.n_h_length),
            (&mut self.ca_n_h_angle, overrides.ca_n_h_angle),
            (&mut self.c_ca_n_h_diangle, overrides.c_ca_n_h_diangle),
            (&mut self.c_o_length, overrides.c_o_length),
            (&mut self.ca_c_o_angle, overrides.ca_c_o_angle),
            (&mut self.n_ca_c_o_diangle, overrides.n_ca_c_o_diangle),
            (&mut self.peptide_bond, overrides.peptide_bond),
            (&mut self.ca_c_n_angle, overrides.ca_c_n_angle),
            (&mut self.c_n_ca_angle, overrides.c_n_ca_angle),
        ];
        for (slot, value) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Backbone torsions for one `extend` call.
///
/// `phi` is C(i-1)-N-CA-C of the new residue, `psi_im1` is N-CA-C-N(i+1)
/// of the previous one, and `omega` is CA-C-N-CA across the peptide bond.
/// `None` for omega means "use the geometry's default".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackboneDihedrals {
    pub phi: f64,
    pub psi_im1: f64,
    pub omega: Option<f64>,
}

impl BackboneDihedrals {
    /// Builds a dihedral set; an omega below -360° selects the default omega.
    pub fn new(phi: f64, psi_im1: f64, omega: f64) -> Self {
        Self {
            phi,
            psi_im1,
            omega: (omega >= OMEGA_DEFAULT_SENTINEL).then_some(omega),
        }
    }

    pub fn with_default_omega(phi: f64, psi_im1: f64) -> Self {
        Self {
            phi,
            psi_im1,
            omega: None,
        }
    }

    /// The fully extended strand conformation.
    pub fn extended() -> Self {
        Self::with_default_omega(-120.0, 140.0)
    }

    pub fn resolve_omega(&self, geometry: &ResidueGeometry) -> f64 {
        self.omega.unwrap_or(geometry.omega)
    }
}

impl Default for BackboneDihedrals {
    fn default() -> Self {
        Self::extended()
    }
}

/// Complete internal-coordinate record for one residue type.
///
/// Side-chain entries are kept by their conventional names
/// (`CA_CB_length`, `N_CA_CB_CC_diangle`, ...) and looked up by the residue
/// templates at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueGeometry {
    pub amino_acid: AminoAcid,
    pub backbone: BackboneGeometry,
    pub phi: f64,
    pub psi_im1: f64,
    pub omega: f64,
    side_chain: HashMap<String, f64>,
}

impl ResidueGeometry {
    pub fn new(amino_acid: AminoAcid, backbone: BackboneGeometry) -> Self {
        Self {
            amino_acid,
            backbone,
            phi: -120.0,
            psi_im1: 140.0,
            omega: 180.0,
            side_chain: HashMap::new(),
        }
    }

    pub fn with_side_chain_field(mut self, name: &str, value: f64) -> Self {
        self.side_chain.insert(name.to_string(), value);
        self
    }

    pub fn side_chain_field(&self, name: &str) -> Option<f64> {
        self.side_chain.get(name).copied()
    }

    pub fn side_chain_fields(&self) -> impl Iterator<Item = (&str, f64)> {
        self.side_chain.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Resolves any named field: backbone, default torsions, then side chain.
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "phi" => Some(self.phi),
            "psi_im1" => Some(self.psi_im1),
            "omega" => Some(self.omega),
            _ => self
                .backbone
                .field(name)
                .or_else(|| self.side_chain_field(name)),
        }
    }

    pub fn default_dihedrals(&self) -> BackboneDihedrals {
        BackboneDihedrals {
            phi: self.phi,
            psi_im1: self.psi_im1,
            omega: Some(self.omega),
        }
    }

    /// Applies the values present in `overrides`, leaving the rest untouched.
    /// Returns how many fields were replaced.
    pub(crate) fn apply(&mut self, overrides: &ResidueOverride) -> usize {
        let mut count = overrides.backbone.count();
        self.backbone.apply(&overrides.backbone);
        for (slot, value) in [
            (&mut self.phi, overrides.phi),
            (&mut self.psi_im1, overrides.psi_im1),
            (&mut self.omega, overrides.omega),
        ] {
            if let Some(value) = value {
                *slot = value;
                count += 1;
            }
        }
        for (name, &value) in &overrides.side_chain {
            self.side_chain.insert(name.clone(), value);
            count += 1;
        }
        count
    }
}

/// One residue table of a geometry file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub(crate) struct ResidueOverride {
    #[serde(flatten)]
    pub backbone: BackboneOverride,
    pub phi: Option<f64>,
    pub psi_im1: Option<f64>,
    pub omega: Option<f64>,
    #[serde(flatten)]
    pub side_chain: HashMap<String, f64>,
}

impl ResidueOverride {
    /// Removes keys that are neither backbone fields nor read by the
    /// residue's template, returning them sorted. Misspelled backbone keys
    /// land in the side-chain map and end up here.
    pub(crate) fn take_unread_fields(&mut self, amino_acid: AminoAcid) -> Vec<String> {
        let mut unread: Vec<String> = self
            .side_chain
            .keys()
            .filter(|name| !reads_field(amino_acid, name))
            .cloned()
            .collect();
        for name in &unread {
            self.side_chain.remove(name);
        }
        unread.sort();
        unread
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub(crate) struct BackboneOverride {
    #[serde(rename = "CA_N_length")]
    pub ca_n_length: Option<f64>,
    #[serde(rename = "CA_C_length")]
    pub ca_c_length: Option<f64>,
    #[serde(rename = "N_CA_C_angle")]
    pub n_ca_c_angle: Option<f64>,
    #[serde(rename = "N_H_length")]
    pub n_h_length: Option<f64>,
    #[serde(rename = "CA_N_H_angle")]
    pub ca_n_h_angle: Option<f64>,
    #[serde(rename = "C_CA_N_H_diangle")]
    pub c_ca_n_h_diangle: Option<f64>,
    #[serde(rename = "C_O_length")]
    pub c_o_length: Option<f64>,
    #[serde(rename = "CA_C_O_angle")]
    pub ca_c_o_angle: Option<f64>,
    #[serde(rename = "N_CA_C_O_diangle")]
    pub n_ca_c_o_diangle: Option<f64>,
    pub peptide_bond: Option<f64>,
    #[serde(rename = "CA_C_N_angle")]
    pub ca_c_n_angle: Option<f64>,
    #[serde(rename = "C_N_CA_angle")]
    pub c_n_ca_angle: Option<f64>,
}

impl BackboneOverride {
    fn count(&self) -> usize {
        [
            self.ca_n_length,
            self.ca_c_length,
            self.n_ca_c_angle,
            self.n_h_length,
            self.ca_n_h_angle,
            self.c_ca_n_h_diangle,
            self.c_o_length,
            self.ca_c_o_angle,
            self.n_ca_c_o_diangle,
            self.peptide_bond,
            self.ca_c_n_angle,
            self.c_n_ca_angle,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omega_below_sentinel_selects_default() {
        let dihedrals = BackboneDihedrals::new(-120.0, 140.0, -370.0);
        assert_eq!(dihedrals.omega, None);

        let geometry = ResidueGeometry::new(AminoAcid::Glycine, BackboneGeometry::default());
        assert_eq!(dihedrals.resolve_omega(&geometry), 180.0);
    }

    #[test]
    fn omega_at_or_above_sentinel_is_kept() {
        assert_eq!(BackboneDihedrals::new(-60.0, -45.0, -360.0).omega, Some(-360.0));
        assert_eq!(BackboneDihedrals::new(-60.0, -45.0, 175.0).omega, Some(175.0));
    }

    #[test]
    fn field_lookup_covers_backbone_torsions_and_side_chain() {
        let geometry = ResidueGeometry::new(AminoAcid::Alanine, BackboneGeometry::default())
            .with_side_chain_field("CA_CB_length", 1.52);

        assert_eq!(geometry.field("CA_CB_length"), Some(1.52));
        assert_eq!(geometry.field("peptide_bond"), Some(1.33));
        assert_eq!(geometry.field("phi"), Some(-120.0));
        assert_eq!(geometry.field("CB_CC_length"), None);
        for name in BackboneGeometry::FIELD_NAMES {
            assert!(geometry.field(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn unread_override_keys_are_taken_out() {
        let mut overrides = ResidueOverride {
            side_chain: HashMap::from([
                ("CA_N_lenght".to_string(), 1.5),
                ("CA_CB_length".to_string(), 1.54),
                ("CB_CC_length".to_string(), 1.53),
            ]),
            ..Default::default()
        };

        let unread = overrides.take_unread_fields(AminoAcid::Alanine);

        assert_eq!(unread, vec!["CA_N_lenght", "CB_CC_length"]);
        assert_eq!(
            overrides.side_chain,
            HashMap::from([("CA_CB_length".to_string(), 1.54)])
        );

        let mut geometry = ResidueGeometry::new(AminoAcid::Alanine, BackboneGeometry::default());
        assert_eq!(geometry.apply(&overrides), 1);
        assert_eq!(geometry.side_chain_field("CA_N_lenght"), None);
    }

    #[test]
    fn apply_replaces_only_present_fields() {
        let mut geometry = ResidueGeometry::new(AminoAcid::Alanine, BackboneGeometry::default())
            .with_side_chain_field("CA_CB_length", 1.52);
        let overrides = ResidueOverride {
            backbone: BackboneOverride {
                c_o_length: Some(1.25),
                ..Default::default()
            },
            phi: Some(-57.0),
            side_chain: HashMap::from([("CA_CB_length".to_string(), 1.54)]),
            ..Default::default()
        };

        let replaced = geometry.apply(&overrides);

        assert_eq!(replaced, 3);
        assert_eq!(geometry.backbone.c_o_length, 1.25);
        assert_eq!(geometry.backbone.ca_c_length, 1.52);
        assert_eq!(geometry.phi, -57.0);
        assert_eq!(geometry.psi_im1, 140.0);
        assert_eq!(geometry.side_chain_field("CA_CB_length"), Some(1.54));
    }
}
