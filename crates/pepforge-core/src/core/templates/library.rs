use crate::core::models::atom::Element;
use crate::core::models::residue::AminoAcid;

/// One side-chain atom placed from three earlier atoms.
///
/// The new atom is bonded to `references[2]`; the three field names select
/// the bond length, bond angle and dihedral from the residue geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementStep {
    pub atom: &'static str,
    pub element: Element,
    pub references: [&'static str; 3],
    pub length_field: &'static str,
    pub angle_field: &'static str,
    pub dihedral_field: &'static str,
}

impl PlacementStep {
    pub fn fields(&self) -> [&'static str; 3] {
        [self.length_field, self.angle_field, self.dihedral_field]
    }
}

const CB: PlacementStep = PlacementStep {
    atom: "CB",
    element: Element::C,
    references: ["N", "C", "CA"],
    length_field: "CA_CB_length",
    angle_field: "C_CA_CB_angle",
    dihedral_field: "N_C_CA_CB_diangle",
};

const CC: PlacementStep = PlacementStep {
    atom: "CC",
    element: Element::C,
    references: ["N", "CA", "CB"],
    length_field: "CB_CC_length",
    angle_field: "CA_CB_CC_angle",
    dihedral_field: "N_CA_CB_CC_diangle",
};

const CD: PlacementStep = PlacementStep {
    atom: "CD",
    element: Element::C,
    references: ["CA", "CB", "CC"],
    length_field: "CC_CD_length",
    angle_field: "CB_CC_CD_angle",
    dihedral_field: "CA_CB_CC_CD_diangle",
};

// Tryptophan branches twice: CC and CD both hang off CB, CE and CF off CD.
const TRP_CD: PlacementStep = PlacementStep {
    atom: "CD",
    element: Element::C,
    references: ["N", "CA", "CB"],
    length_field: "CB_CD_length",
    angle_field: "CA_CB_CD_angle",
    dihedral_field: "N_CA_CB_CD_diangle",
};

const TRP_CE: PlacementStep = PlacementStep {
    atom: "CE",
    element: Element::C,
    references: ["CA", "CB", "CD"],
    length_field: "CD_CE_length",
    angle_field: "CB_CD_CE_angle",
    dihedral_field: "CA_CB_CD_CE_diangle",
};

const TRP_CF: PlacementStep = PlacementStep {
    atom: "CF",
    element: Element::C,
    references: ["CA", "CB", "CD"],
    length_field: "CD_CF_length",
    angle_field: "CB_CD_CF_angle",
    dihedral_field: "CA_CB_CD_CF_diangle",
};

const BETA_ONLY: &[PlacementStep] = &[CB];
const TWO_CARBON: &[PlacementStep] = &[CB, CC];
const THREE_CARBON: &[PlacementStep] = &[CB, CC, CD];
const TRYPTOPHAN: &[PlacementStep] = &[CB, CC, TRP_CD, TRP_CE, TRP_CF];

/// Ordered side-chain placement steps for a residue type.
pub fn template(amino_acid: AminoAcid) -> &'static [PlacementStep] {
    use AminoAcid::*;
    match amino_acid {
        Glycine => &[],
        Alanine | Serine | Cysteine | Valine | Isoleucine | Leucine | Threonine
        | AsparticAcid | Asparagine | GlutamicAcid | Glutamine | Methionine | Proline => {
            BETA_ONLY
        }
        Arginine | Lysine => TWO_CARBON,
        Histidine | Phenylalanine | Tyrosine => THREE_CARBON,
        Tryptophan => TRYPTOPHAN,
    }
}

/// Whether any step of the residue's template looks up `field`.
pub fn reads_field(amino_acid: AminoAcid, field: &str) -> bool {
    template(amino_acid)
        .iter()
        .any(|step| step.fields().iter().any(|&name| name == field))
}
