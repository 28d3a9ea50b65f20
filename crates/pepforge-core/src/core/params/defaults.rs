use super::geometry::{BackboneGeometry, ResidueGeometry};
use crate::core::models::residue::AminoAcid;

const CA_CB_LENGTH: f64 = 1.52;
const C_CA_CB_ANGLE: f64 = 109.5;

/// (N-CA-C angle, CA-C-O angle, N-CA-C-O dihedral, N-C-CA-CB dihedral)
fn backbone_row(amino_acid: AminoAcid) -> (f64, f64, f64, Option<f64>) {
    use AminoAcid::*;
    match amino_acid {
        Glycine => (110.8914, 120.5117, 180.0, None),
        Alanine => (111.068, 120.5, -60.5, Some(122.6860)),
        Serine => (111.2812, 120.5, -60.0, Some(122.6618)),
        Cysteine => (110.8856, 120.5, -60.0, Some(122.5037)),
        Valine => (109.7698, 120.5686, -60.0, Some(123.2347)),
        Isoleucine => (109.7202, 120.5403, -60.0, Some(123.2347)),
        Leucine => (110.8652, 120.4647, 120.0, Some(122.4948)),
        Threonine => (110.7014, 120.5359, 120.0, Some(123.0953)),
        Arginine => (110.98, 120.54, 120.0, Some(122.76)),
        Lysine => (111.08, 120.54, 120.0, Some(122.76)),
        AsparticAcid => (111.03, 120.51, 120.0, Some(122.82)),
        GlutamicAcid => (111.1703, 120.511, 120.0, Some(122.8702)),
        Asparagine => (111.5, 120.4826, -60.0, Some(123.2254)),
        Glutamine => (111.0849, 120.5029, 120.0, Some(122.8134)),
        Methionine => (110.9416, 120.4816, 120.0, Some(122.6733)),
        Histidine => (111.0859, 120.4732, 120.0, Some(122.6711)),
        Proline => (112.7499, 120.2945, -45.0, Some(115.2975)),
        Phenylalanine => (110.7528, 120.5316, 120.0, Some(122.6054)),
        Tyrosine => (110.9288, 120.5434, 120.0, Some(122.6023)),
        Tryptophan => (110.8914, 120.5117, 120.0, Some(122.6112)),
    }
}

/// Side-chain entries beyond CB, as (field name, value).
fn side_chain_rows(amino_acid: AminoAcid) -> &'static [(&'static str, f64)] {
    use AminoAcid::*;
    match amino_acid {
        Arginine => &[
            ("CB_CC_length", 1.52),
            ("CA_CB_CC_angle", 113.83),
            ("N_CA_CB_CC_diangle", -65.2),
        ],
        Lysine => &[
            ("CB_CC_length", 1.52),
            ("CA_CB_CC_angle", 113.83),
            ("N_CA_CB_CC_diangle", -64.5),
        ],
        Histidine => &[
            ("CB_CC_length", 1.49),
            ("CA_CB_CC_angle", 113.74),
            ("N_CA_CB_CC_diangle", -63.2),
            ("CC_CD_length", 1.38),
            ("CB_CC_CD_angle", 122.85),
            ("CA_CB_CC_CD_diangle", -75.7),
        ],
        Phenylalanine => &[
            ("CB_CC_length", 1.50),
            ("CA_CB_CC_angle", 113.85),
            ("N_CA_CB_CC_diangle", -64.7),
            ("CC_CD_length", 1.39),
            ("CB_CC_CD_angle", 120.0),
            ("CA_CB_CC_CD_diangle", 93.3),
        ],
        Tyrosine => &[
            ("CB_CC_length", 1.51),
            ("CA_CB_CC_angle", 113.8),
            ("N_CA_CB_CC_diangle", -64.3),
            ("CC_CD_length", 1.39),
            ("CB_CC_CD_angle", 120.98),
            ("CA_CB_CC_CD_diangle", 93.1),
        ],
        // The two CB branches and the two CD branches sit roughly opposite
        // each other; these are starting values, not fitted parameters.
        Tryptophan => &[
            ("CB_CC_length", 1.50),
            ("CA_CB_CC_angle", 114.10),
            ("N_CA_CB_CC_diangle", -66.4),
            ("CB_CD_length", 1.50),
            ("CA_CB_CD_angle", 114.10),
            ("N_CA_CB_CD_diangle", 173.6),
            ("CD_CE_length", 1.40),
            ("CB_CD_CE_angle", 120.0),
            ("CA_CB_CD_CE_diangle", 96.3),
            ("CD_CF_length", 1.40),
            ("CB_CD_CF_angle", 120.0),
            ("CA_CB_CD_CF_diangle", -83.7),
        ],
        _ => &[],
    }
}

/// Built-in internal coordinates for one residue type.
pub fn standard_geometry(amino_acid: AminoAcid) -> ResidueGeometry {
    let (n_ca_c_angle, ca_c_o_angle, n_ca_c_o_diangle, cb_diangle) = backbone_row(amino_acid);

    let backbone = BackboneGeometry {
        n_ca_c_angle,
        ca_c_o_angle,
        n_ca_c_o_diangle,
        ..BackboneGeometry::default()
    };
    let mut geometry = ResidueGeometry::new(amino_acid, backbone);

    if let Some(cb_diangle) = cb_diangle {
        geometry = geometry
            .with_side_chain_field("CA_CB_length", CA_CB_LENGTH)
            .with_side_chain_field("C_CA_CB_angle", C_CA_CB_ANGLE)
            .with_side_chain_field("N_C_CA_CB_diangle", cb_diangle);
    }
    for &(name, value) in side_chain_rows(amino_acid) {
        geometry = geometry.with_side_chain_field(name, value);
    }
    geometry
}
