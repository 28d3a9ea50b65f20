use crate::core::models::residue::AminoAcid;
use crate::core::models::system::MolecularSystem;
use crate::core::params::{BackboneDihedrals, GeometryLibrary, ResidueGeometry};
use crate::engine::assembler::ChainAssembler;
use crate::engine::config::AssemblyConfig;
use crate::engine::error::EngineError;
use tracing::{info, instrument};

/// Builds a peptide from a one-letter sequence with every residue at its
/// geometry's default backbone torsions.
#[instrument(skip_all, name = "extended_structure_workflow", fields(length = sequence.len()))]
pub fn make_extended_structure(
    sequence: &str,
    library: &GeometryLibrary,
    config: &AssemblyConfig,
) -> Result<MolecularSystem, EngineError> {
    let geometries = resolve_sequence(sequence, library)?;
    let residues = geometries
        .iter()
        .map(|geometry| (*geometry, geometry.default_dihedrals()));
    assemble(residues, config)
}

/// Builds a peptide with explicit backbone torsions.
///
/// `phi`, `psi_im1` and `omega` hold one value per residue *starting from
/// the second*; the first residue is placed in the fixed initial frame. A
/// missing or empty `omega` uses each geometry's default, as does any omega
/// below -360°.
#[instrument(skip_all, name = "structure_workflow", fields(length = sequence.len()))]
pub fn make_structure(
    sequence: &str,
    phi: &[f64],
    psi_im1: &[f64],
    omega: Option<&[f64]>,
    library: &GeometryLibrary,
    config: &AssemblyConfig,
) -> Result<MolecularSystem, EngineError> {
    let geometries = resolve_sequence(sequence, library)?;
    let expected = geometries.len() - 1;
    let omega = omega.filter(|values| !values.is_empty());

    check_length("phi", phi.len(), expected)?;
    check_length("psi_im1", psi_im1.len(), expected)?;
    if let Some(values) = omega {
        check_length("omega", values.len(), expected)?;
    }

    let dihedrals = (0..expected).map(|i| match omega {
        Some(values) => BackboneDihedrals::new(phi[i], psi_im1[i], values[i]),
        None => BackboneDihedrals::with_default_omega(phi[i], psi_im1[i]),
    });
    // The first residue's torsions are never read.
    let residues = geometries
        .iter()
        .copied()
        .zip(std::iter::once(BackboneDihedrals::extended()).chain(dihedrals));
    assemble(residues, config)
}

/// Builds a peptide from per-residue geometries, each at its own default
/// torsions.
#[instrument(skip_all, name = "geometry_structure_workflow", fields(length = geometries.len()))]
pub fn make_structure_from_geometries(
    geometries: &[ResidueGeometry],
    config: &AssemblyConfig,
) -> Result<MolecularSystem, EngineError> {
    let residues = geometries
        .iter()
        .map(|geometry| (geometry, geometry.default_dihedrals()));
    assemble(residues, config)
}

fn resolve_sequence<'a>(
    sequence: &str,
    library: &'a GeometryLibrary,
) -> Result<Vec<&'a ResidueGeometry>, EngineError> {
    if sequence.is_empty() {
        return Err(EngineError::InvalidInput("sequence is empty".to_string()));
    }
    sequence
        .chars()
        .map(|code| {
            let amino_acid = AminoAcid::from_one_letter(code)
                .map_err(|_| EngineError::UnknownResidueVariant(code.to_string()))?;
            library.get(amino_acid).ok_or_else(|| {
                EngineError::Internal(format!("geometry library has no entry for {}", amino_acid))
            })
        })
        .collect()
}

fn check_length(name: &str, actual: usize, expected: usize) -> Result<(), EngineError> {
    if actual != expected {
        return Err(EngineError::InvalidInput(format!(
            "expected {} {} values (one per residue after the first), got {}",
            expected, name, actual
        )));
    }
    Ok(())
}

fn assemble<'a>(
    residues: impl IntoIterator<Item = (&'a ResidueGeometry, BackboneDihedrals)>,
    config: &AssemblyConfig,
) -> Result<MolecularSystem, EngineError> {
    let mut residues = residues.into_iter();
    let (first, _) = residues
        .next()
        .ok_or_else(|| EngineError::InvalidInput("no residues to build".to_string()))?;

    let mut assembler = ChainAssembler::new(config.clone());
    assembler.initialize(first)?;
    for (geometry, dihedrals) in residues {
        assembler.extend(geometry, dihedrals)?;
    }
    if config.terminate {
        assembler.close()?;
    }

    info!(
        residues = assembler.len(),
        atoms = assembler.system().atom_count(),
        terminated = config.terminate,
        "Peptide assembly complete."
    );
    Ok(assembler.into_system())
}
