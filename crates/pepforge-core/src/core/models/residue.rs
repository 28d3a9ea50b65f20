use super::ids::{AtomId, ChainId};
use phf::{Map, phf_map};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of standard amino acids the builder knows how to place.
///
/// There is deliberately no catch-all variant: every residue added to a chain
/// must name one of these twenty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AminoAcid {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // Alanine (ALA)
    Glycine,    // Glycine (GLY)
    Isoleucine, // Isoleucine (ILE)
    Leucine,    // Leucine (LEU)
    Proline,    // Proline (PRO)
    Valine,     // Valine (VAL)

    // --- Aromatic ---
    Phenylalanine, // Phenylalanine (PHE)
    Tryptophan,    // Tryptophan (TRP)
    Tyrosine,      // Tyrosine (TYR)

    // --- Polar, Uncharged ---
    Asparagine, // Asparagine (ASN)
    Cysteine,   // Cysteine (CYS)
    Glutamine,  // Glutamine (GLN)
    Serine,     // Serine (SER)
    Threonine,  // Threonine (THR)
    Methionine, // Methionine (MET)

    // --- Positively Charged (Basic) ---
    Arginine,  // Arginine (ARG)
    Histidine, // Histidine (HIS)
    Lysine,    // Lysine (LYS)

    // --- Negatively Charged (Acidic) ---
    AsparticAcid, // Aspartic Acid (ASP)
    GlutamicAcid, // Glutamic Acid (GLU)
}

static THREE_LETTER_CODES: Map<&'static str, AminoAcid> = phf_map! {
    "ALA" => AminoAcid::Alanine,
    "ARG" => AminoAcid::Arginine,
    "ASN" => AminoAcid::Asparagine,
    "ASP" => AminoAcid::AsparticAcid,
    "CYS" => AminoAcid::Cysteine,
    "GLN" => AminoAcid::Glutamine,
    "GLU" => AminoAcid::GlutamicAcid,
    "GLY" => AminoAcid::Glycine,
    "HIS" => AminoAcid::Histidine,
    "ILE" => AminoAcid::Isoleucine,
    "LEU" => AminoAcid::Leucine,
    "LYS" => AminoAcid::Lysine,
    "MET" => AminoAcid::Methionine,
    "PHE" => AminoAcid::Phenylalanine,
    "PRO" => AminoAcid::Proline,
    "SER" => AminoAcid::Serine,
    "THR" => AminoAcid::Threonine,
    "TRP" => AminoAcid::Tryptophan,
    "TYR" => AminoAcid::Tyrosine,
    "VAL" => AminoAcid::Valine,
};

static ONE_LETTER_CODES: Map<&'static str, AminoAcid> = phf_map! {
    "A" => AminoAcid::Alanine,
    "R" => AminoAcid::Arginine,
    "N" => AminoAcid::Asparagine,
    "D" => AminoAcid::AsparticAcid,
    "C" => AminoAcid::Cysteine,
    "Q" => AminoAcid::Glutamine,
    "E" => AminoAcid::GlutamicAcid,
    "G" => AminoAcid::Glycine,
    "H" => AminoAcid::Histidine,
    "I" => AminoAcid::Isoleucine,
    "L" => AminoAcid::Leucine,
    "K" => AminoAcid::Lysine,
    "M" => AminoAcid::Methionine,
    "F" => AminoAcid::Phenylalanine,
    "P" => AminoAcid::Proline,
    "S" => AminoAcid::Serine,
    "T" => AminoAcid::Threonine,
    "W" => AminoAcid::Tryptophan,
    "Y" => AminoAcid::Tyrosine,
    "V" => AminoAcid::Valine,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown amino acid code: '{0}'")]
pub struct ParseAminoAcidError(pub String);

impl AminoAcid {
    pub const ALL: [AminoAcid; 20] = [
        AminoAcid::Alanine,
        AminoAcid::Arginine,
        AminoAcid::Asparagine,
        AminoAcid::AsparticAcid,
        AminoAcid::Cysteine,
        AminoAcid::Glutamine,
        AminoAcid::GlutamicAcid,
        AminoAcid::Glycine,
        AminoAcid::Histidine,
        AminoAcid::Isoleucine,
        AminoAcid::Leucine,
        AminoAcid::Lysine,
        AminoAcid::Methionine,
        AminoAcid::Phenylalanine,
        AminoAcid::Proline,
        AminoAcid::Serine,
        AminoAcid::Threonine,
        AminoAcid::Tryptophan,
        AminoAcid::Tyrosine,
        AminoAcid::Valine,
    ];

    pub fn to_three_letter(self) -> &'static str {
        match self {
            AminoAcid::Alanine => "ALA",
            AminoAcid::Arginine => "ARG",
            AminoAcid::Asparagine => "ASN",
            AminoAcid::AsparticAcid => "ASP",
            AminoAcid::Cysteine => "CYS",
            AminoAcid::Glutamine => "GLN",
            AminoAcid::GlutamicAcid => "GLU",
            AminoAcid::Glycine => "GLY",
            AminoAcid::Histidine => "HIS",
            AminoAcid::Isoleucine => "ILE",
            AminoAcid::Leucine => "LEU",
            AminoAcid::Lysine => "LYS",
            AminoAcid::Methionine => "MET",
            AminoAcid::Phenylalanine => "PHE",
            AminoAcid::Proline => "PRO",
            AminoAcid::Serine => "SER",
            AminoAcid::Threonine => "THR",
            AminoAcid::Tryptophan => "TRP",
            AminoAcid::Tyrosine => "TYR",
            AminoAcid::Valine => "VAL",
        }
    }

    pub fn to_one_letter(self) -> char {
        match self {
            AminoAcid::Alanine => 'A',
            AminoAcid::Arginine => 'R',
            AminoAcid::Asparagine => 'N',
            AminoAcid::AsparticAcid => 'D',
            AminoAcid::Cysteine => 'C',
            AminoAcid::Glutamine => 'Q',
            AminoAcid::GlutamicAcid => 'E',
            AminoAcid::Glycine => 'G',
            AminoAcid::Histidine => 'H',
            AminoAcid::Isoleucine => 'I',
            AminoAcid::Leucine => 'L',
            AminoAcid::Lysine => 'K',
            AminoAcid::Methionine => 'M',
            AminoAcid::Phenylalanine => 'F',
            AminoAcid::Proline => 'P',
            AminoAcid::Serine => 'S',
            AminoAcid::Threonine => 'T',
            AminoAcid::Tryptophan => 'W',
            AminoAcid::Tyrosine => 'Y',
            AminoAcid::Valine => 'V',
        }
    }

    pub fn from_one_letter(code: char) -> Result<Self, ParseAminoAcidError> {
        let mut buf = [0u8; 4];
        let key: &str = code.to_ascii_uppercase().encode_utf8(&mut buf);
        ONE_LETTER_CODES
            .get(key)
            .copied()
            .ok_or_else(|| ParseAminoAcidError(code.to_string()))
    }

    /// Proline's ring closes onto the backbone nitrogen, leaving no amide hydrogen.
    pub fn has_amide_hydrogen(self) -> bool {
        !matches!(self, AminoAcid::Proline)
    }
}

impl FromStr for AminoAcid {
    type Err = ParseAminoAcidError;

    /// Accepts either a three-letter or a one-letter code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase();
        THREE_LETTER_CODES
            .get(key.as_str())
            .or_else(|| ONE_LETTER_CODES.get(key.as_str()))
            .copied()
            .ok_or_else(|| ParseAminoAcidError(s.to_string()))
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_three_letter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub residue_number: isize,              // Segment id, 1-based along the chain
    pub name: String,                       // Three-letter name (e.g., "ALA", "GLY")
    pub amino_acid: Option<AminoAcid>,      // Parsed variant, if the name is standard
    pub chain_id: ChainId,                  // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,          // Atoms in insertion order
    atom_name_map: HashMap<String, AtomId>, // Map from atom name to its stable ID
}

impl Residue {
    pub(crate) fn new(
        residue_number: isize,
        name: &str,
        amino_acid: Option<AminoAcid>,
        chain_id: ChainId,
    ) -> Self {
        Self {
            residue_number,
            name: name.to_string(),
            amino_acid,
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map.insert(atom_name.to_string(), atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }
}
