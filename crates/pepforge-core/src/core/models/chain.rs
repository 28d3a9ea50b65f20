use super::ids::ResidueId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: char,                        // Chain identifier (e.g., 'A', 'B')
    pub(crate) residues: Vec<ResidueId>, // Ordered list of residue IDs belonging to this chain
}

impl Chain {
    pub(crate) fn new(id: char) -> Self {
        Self {
            id,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }

    /// The most recently appended residue, which the assembler uses as its
    /// reference frame.
    pub fn last_residue(&self) -> Option<ResidueId> {
        self.residues.last().copied()
    }
}
