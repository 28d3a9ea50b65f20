use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::{AminoAcid, Residue};
use nalgebra::Point3;
use slotmap::SlotMap;
use std::collections::HashMap;

/// A single structure model holding chains, residues and atoms.
///
/// This is the container the builder populates. It only grows: residues are
/// appended to chains and atoms to residues, and the one in-place edit the
/// builder performs goes through [`MolecularSystem::atom_mut`].
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms using a slot map for efficient ID management.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues using a slot map for efficient ID management.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains using a slot map for efficient ID management.
    chains: SlotMap<ChainId, Chain>,
    /// Lookup map for finding residues by chain ID and residue number.
    residue_id_map: HashMap<(ChainId, isize), ResidueId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The atom ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the atom exists, otherwise `None`.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Retrieves a mutable reference to an atom by its ID.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over all chains in the system.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chains.iter()
    }

    /// Finds a chain ID by its single-character identifier.
    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue ID by its chain ID and residue number.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain containing the residue.
    /// * `residue_number` - The sequential number of the residue.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if the residue exists, otherwise `None`.
    pub fn find_residue_by_id(
        &self,
        chain_id: ChainId,
        residue_number: isize,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, residue_number))
            .copied()
    }

    /// The most recently appended residue of a chain.
    pub fn last_residue(&self, chain_id: ChainId) -> Option<ResidueId> {
        self.chains.get(chain_id)?.last_residue()
    }

    /// Looks up an atom by name within one residue.
    pub fn atom_by_name(&self, residue_id: ResidueId, name: &str) -> Option<&Atom> {
        let atom_id = self.residues.get(residue_id)?.get_atom_id_by_name(name)?;
        self.atoms.get(atom_id)
    }

    /// Convenience accessor for the coordinate of a named atom.
    pub fn atom_position(&self, residue_id: ResidueId, name: &str) -> Option<Point3<f64>> {
        self.atom_by_name(residue_id, name).map(|atom| atom.position)
    }

    /// Returns the atoms of a residue in insertion order.
    pub fn residue_atoms(&self, residue_id: ResidueId) -> impl Iterator<Item = &Atom> {
        self.residues
            .get(residue_id)
            .into_iter()
            .flat_map(|residue| residue.atoms().iter())
            .filter_map(|&atom_id| self.atoms.get(atom_id))
    }

    /// Adds a new chain to the system or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given ID already exists,
    /// it returns the existing chain ID without creating a duplicate.
    pub fn add_chain(&mut self, id: char) -> ChainId {
        *self
            .chain_id_map
            .entry(id)
            .or_insert_with(|| self.chains.insert(Chain::new(id)))
    }

    /// Appends a new residue to a chain or returns the existing one.
    ///
    /// This method is idempotent; if a residue with the given chain ID and
    /// residue number already exists, it returns the existing residue ID.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if successful, otherwise `None` (e.g., if chain doesn't exist).
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        name: &str,
        amino_acid: Option<AminoAcid>,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, residue_number);

        let residue_id = *self.residue_id_map.entry(key).or_insert_with(|| {
            let residue = Residue::new(residue_number, name, amino_acid, chain_id);
            self.residues.insert(residue)
        });

        if !chain.residues.contains(&residue_id) {
            chain.residues.push(residue_id);
        }

        Some(residue_id)
    }

    /// Appends an atom to a specific residue.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (e.g., if residue doesn't exist).
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }

        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        self.residues.get_mut(residue_id)?.add_atom(&name, atom_id);

        Some(atom_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Element;

    fn system_with_two_residues() -> (MolecularSystem, ChainId, ResidueId, ResidueId) {
        let mut system = MolecularSystem::new();
        let chain_id = system.add_chain('A');
        let ala = system
            .add_residue(chain_id, 1, "ALA", Some(AminoAcid::Alanine))
            .unwrap();
        let gly = system
            .add_residue(chain_id, 2, "GLY", Some(AminoAcid::Glycine))
            .unwrap();
        system
            .add_atom_to_residue(ala, Atom::new("N", ala, Element::N, Point3::origin()))
            .unwrap();
        system
            .add_atom_to_residue(
                ala,
                Atom::new("CA", ala, Element::C, Point3::new(1.46, 0.0, 0.0)),
            )
            .unwrap();
        (system, chain_id, ala, gly)
    }

    #[test]
    fn add_chain_is_idempotent() {
        let mut system = MolecularSystem::new();
        let first = system.add_chain('A');
        let second = system.add_chain('A');
        assert_eq!(first, second);
        assert_eq!(system.chains_iter().count(), 1);
        assert_eq!(system.find_chain_by_id('A'), Some(first));
        assert_eq!(system.find_chain_by_id('B'), None);
    }

    #[test]
    fn add_residue_appends_in_order_and_is_idempotent() {
        let (mut system, chain_id, ala, gly) = system_with_two_residues();
        let again = system
            .add_residue(chain_id, 1, "ALA", Some(AminoAcid::Alanine))
            .unwrap();
        assert_eq!(again, ala);
        assert_eq!(system.chain(chain_id).unwrap().residues(), &[ala, gly]);
        assert_eq!(system.last_residue(chain_id), Some(gly));
        assert_eq!(system.find_residue_by_id(chain_id, 2), Some(gly));
    }

    #[test]
    fn add_residue_fails_for_missing_chain() {
        let mut system = MolecularSystem::new();
        system.add_chain('A');
        assert!(system.add_residue(ChainId::default(), 1, "GLY", None).is_none());
        assert!(system.residue_atoms(ResidueId::default()).next().is_none());
    }

    #[test]
    fn atom_lookup_by_name_resolves_within_residue() {
        let (system, _, ala, gly) = system_with_two_residues();
        assert_eq!(
            system.atom_position(ala, "CA"),
            Some(Point3::new(1.46, 0.0, 0.0))
        );
        assert!(system.atom_by_name(gly, "CA").is_none());
        let names: Vec<_> = system
            .residue_atoms(ala)
            .map(|atom| atom.name.as_str())
            .collect();
        assert_eq!(names, vec!["N", "CA"]);
        assert_eq!(system.atom_count(), 2);
    }

    #[test]
    fn atom_mut_updates_position_in_place() {
        let (mut system, _, ala, _) = system_with_two_residues();
        let n_id = system.residue(ala).unwrap().get_atom_id_by_name("N").unwrap();
        system.atom_mut(n_id).unwrap().position = Point3::new(0.0, 1.0, 0.0);
        assert_eq!(system.atom_position(ala, "N"), Some(Point3::new(0.0, 1.0, 0.0)));
    }
}
