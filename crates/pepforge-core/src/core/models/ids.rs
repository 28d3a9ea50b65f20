use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to an atom stored in a [`super::system::MolecularSystem`].
    pub struct AtomId;
    /// Stable handle to a residue; survives later appends to the same chain.
    pub struct ResidueId;
    pub struct ChainId;
}
