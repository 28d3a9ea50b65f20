use super::ids::ResidueId;
use nalgebra::Point3;

/// Temperature factor given to every atom the builder creates.
pub const DEFAULT_B_FACTOR: f64 = 0.0;
/// Occupancy given to every physical atom the builder creates.
pub const DEFAULT_OCCUPANCY: f64 = 1.0;

/// Represents the role of an atom within a built peptide.
///
/// The builder assigns roles as atoms are placed, so downstream code can tell
/// the repeating backbone apart from variant-specific side-chain atoms without
/// consulting residue templates again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AtomRole {
    /// Main-chain atom (N, H, CA, C, O).
    Backbone,
    /// Side-chain atom attached beyond CA (CB, CC, ...).
    Sidechain,
    /// Terminal carboxyl oxygen added when a chain is closed.
    Terminal,
    #[default]
    Other,
}

/// Chemical element tag carried by each placed atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    H,
    C,
    N,
    O,
}

/// An atom stored in a [`super::system::MolecularSystem`].
///
/// `b_factor` and `occupancy` are carried through unchanged from the builder;
/// geometry code never reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "CB", "OXT").
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    pub element: Element,
    pub role: AtomRole,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    pub b_factor: f64,
    pub occupancy: f64,
}

impl Atom {
    /// Creates a new `Atom` with the default temperature factor and occupancy.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `element` - The element tag of the atom.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, element: Element, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            residue_id,
            element,
            role: AtomRole::default(),
            position,
            b_factor: DEFAULT_B_FACTOR,
            occupancy: DEFAULT_OCCUPANCY,
        }
    }

    pub fn with_role(mut self, role: AtomRole) -> Self {
        self.role = role;
        self
    }
}
