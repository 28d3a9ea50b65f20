//! # Core Models Module
//!
//! Data structures for the molecular container that the builder populates:
//! atoms, residues, chains and the system that owns them.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom with element tag, coordinates, temperature factor and occupancy
//! - [`residue`] - Residue record and the closed [`residue::AminoAcid`] enum
//! - [`chain`] - Ordered residue list for one chain letter
//! - [`system`] - Arena-backed container with stable IDs
//! - [`ids`] - Key types for atoms, residues, and chains
//!
//! ## Usage
//!
//! ```ignore
//! use pepforge::core::models::{system::MolecularSystem, atom::{Atom, Element}};
//!
//! let mut system = MolecularSystem::new();
//! let chain_id = system.add_chain('A');
//! let residue_id = system.add_residue(chain_id, 1, "ALA", Some(AminoAcid::Alanine)).unwrap();
//!
//! let atom = Atom::new("CA", residue_id, Element::C, Point3::new(0.0, 0.0, 0.0));
//! system.add_atom_to_residue(residue_id, atom);
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
