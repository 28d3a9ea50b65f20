//! # Workflows Module
//!
//! High-level entry points that turn a sequence or a list of residue
//! geometries into a finished [`crate::core::models::system::MolecularSystem`].
//!
//! ## Architecture
//!
//! - **Sequence Builders** ([`build`]) - Extended strands, explicit backbone
//!   torsions, and per-residue geometry lists, all driven through the
//!   [`crate::engine::assembler::ChainAssembler`]
//!
//! Each workflow initializes the chain with its first residue, extends it once
//! per remaining residue, and adds the terminal OXT when the configuration
//! asks for it.

pub mod build;
