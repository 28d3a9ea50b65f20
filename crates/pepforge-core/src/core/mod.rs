//! # Core Module
//!
//! Stateless building blocks for peptide construction.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains and the
//!   arena-backed system that owns them
//! - **Geometry** ([`geometry`]) - Placement of one atom from three references
//!   plus bond length, bond angle and dihedral, and the matching measurements
//! - **Geometry Parameters** ([`params`]) - Internal-coordinate tables for the 20
//!   standard residues, with TOML overrides
//! - **Residue Templates** ([`templates`]) - Per-variant side-chain placement steps
//!   and the evaluator that runs them on a placed backbone
//!
//! Data flows one way: templates call the placement primitive once per atom, and
//! the engine calls the templates once per residue.

pub mod geometry;
pub mod models;
pub mod params;
pub mod templates;
