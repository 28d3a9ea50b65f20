//! # pepforge
//!
//! A peptide builder that grows protein chains one residue at a time from
//! internal coordinates.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularSystem`), the
//!   closed-form atom placement primitive, residue geometry tables and the
//!   side-chain template evaluator.
//!
//! - **[`engine`]: The Logic Core.** The stateful `ChainAssembler`, which places
//!   each residue in the frame of the previous one and patches the previous
//!   carbonyl oxygen once the new nitrogen is known.
//!
//! - **[`workflows`]: The Public API.** Sequence-level builders such as
//!   `make_extended_structure` and `make_structure`.
//!
//! ## Example
//!
//! ```ignore
//! use pepforge::core::params::GeometryLibrary;
//! use pepforge::engine::AssemblyConfigBuilder;
//! use pepforge::workflows::build::make_extended_structure;
//!
//! let config = AssemblyConfigBuilder::new().terminate(true).build()?;
//! let system = make_extended_structure("ACDG", &GeometryLibrary::standard(), &config)?;
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
