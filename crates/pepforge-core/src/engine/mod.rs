//! # Engine Module
//!
//! The stateful chain assembly protocol. A [`assembler::ChainAssembler`] owns
//! one growing chain and moves it through
//! `Empty → Initialized → Extended(n) → Terminated`, placing each residue in
//! the frame of the one before it.
//!
//! ## Architecture
//!
//! - **Assembly** ([`assembler`]) - `initialize`, `extend` and `close`, including the
//!   retroactive carbonyl-oxygen patch applied to the previous residue
//! - **Configuration** ([`config`]) - Chain letter, numbering, OXT bond length and
//!   degeneracy tolerance, built through [`config::AssemblyConfigBuilder`]
//! - **Error Handling** ([`error`]) - [`error::EngineError`] covering degenerate
//!   geometry, unknown variants and protocol violations
//!
//! Extension is strictly sequential: residue *i*'s carbonyl oxygen is only
//! final once residue *i + 1* has been placed.

pub mod assembler;
pub mod config;
pub mod error;

pub use assembler::{CarbonylOxygen, ChainAssembler, ChainState};
pub use config::{AssemblyConfig, AssemblyConfigBuilder, CarbonylDihedral, ConfigError};
pub use error::EngineError;
