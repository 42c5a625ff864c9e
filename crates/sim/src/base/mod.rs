//! Base value types.
//!
//! This module provides the allele states stored at every locus and the
//! bounded reproduction weight used by parent selection.

mod allele;
pub mod fitness;

pub use allele::Allele;
pub use fitness::FitnessValue;
