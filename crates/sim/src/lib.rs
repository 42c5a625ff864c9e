//! # Simulation Crate
//!
//! The `sim` crate provides the core of an age-structured population
//! genetics simulator: diploid genomes with sex-linked chromosomes, a
//! two-phase (smurf) aging model alongside Weibull and Gompertz mortality,
//! genotype-driven aging traits, fitness-weighted mating, and a recorder
//! interface for statistics and pedigree output.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod genome;
pub mod prelude;
pub mod simulation;
pub mod storage;

pub use base::{Allele, FitnessValue};
