//! Genome structures: chromosome layout, diploid genotypes and individuals.

mod chromosome;
mod genotype;
mod individual;

pub use chromosome::{ChromosomeSpec, ChromosomeType, GenomeLayout};
pub use genotype::Genotype;
pub use individual::{AgingTraits, Individual, IndividualId, Sex, FOUNDER_PARENT};
