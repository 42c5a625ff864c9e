//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use agepop_sim::prelude::*;
//!
//! let mut sim = SimulationBuilder::new()
//!     .population_size(20)
//!     .generations(5)
//!     .seed(1)
//!     .build()
//!     .unwrap();
//! let summary = sim.run(&mut MemoryRecorder::new()).unwrap();
//! assert_eq!(summary.generations, 5);
//! ```

pub use crate::base::{Allele, FitnessValue};
pub use crate::errors::{ConfigError, PedigreeError, SimulationError, StorageError};
pub use crate::evolution::{
    AgingConfig, FitnessModel, MortalityModel, MutationModel, RecombinationModel, SmurfOnset,
    TraitAssignment, TraitModel,
};
pub use crate::genome::{AgingTraits, ChromosomeSpec, GenomeLayout, Genotype, Individual, Sex};
pub use crate::simulation::{
    Classifier, Configuration, Demography, Population, Simulation, SimulationBuilder,
};
pub use crate::storage::{
    MemoryRecorder, PedigreeRecorder, PedigreeReplay, Recorder, StatisticsRecorder,
};
