//! Simulation engine and population management.
//!
//! - [`Population`]: the individual store, sorted by id.
//! - [`Classifier`]: virtual subpopulations computed from age, sex and the
//!   smurf flag.
//! - [`MatingScheme`]: survivor cloning plus fitness-weighted sexual
//!   reproduction.
//! - [`Simulation`]: the tick loop, driven by one seeded stream.
//! - [`SimulationBuilder`]: fluent builder with the standard defaults.

pub mod builder;
pub mod classifier;
pub mod configs;
pub mod engine;
pub mod initialization;
pub mod mating;
pub mod population;
pub mod replicates;

pub use builder::SimulationBuilder;
pub use classifier::{
    CategoryDef, CategoryId, CategorySet, ClassificationConfig, Classifier, Splitter,
};
pub use configs::{
    Configuration, EvolutionConfig, ExecutionConfig, FounderAge, GenomeConfig,
    InitializationConfig,
};
pub use engine::{RunSummary, Simulation, StopReason, TickSummary};
pub use initialization::initialize;
pub use mating::{BreedingContext, Brood, MatingConfig, MatingScheme, NumOffspring, SexualScheme};
pub use population::{Demography, Population};
pub use replicates::{replicate_streams, run_replicates, ReplicateOutcome};
