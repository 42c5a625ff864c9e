//! Builder pattern for creating simulations.
//!
//! Provides a fluent API over [`Configuration`] with the standard aging model
//! as defaults. Everything is validated on [`SimulationBuilder::build`].

use crate::errors::{ConfigError, SimulationError};
use crate::evolution::{
    FitnessModel, MortalityKind, MortalityModel, MutationModel, RecombinationModel, SmurfOnset,
    TraitAssignment,
};
use crate::genome::ChromosomeSpec;
use crate::simulation::{
    ClassificationConfig, Configuration, Demography, FounderAge, MatingConfig, NumOffspring,
    Simulation,
};
use crate::storage::RecordingConfig;

/// Builder for constructing [`Simulation`] instances with a fluent API.
///
/// # Examples
///
/// ```
/// use agepop_sim::simulation::SimulationBuilder;
/// use agepop_sim::evolution::MortalityModel;
///
/// let sim = SimulationBuilder::new()
///     .population_size(100)
///     .generations(50)
///     .mortality(MortalityModel::TwoPhases { k: 0.2 })
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(sim.population().size(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    // Required parameters
    population_size: Option<usize>,
    generations: Option<usize>,

    // Rates default to 0.5 on every chromosome when not given
    recombination: Option<RecombinationModel>,

    config: Configuration,
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationBuilder {
    /// Create a new simulation builder with default values.
    pub fn new() -> Self {
        Self {
            population_size: None,
            generations: None,
            recombination: None,
            config: Configuration::default(),
        }
    }

    /// Set the number of founders (required).
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = Some(size);
        self
    }

    /// Set the number of ticks to run (required).
    pub fn generations(mut self, generations: usize) -> Self {
        self.generations = Some(generations);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.execution.seed = Some(seed);
        self
    }

    pub fn replicates(mut self, replicates: usize) -> Self {
        self.config.execution.replicates = replicates;
        self
    }

    pub fn stop_on_fixation(mut self, stop: bool) -> Self {
        self.config.execution.stop_on_fixation = stop;
        self
    }

    /// Replace the genome.
    pub fn chromosomes(mut self, chromosomes: Vec<ChromosomeSpec>) -> Self {
        self.config.genome.chromosomes = chromosomes;
        self
    }

    pub fn classification(mut self, classification: ClassificationConfig) -> Self {
        self.config.classification = classification;
        self
    }

    pub fn mortality(mut self, model: MortalityModel) -> Self {
        self.config.aging.mortality = model;
        self
    }

    /// Select a mortality model by name, e.g. from a command line.
    ///
    /// `k` is only used by the two-phase model.
    pub fn mortality_named(self, name: &str, k: f64) -> Result<Self, ConfigError> {
        let kind: MortalityKind = name.parse()?;
        Ok(self.mortality(MortalityModel::from_kind(kind, k)))
    }

    pub fn smurf_onset(mut self, onset: SmurfOnset) -> Self {
        self.config.aging.onset = onset;
        self
    }

    /// Mutation on every locus at `rate`.
    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.config.evolution.mutation = MutationModel {
            rate,
            loci: None,
        };
        self
    }

    pub fn mutation(mut self, mutation: MutationModel) -> Self {
        self.config.evolution.mutation = mutation;
        self
    }

    /// Only newborns in these categories are mutated.
    pub fn mutation_targets(mut self, categories: Vec<String>) -> Self {
        self.config.evolution.mutation_targets = Some(categories);
        self
    }

    pub fn recombination(mut self, recombination: RecombinationModel) -> Self {
        self.recombination = Some(recombination);
        self
    }

    pub fn traits(mut self, traits: TraitAssignment) -> Self {
        self.config.evolution.traits = traits;
        self
    }

    pub fn fitness(mut self, fitness: FitnessModel) -> Self {
        self.config.evolution.fitness = fitness;
        self
    }

    pub fn mating(mut self, mating: MatingConfig) -> Self {
        self.config.mating = mating;
        self
    }

    pub fn demography(mut self, demography: Demography) -> Self {
        self.config.mating.demography = demography;
        self
    }

    /// Offspring per mating event, for every sexual sub-scheme.
    pub fn offspring(mut self, offspring: NumOffspring) -> Self {
        for scheme in &mut self.config.mating.sexual {
            scheme.offspring = offspring;
        }
        self
    }

    pub fn mutant_frequency(mut self, q: f64) -> Self {
        self.config.initialization.mutant_frequency = q;
        self
    }

    pub fn founder_age(mut self, age: FounderAge) -> Self {
        self.config.initialization.age = age;
        self
    }

    pub fn recording(mut self, recording: RecordingConfig) -> Self {
        self.config.recording = recording;
        self
    }

    /// Assemble and validate the configuration without creating founders.
    pub fn build_config(self) -> Result<Configuration, ConfigError> {
        // Validate required parameters
        let population_size = self
            .population_size
            .ok_or(ConfigError::MissingRequired("population_size"))?;
        let generations = self
            .generations
            .ok_or(ConfigError::MissingRequired("generations"))?;

        let mut config = self.config;
        config.execution.population_size = population_size;
        config.execution.total_generations = generations;
        config.evolution.recombination = match self.recombination {
            Some(model) => model,
            None => RecombinationModel::uniform(0.5, config.genome.chromosomes.len())?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Build and validate the simulation.
    pub fn build(self) -> Result<Simulation, SimulationError> {
        Simulation::new(self.build_config()?)
    }
}
