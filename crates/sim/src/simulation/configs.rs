//! Simulation configuration.
//!
//! The master [`Configuration`] can be written to and read from JSON to fully
//! reproduce a run. [`Configuration::validate`] rejects every inconsistency
//! before the first tick.

use std::io;

use serde::{Deserialize, Serialize};

use super::classifier::{ClassificationConfig, Classifier};
use super::mating::{MatingConfig, MatingScheme};
use crate::errors::ConfigError;
use crate::evolution::{
    AgeFecundity, AgingConfig, BRule, FitnessModel, GenotypeSelection, MutationModel,
    RecombinationModel, SelectionCoefficient, TraitAssignment, TraitModel,
};
use crate::genome::{ChromosomeSpec, GenomeLayout, Sex};
use crate::storage::{PedigreeRecorder, RecordingConfig, StatisticsRecorder};

/// The master configuration struct.
/// Can be deserialized from a file to fully reproduce a simulation setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub execution: ExecutionConfig,
    pub genome: GenomeConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub aging: AgingConfig,
    pub evolution: EvolutionConfig,
    #[serde(default)]
    pub mating: MatingConfig,
    #[serde(default)]
    pub initialization: InitializationConfig,
    #[serde(default)]
    pub recording: RecordingConfig,
}

/// High-level run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Number of founders
    pub population_size: usize,
    /// Number of ticks to simulate
    pub total_generations: usize,
    /// Optional RNG seed for reproducibility
    #[serde(default)]
    pub seed: Option<u64>,
    /// Independent replicates with non-overlapping random streams
    #[serde(default = "default_replicates")]
    pub replicates: usize,
    /// Stop early once every locus is monomorphic
    #[serde(default)]
    pub stop_on_fixation: bool,
}

fn default_replicates() -> usize {
    1
}

impl ExecutionConfig {
    pub fn new(population_size: usize, total_generations: usize, seed: Option<u64>) -> Self {
        Self {
            population_size,
            total_generations,
            seed,
            replicates: 1,
            stop_on_fixation: false,
        }
    }
}

/// Chromosomes in genome order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeConfig {
    pub chromosomes: Vec<ChromosomeSpec>,
}

impl GenomeConfig {
    pub fn layout(&self) -> Result<GenomeLayout, ConfigError> {
        GenomeLayout::new(self.chromosomes.clone())
    }
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            chromosomes: vec![ChromosomeSpec::x(1)],
        }
    }
}

/// Grouped genetic parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    #[serde(default)]
    pub mutation: MutationModel,
    /// Categories whose newborns are mutated. `None` mutates every newborn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation_targets: Option<Vec<String>>,
    pub recombination: RecombinationModel,
    pub traits: TraitAssignment,
    #[serde(default)]
    pub fitness: FitnessModel,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation: MutationModel::none(),
            mutation_targets: None,
            recombination: RecombinationModel {
                maternal: vec![0.5],
                paternal: vec![0.5],
            },
            traits: TraitAssignment::new(TraitModel::LocusEffect {
                locus: 0,
                sex: Sex::Male,
                base_a: 0.0039,
                effect: 0.0013,
                b: BRule::Constant { b: -0.019 },
            })
            .with_onset(),
            fitness: FitnessModel {
                age: AgeFecundity::parabola(),
                genotype: Some(GenotypeSelection {
                    locus: 0,
                    female: Some(SelectionCoefficient::new(0.061168, 0.5)),
                    male: None,
                }),
            },
        }
    }
}

/// Age of the founders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FounderAge {
    /// Everybody starts as a newborn.
    #[default]
    Zero,
    /// Uniform over `0..=max`.
    Uniform { max: u32 },
}

/// How founders are generated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitializationConfig {
    /// Probability that an expressed founder allele is mutant
    pub mutant_frequency: f64,
    #[serde(default)]
    pub age: FounderAge,
}

impl Default for InitializationConfig {
    fn default() -> Self {
        Self {
            mutant_frequency: 0.5,
            age: FounderAge::Zero,
        }
    }
}

impl Configuration {
    /// Default model with the given size and run length.
    pub fn new(population_size: usize, total_generations: usize) -> Self {
        Self {
            execution: ExecutionConfig::new(population_size, total_generations, None),
            ..Self::default()
        }
    }

    /// Check the whole configuration.
    ///
    /// Returns the genome layout and the compiled classifier on success,
    /// since both are needed by every consumer of a valid configuration.
    pub fn validate(&self) -> Result<(GenomeLayout, Classifier), ConfigError> {
        if self.execution.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize(0));
        }
        if self.execution.replicates == 0 {
            return Err(ConfigError::InvalidParameter(
                "at least one replicate is required".into(),
            ));
        }

        let layout = self.genome.layout()?;
        let classifier = Classifier::new(&self.classification)?;

        self.aging.mortality.validate()?;
        self.evolution.mutation.validate(&layout)?;
        if let Some(targets) = &self.evolution.mutation_targets {
            classifier.ids(targets)?;
        }
        self.evolution.recombination.validate(&layout)?;
        self.evolution.traits.validate(&layout)?;
        self.evolution.fitness.validate(&layout)?;

        MatingScheme::new(&self.mating, &classifier)?;

        let q = self.initialization.mutant_frequency;
        if !(0.0..=1.0).contains(&q) {
            return Err(ConfigError::InvalidProbability {
                name: "mutant frequency",
                value: q,
            });
        }

        StatisticsRecorder::new(io::sink(), &self.recording, &classifier, &layout)?;
        PedigreeRecorder::new(io::sink(), &self.recording.pedigree, &layout)?;

        Ok((layout, classifier))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON. The result still has to be validated.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            execution: ExecutionConfig::new(1000, 100, None),
            genome: GenomeConfig::default(),
            classification: ClassificationConfig::default(),
            aging: AgingConfig::default(),
            evolution: EvolutionConfig::default(),
            mating: MatingConfig::default(),
            initialization: InitializationConfig::default(),
            recording: RecordingConfig::default(),
        }
    }
}
