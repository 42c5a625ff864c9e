use serde::{Deserialize, Serialize};

use crate::genome::AgingTraits;

/// Recording strategy for when to write a statistics line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordingStrategy {
    /// Record every N generations.
    EveryN(usize),

    /// Record at specific generations.
    Specific(Vec<usize>),

    /// Record all generations.
    All,

    /// No recording.
    None,
}

impl RecordingStrategy {
    /// Check if generation should be recorded
    pub fn should_record(&self, generation: usize) -> bool {
        match self {
            Self::EveryN(0) => false,
            Self::EveryN(n) => generation.is_multiple_of(*n),
            Self::Specific(gens) => gens.contains(&generation),
            Self::All => true,
            Self::None => false,
        }
    }
}

impl Default for RecordingStrategy {
    fn default() -> Self {
        Self::EveryN(10)
    }
}

/// One or more columns of the statistics stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stat", rename_all = "snake_case")]
pub enum Statistic {
    /// Live individuals.
    PopulationSize,
    /// Members of a category.
    Size { category: String },
    /// Mean age within a category.
    MeanAge { category: String },
    /// Oldest age within a category.
    MaxAge { category: String },
    /// Mean trait `a` within a category.
    MeanA { category: String },
    /// Mutant frequency at one locus.
    AlleleFrequency { locus: usize },
    /// Mutant frequency at every locus, one column each.
    AlleleFrequencies,
    /// Mean mutant frequency over the loci of one chromosome.
    MeanAlleleFrequency { chromosome: String },
}

/// Trait values that can be tracked in the pedigree log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitField {
    A,
    B,
    T0,
}

impl TraitField {
    pub fn value(self, traits: &AgingTraits) -> Option<f64> {
        match self {
            Self::A => Some(traits.a),
            Self::B => Some(traits.b),
            Self::T0 => traits.t0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::T0 => "t0",
        }
    }
}

/// What the pedigree log carries beyond ids, sex and birthday.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PedigreeConfig {
    #[serde(default)]
    pub traits: Vec<TraitField>,
    /// Global loci whose alleles are written for every birth.
    #[serde(default)]
    pub loci: Vec<usize>,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingConfig {
    pub statistics: Vec<Statistic>,
    pub every: RecordingStrategy,
    #[serde(default)]
    pub pedigree: PedigreeConfig,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            statistics: vec![
                Statistic::PopulationSize,
                Statistic::Size {
                    category: "larvae".into(),
                },
                Statistic::Size {
                    category: "adults".into(),
                },
                Statistic::Size {
                    category: "smurfs".into(),
                },
                Statistic::MeanAge {
                    category: "males".into(),
                },
                Statistic::MeanAge {
                    category: "females".into(),
                },
                Statistic::MeanA {
                    category: "males".into(),
                },
                Statistic::MeanA {
                    category: "females".into(),
                },
                Statistic::AlleleFrequencies,
            ],
            every: RecordingStrategy::default(),
            pedigree: PedigreeConfig {
                traits: vec![TraitField::A],
                loci: vec![0],
            },
        }
    }
}
