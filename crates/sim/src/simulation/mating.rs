//! The mating scheme: survivor cloning plus fitness-weighted sexual
//! reproduction.
//!
//! Members of the clone categories are carried into the next generation
//! unchanged, one slot each. The slots left under the demographic target
//! are split among the sexual sub-schemes by weight. Each sexual sub-scheme
//! draws a father and a mother with replacement, proportionally to fitness,
//! for every mating event, and the event yields one or more offspring.
//!
//! Parent choice and offspring seeds are drawn sequentially from the main
//! stream. Offspring are then built in parallel, each from its own seeded
//! generator, so the result does not depend on thread scheduling.

use log::{debug, warn};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::classifier::{CategoryId, Classifier};
use super::population::{Demography, Population};
use crate::errors::ConfigError;
use crate::evolution::{MutationModel, RecombinationModel, TraitAssignment};
use crate::genome::{GenomeLayout, Individual, IndividualId, Sex};

/// Offspring per mating event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NumOffspring {
    #[default]
    One,
    Fixed {
        count: usize,
    },
    /// Inclusive range.
    Uniform {
        min: usize,
        max: usize,
    },
}

impl NumOffspring {
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match *self {
            Self::One => 1,
            Self::Fixed { count } => count,
            Self::Uniform { min, max } => rng.random_range(min..=max),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::One => Ok(()),
            Self::Fixed { count } if count > 0 => Ok(()),
            Self::Uniform { min, max } if min > 0 && min <= max => Ok(()),
            other => Err(ConfigError::InvalidParameter(format!(
                "offspring count {other:?} must produce at least one offspring"
            ))),
        }
    }
}

/// Sexual reproduction among the members of some categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SexualScheme {
    /// Categories parents are drawn from.
    pub parents: Vec<String>,
    /// Share of the free slots, relative to the other sexual schemes.
    pub weight: f64,
    #[serde(default)]
    pub offspring: NumOffspring,
}

/// Configuration of the composite mating scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatingConfig {
    /// Categories copied unchanged into the next generation.
    pub clones: Vec<String>,
    pub sexual: Vec<SexualScheme>,
    pub demography: Demography,
}

impl Default for MatingConfig {
    fn default() -> Self {
        Self {
            clones: vec!["larvae".into(), "adults".into(), "smurfs".into()],
            sexual: vec![SexualScheme {
                parents: vec!["adults".into()],
                weight: 1.0,
                offspring: NumOffspring::One,
            }],
            demography: Demography::Warmup {
                generations: 10,
                size: 1000,
            },
        }
    }
}

/// Read-only inputs needed to build an offspring.
#[derive(Debug, Clone, Copy)]
pub struct BreedingContext<'a> {
    pub layout: &'a GenomeLayout,
    pub classifier: &'a Classifier,
    pub recombination: &'a RecombinationModel,
    pub mutation: &'a MutationModel,
    /// Newborns in these categories are mutated. `None` means every newborn.
    pub mutation_targets: Option<&'a [CategoryId]>,
    pub traits: &'a TraitAssignment,
}

#[derive(Debug, Clone)]
struct CompiledSexual {
    parents: Vec<CategoryId>,
    weight: f64,
    offspring: NumOffspring,
}

/// One planned birth: store indices of the parents and a private seed.
#[derive(Debug, Clone, Copy)]
struct Birth {
    father: usize,
    mother: usize,
    seed: u64,
}

/// Fitness-proportional draw with a uniform fallback when every weight is 0.
enum ParentSampler {
    Weighted(WeightedIndex<f64>),
    Uniform(usize),
}

impl ParentSampler {
    fn new(weights: &[f64]) -> Self {
        match WeightedIndex::new(weights) {
            Ok(dist) => Self::Weighted(dist),
            Err(_) => Self::Uniform(weights.len()),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self {
            Self::Weighted(dist) => dist.sample(rng),
            Self::Uniform(n) => rng.random_range(0..*n),
        }
    }
}

/// Result of one round of mating.
#[derive(Debug, Clone)]
pub struct Brood {
    /// Clones followed by offspring, sorted by id.
    pub next: Vec<Individual>,
    pub clones: usize,
    pub offspring: usize,
    pub target: usize,
}

impl Brood {
    /// The newborns of this round.
    pub fn newborns(&self) -> &[Individual] {
        &self.next[self.clones..]
    }
}

/// Compiled mating scheme.
#[derive(Debug, Clone)]
pub struct MatingScheme {
    clones: Vec<CategoryId>,
    sexual: Vec<CompiledSexual>,
    demography: Demography,
}

impl MatingScheme {
    /// Resolve category names against `classifier` and check the sub-schemes.
    pub fn new(config: &MatingConfig, classifier: &Classifier) -> Result<Self, ConfigError> {
        let clones = classifier.ids(&config.clones)?;
        let mut sexual = Vec::with_capacity(config.sexual.len());
        for scheme in &config.sexual {
            if !(scheme.weight.is_finite() && scheme.weight > 0.0) {
                return Err(ConfigError::InvalidParameter(format!(
                    "sexual scheme weight must be positive, got {}",
                    scheme.weight
                )));
            }
            scheme.offspring.validate()?;
            sexual.push(CompiledSexual {
                parents: classifier.ids(&scheme.parents)?,
                weight: scheme.weight,
                offspring: scheme.offspring,
            });
        }
        if clones.is_empty() && sexual.is_empty() {
            return Err(ConfigError::InvalidParameter(
                "mating scheme has neither clone categories nor sexual schemes".into(),
            ));
        }
        if let Demography::Constant { size: 0 } | Demography::Warmup { size: 0, .. } = config.demography {
            return Err(ConfigError::InvalidPopulationSize(0));
        }
        Ok(Self {
            clones,
            sexual,
            demography: config.demography,
        })
    }

    pub fn demography(&self) -> &Demography {
        &self.demography
    }

    /// Split `slots` among the sexual schemes in proportion to their weights.
    ///
    /// Floors first, then the leftover slots go one by one to the schemes in
    /// declaration order.
    fn quotas(&self, slots: usize) -> Vec<usize> {
        let total: f64 = self.sexual.iter().map(|s| s.weight).sum();
        if self.sexual.is_empty() || total <= 0.0 {
            return vec![0; self.sexual.len()];
        }
        let mut quotas: Vec<usize> = self
            .sexual
            .iter()
            .map(|s| (slots as f64 * s.weight / total).floor() as usize)
            .collect();
        let left = slots.saturating_sub(quotas.iter().sum());
        let n = quotas.len();
        for i in 0..left {
            quotas[i % n] += 1;
        }
        quotas
    }

    /// Plan the births of one sexual scheme.
    fn plan_births<R: Rng + ?Sized>(
        scheme: &CompiledSexual,
        quota: usize,
        individuals: &[Individual],
        classifier: &Classifier,
        rng: &mut R,
    ) -> Vec<Birth> {
        if quota == 0 {
            return Vec::new();
        }
        let members = classifier.members(individuals, &scheme.parents);
        let (fathers, mothers): (Vec<usize>, Vec<usize>) = members
            .into_iter()
            .partition(|&i| individuals[i].sex() == Sex::Male);
        if fathers.is_empty() || mothers.is_empty() {
            debug!(
                "No breeding pair available ({} males, {} females); skipping {} births",
                fathers.len(),
                mothers.len(),
                quota
            );
            return Vec::new();
        }

        let weights = |group: &[usize]| -> Vec<f64> {
            group.iter().map(|&i| individuals[i].fitness().get()).collect()
        };
        let father_sampler = ParentSampler::new(&weights(&fathers));
        let mother_sampler = ParentSampler::new(&weights(&mothers));

        let mut births = Vec::with_capacity(quota);
        while births.len() < quota {
            let father = fathers[father_sampler.sample(rng)];
            let mother = mothers[mother_sampler.sample(rng)];
            let count = scheme.offspring.draw(rng).min(quota - births.len());
            for _ in 0..count {
                births.push(Birth {
                    father,
                    mother,
                    seed: rng.random(),
                });
            }
        }
        births
    }

    /// Build one offspring from its planned birth. Its id is assigned later.
    fn breed(birth: &Birth, individuals: &[Individual], ctx: &BreedingContext<'_>, birthday: usize) -> Individual {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(birth.seed);
        let father = &individuals[birth.father];
        let mother = &individuals[birth.mother];

        let sex = if rng.random::<f64>() < 0.5 {
            Sex::Male
        } else {
            Sex::Female
        };
        let genotype = ctx
            .recombination
            .transmit(mother, father, sex, ctx.layout, &mut rng);

        let mut child = Individual::offspring(
            0,
            sex,
            genotype,
            *mother.traits(),
            father.id(),
            mother.id(),
            birthday,
        );

        let targeted = match ctx.mutation_targets {
            Some(ids) => ctx.classifier.classify(&child).intersects(ids),
            None => true,
        };
        if targeted {
            ctx.mutation.mutate(child.genotype_mut(), &mut rng);
        }

        let traits = ctx
            .traits
            .assign_traits(child.genotype(), child.sex(), ctx.layout);
        child.set_traits(traits);
        child
    }

    /// Produce the next generation from the current survivors.
    ///
    /// Ages, smurf flags and fitness must already be up to date. New ids are
    /// taken from `population` in birth order.
    pub fn mate<R: Rng + ?Sized>(
        &self,
        population: &mut Population,
        ctx: &BreedingContext<'_>,
        rng: &mut R,
    ) -> Brood {
        let generation = population.generation();
        let target = self.demography.target(generation, population.size());

        let individuals = population.individuals();
        let clone_idx = ctx.classifier.members(individuals, &self.clones);
        let clones: Vec<Individual> = clone_idx.iter().map(|&i| individuals[i].clone()).collect();

        if clones.len() > target {
            warn!(
                "Generation {generation}: {} survivors exceed the target size {target}; no offspring produced",
                clones.len()
            );
        }
        let free = target.saturating_sub(clones.len());

        let mut births = Vec::new();
        for (scheme, quota) in self.sexual.iter().zip(self.quotas(free)) {
            births.extend(Self::plan_births(scheme, quota, individuals, ctx.classifier, rng));
        }

        let mut offspring: Vec<Individual> = births
            .par_iter()
            .map(|birth| Self::breed(birth, individuals, ctx, generation))
            .collect();

        for child in &mut offspring {
            let id: IndividualId = population.allocate_id();
            child.set_id(id);
        }

        let n_clones = clones.len();
        let n_offspring = offspring.len();
        let mut next = clones;
        next.append(&mut offspring);

        Brood {
            next,
            clones: n_clones,
            offspring: n_offspring,
            target,
        }
    }
}
