//! Simulation engine.
//!
//! One tick runs, in this order: luck and death draws for every individual
//! in store order, the smurf onset rule, mortality and culling, aging,
//! fitness, mating, replacement of the live set, and recording.

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use super::classifier::{CategoryId, Classifier};
use super::configs::Configuration;
use super::initialization::initialize;
use super::mating::{BreedingContext, MatingScheme};
use super::population::Population;
use crate::errors::SimulationError;
use crate::genome::GenomeLayout;
use crate::storage::Recorder;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummary {
    /// Generation number after the tick.
    pub generation: usize,
    pub new_smurfs: usize,
    pub deaths: usize,
    pub clones: usize,
    pub offspring: usize,
    /// Demographic target of the tick.
    pub target: usize,
    /// Size of the new live set.
    pub size: usize,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every configured tick ran.
    Completed,
    /// The population died out.
    Extinct,
    /// Every locus became monomorphic.
    Fixed,
}

/// Outcome of [`Simulation::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub generations: usize,
    pub final_size: usize,
    /// Founders plus offspring.
    pub births: usize,
    pub stop: StopReason,
}

/// Main simulation engine.
#[derive(Debug)]
pub struct Simulation {
    config: Configuration,
    layout: GenomeLayout,
    classifier: Classifier,
    mating: MatingScheme,
    mutation_targets: Option<Vec<CategoryId>>,
    population: Population,
    /// Random number generator (using Xoshiro256++ for better performance)
    rng: Xoshiro256PlusPlus,
    founders_recorded: bool,
    births: usize,
}

impl Simulation {
    /// Validate `config` and create the founders.
    ///
    /// Without a configured seed, a seed is drawn from the thread RNG and
    /// written back into the stored configuration so the run can be repeated.
    pub fn new(mut config: Configuration) -> Result<Self, SimulationError> {
        let seed = *config
            .execution
            .seed
            .get_or_insert_with(|| rand::rng().random());
        Self::with_rng(config, Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    /// Create a simulation driven by an explicit generator.
    pub fn with_rng(
        config: Configuration,
        mut rng: Xoshiro256PlusPlus,
    ) -> Result<Self, SimulationError> {
        let (layout, classifier) = config.validate()?;
        let mating = MatingScheme::new(&config.mating, &classifier)?;
        let mutation_targets = config
            .evolution
            .mutation_targets
            .as_ref()
            .map(|names| classifier.ids(names))
            .transpose()?;
        let population = initialize(&config, &layout, &mut rng)?;

        Ok(Self {
            config,
            layout,
            classifier,
            mating,
            mutation_targets,
            population,
            rng,
            founders_recorded: false,
            births: 0,
        })
    }

    /// Get the current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Get the current generation number.
    pub fn generation(&self) -> usize {
        self.population.generation()
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn layout(&self) -> &GenomeLayout {
        &self.layout
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Report the founders and the initial state once.
    fn record_founders<R: Recorder + ?Sized>(&mut self, recorder: &mut R) -> Result<(), SimulationError> {
        if self.founders_recorded {
            return Ok(());
        }
        for founder in self.population.individuals() {
            recorder.record_birth(founder)?;
        }
        recorder.record_generation(&self.population, &self.classifier)?;
        self.births += self.population.size();
        self.founders_recorded = true;
        Ok(())
    }

    /// Advance the simulation by one tick.
    pub fn step<R: Recorder + ?Sized>(&mut self, recorder: &mut R) -> Result<TickSummary, SimulationError> {
        self.record_founders(recorder)?;

        // Draws are taken sequentially in store order, then consumed in parallel.
        let draws: Vec<(f64, f64)> = (0..self.population.size())
            .map(|_| (self.rng.random(), self.rng.random()))
            .collect();

        let aging = self.config.aging;
        let fates: Vec<(bool, bool)> = self
            .population
            .individuals_mut()
            .par_iter_mut()
            .zip(draws.par_iter())
            .map(|(individual, &(luck, death))| {
                individual.set_luck(luck);
                let smurfed = aging.update_smurf(individual);
                (smurfed, aging.mortality.is_dying(individual, death))
            })
            .collect();
        let new_smurfs = fates.iter().filter(|(s, _)| *s).count();
        let dead: Vec<bool> = fates.iter().map(|&(_, d)| d).collect();
        let deaths = self.population.discard(&dead);

        let fitness = &self.config.evolution.fitness;
        let layout = &self.layout;
        self.population
            .individuals_mut()
            .par_iter_mut()
            .for_each(|individual| {
                individual.grow_older();
                let value = fitness.fitness(
                    individual.genotype(),
                    individual.sex(),
                    individual.age(),
                    layout,
                );
                individual.set_fitness(value);
            });

        let ctx = BreedingContext {
            layout: &self.layout,
            classifier: &self.classifier,
            recombination: &self.config.evolution.recombination,
            mutation: &self.config.evolution.mutation,
            mutation_targets: self.mutation_targets.as_deref(),
            traits: &self.config.evolution.traits,
        };
        let brood = self.mating.mate(&mut self.population, &ctx, &mut self.rng);
        let (clones, offspring, target) = (brood.clones, brood.offspring, brood.target);
        self.population.replace(brood.next);

        for newborn in &self.population.individuals()[clones..] {
            recorder.record_birth(newborn)?;
        }
        self.births += offspring;
        recorder.record_generation(&self.population, &self.classifier)?;

        let summary = TickSummary {
            generation: self.population.generation(),
            new_smurfs,
            deaths,
            clones,
            offspring,
            target,
            size: self.population.size(),
        };
        debug!("{summary:?}");
        Ok(summary)
    }

    /// Run until the configured number of ticks, extinction or fixation.
    pub fn run<R: Recorder + ?Sized>(&mut self, recorder: &mut R) -> Result<RunSummary, SimulationError> {
        self.run_with(recorder, |_| {})
    }

    /// Like [`Simulation::run`], calling `on_tick` after every tick.
    pub fn run_with<R, F>(&mut self, recorder: &mut R, mut on_tick: F) -> Result<RunSummary, SimulationError>
    where
        R: Recorder + ?Sized,
        F: FnMut(&TickSummary),
    {
        let execution = &self.config.execution;
        let (total, stop_on_fixation) = (execution.total_generations, execution.stop_on_fixation);
        info!(
            "Starting run: {} founders, {} ticks, seed {:?}",
            self.population.size(),
            total,
            execution.seed
        );
        self.record_founders(recorder)?;

        let loci = self.layout.total_loci();
        let mut stop = StopReason::Completed;
        while self.generation() < total {
            if self.population.is_empty() {
                stop = StopReason::Extinct;
                break;
            }
            if stop_on_fixation && self.population.is_fixed(loci) {
                stop = StopReason::Fixed;
                break;
            }
            let summary = self.step(recorder)?;
            on_tick(&summary);
        }
        if stop == StopReason::Completed && self.population.is_empty() {
            stop = StopReason::Extinct;
        }

        match stop {
            StopReason::Extinct => info!("Population extinct at generation {}", self.generation()),
            StopReason::Fixed => info!("All loci fixed at generation {}", self.generation()),
            StopReason::Completed => info!("Run completed after {} ticks", self.generation()),
        }
        recorder.record_final(&self.population, &self.classifier)?;
        recorder.finish()?;

        Ok(RunSummary {
            generations: self.generation(),
            final_size: self.population.size(),
            births: self.births,
            stop,
        })
    }
}
