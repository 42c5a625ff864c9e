//! Independent replicates run in parallel.
//!
//! Replicate `i` is driven by the base generator advanced by `i` jumps of
//! 2^128 steps, so the streams never overlap. Replicate 0 uses exactly the
//! stream of a single run with the same seed.

use log::info;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use super::configs::Configuration;
use super::engine::{RunSummary, Simulation};
use crate::errors::SimulationError;
use crate::storage::Recorder;

/// Non-overlapping generators for `count` replicates.
pub fn replicate_streams(seed: u64, count: usize) -> Vec<Xoshiro256PlusPlus> {
    let mut base = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let stream = base.clone();
            base.jump();
            stream
        })
        .collect()
}

/// Result of one replicate.
#[derive(Debug)]
pub struct ReplicateOutcome<R> {
    pub index: usize,
    pub recorder: R,
    pub summary: RunSummary,
}

/// Run `config.execution.replicates` independent replicates.
///
/// `make_recorder` is called once per replicate index. Results come back in
/// replicate order.
pub fn run_replicates<R, F>(
    config: &Configuration,
    make_recorder: F,
) -> Result<Vec<ReplicateOutcome<R>>, SimulationError>
where
    R: Recorder + Send,
    F: Fn(usize) -> Result<R, SimulationError> + Sync,
{
    config.validate()?;
    let mut config = config.clone();
    let seed = *config
        .execution
        .seed
        .get_or_insert_with(|| rand::rng().random());
    let count = config.execution.replicates;
    info!("Running {count} replicates from seed {seed}");

    replicate_streams(seed, count)
        .into_par_iter()
        .enumerate()
        .map(|(index, rng)| {
            let mut recorder = make_recorder(index)?;
            let mut simulation = Simulation::with_rng(config.clone(), rng)?;
            let summary = simulation.run(&mut recorder)?;
            Ok(ReplicateOutcome {
                index,
                recorder,
                summary,
            })
        })
        .collect()
}
