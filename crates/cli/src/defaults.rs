//! Shared default values for the command-line options.

pub const CONFIG_FILE: &str = "agepop.json";
pub const OUTPUT_PREFIX: &str = "agepop";

pub const POPULATION_SIZE: usize = 1000;
pub const GENERATIONS: usize = 100;

// Aging
pub const MORTALITY: &str = "two_phases";
pub const SMURF_HAZARD: f64 = agepop_sim::evolution::mortality::DEFAULT_SMURF_HAZARD;

// Evolution
pub const MUTATION_RATE: f64 = 0.0;
pub const MUTANT_FREQUENCY: f64 = 0.5;

pub const RECORD_EVERY: usize = 10;

// Survival tables
pub const MIN_A: f64 = 0.001;
pub const ONSET_AGE: f64 = 10.0;
pub const NUM_VALUES: usize = 5;
pub const OLDEST: u32 = 100;
