use clap::{Args, ValueEnum};
use std::path::PathBuf;

use agepop_sim::evolution::{AgeFecundity, SmurfOnset};

use crate::defaults;

/// Smurf onset rule, as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnsetArg {
    /// Probability `a * age + b`
    Linear,
    /// Zero up to `t0 = -b/a`, then `1 - exp(-a (age - t0 + 1/2))`
    Exponential,
}

impl From<OnsetArg> for SmurfOnset {
    fn from(arg: OnsetArg) -> Self {
        match arg {
            OnsetArg::Linear => SmurfOnset::Linear,
            OnsetArg::Exponential => SmurfOnset::Exponential,
        }
    }
}

/// Age fecundity curve used to weight survival into lifetime output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FecundityArg {
    Uniform,
    Parabola,
    Lin2014,
}

impl From<FecundityArg> for AgeFecundity {
    fn from(arg: FecundityArg) -> Self {
        match arg {
            FecundityArg::Uniform => AgeFecundity::Uniform,
            FecundityArg::Parabola => AgeFecundity::parabola(),
            FecundityArg::Lin2014 => AgeFecundity::lin_2014(),
        }
    }
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output configuration path
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    /// Number of founders
    #[arg(short = 'n', long, default_value_t = defaults::POPULATION_SIZE)]
    pub population_size: usize,

    /// Number of ticks
    #[arg(short = 'g', long, default_value_t = defaults::GENERATIONS)]
    pub generations: usize,

    /// Mortality model (two_phases, weibull, gompertz)
    #[arg(short, long, default_value = defaults::MORTALITY)]
    pub mortality: String,

    /// Death hazard of smurfs (two-phase model only)
    #[arg(short = 'k', long, default_value_t = defaults::SMURF_HAZARD)]
    pub smurf_hazard: f64,

    /// Smurf onset rule
    #[arg(long, value_enum, default_value_t = OnsetArg::Exponential)]
    pub onset: OnsetArg,

    /// Aging slope `a`, the same for every individual
    ///
    /// Replaces the default male-limited locus effect. Requires `--b`.
    #[arg(short = 'a', long, requires = "b")]
    pub a: Option<f64>,

    /// Aging intercept `b`, the same for every individual
    #[arg(short = 'b', long, requires = "a", allow_negative_numbers = true)]
    pub b: Option<f64>,

    /// Per-slot mutation probability of newborns
    #[arg(long, default_value_t = defaults::MUTATION_RATE)]
    pub mutation_rate: f64,

    /// Mutant allele frequency among founders
    #[arg(short = 'q', long, default_value_t = defaults::MUTANT_FREQUENCY)]
    pub mutant_frequency: f64,

    /// Constant target size after mating (default: founders count, after a warm-up)
    #[arg(long)]
    pub target_size: Option<usize>,

    /// Write a statistics line every N ticks
    #[arg(long, default_value_t = defaults::RECORD_EVERY)]
    pub record_every: usize,

    /// Stop once every locus is fixed
    #[arg(long)]
    pub stop_on_fixation: bool,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Configuration file written by `agepop init`
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory for the output streams
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// File name prefix of the output streams
    #[arg(short, long, default_value = defaults::OUTPUT_PREFIX)]
    pub prefix: String,

    /// Override random seed (default: use configured seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override number of ticks
    #[arg(short = 'g', long)]
    pub generations: Option<usize>,

    /// Override number of replicates
    #[arg(short, long)]
    pub replicates: Option<usize>,

    /// Override recording interval (default: use configured interval)
    #[arg(long)]
    pub record_every: Option<usize>,

    /// Do not write the pedigree log
    #[arg(long)]
    pub no_pedigree: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Args, Debug)]
pub struct SurvivalArgs {
    /// Smallest value of `a`
    #[arg(short = 'a', long, default_value_t = defaults::MIN_A)]
    pub min_a: f64,

    /// Largest value of `a` (default: only `--min-a`)
    #[arg(short = 'A', long)]
    pub max_a: Option<f64>,

    /// Onset age shared by every column, used when no `b` is given
    #[arg(short = 't', long, default_value_t = defaults::ONSET_AGE)]
    pub t0: f64,

    /// Smallest value of `b` (default: `-a * t0`)
    #[arg(short = 'b', long, allow_negative_numbers = true)]
    pub min_b: Option<f64>,

    /// Largest value of `b`
    #[arg(short = 'B', long, requires = "min_b", allow_negative_numbers = true)]
    pub max_b: Option<f64>,

    /// Death hazard of smurfs
    #[arg(short = 'k', long, default_value_t = defaults::SMURF_HAZARD)]
    pub smurf_hazard: f64,

    /// Number of parameter sets when a range is given
    #[arg(short, long, default_value_t = defaults::NUM_VALUES)]
    pub num_values: usize,

    /// Last age in the table
    #[arg(short = 'x', long, default_value_t = defaults::OLDEST)]
    pub oldest: u32,

    /// Smurf onset rule
    #[arg(long, value_enum, default_value_t = OnsetArg::Exponential)]
    pub onset: OnsetArg,

    /// Fecundity curve for the lifetime output `W`
    #[arg(long, value_enum, default_value_t = FecundityArg::Parabola)]
    pub fecundity: FecundityArg,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
