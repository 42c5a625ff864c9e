mod args;
mod commands;
pub mod defaults;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use args::{InitArgs, RunArgs, SurvivalArgs};
use commands::{init, run, survival, validate};

/// agepop: an age-structured population simulator
///
/// Individuals age tick by tick, turn into smurfs and die according to a
/// mortality model, while survivors breed in proportion to an age and
/// genotype dependent fitness.
#[derive(Parser, Debug)]
#[command(name = "agepop")]
#[command(author, version, about = "Simulates the evolution of aging in an age-structured population", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a new simulation configuration.
    ///
    /// Sets up the parameters of an experiment (population size, mortality
    /// model, traits, etc.) but does not run it yet.
    Init(Box<InitArgs>),

    /// Check a configuration file without running it.
    Validate {
        /// Configuration path
        #[arg(default_value = defaults::CONFIG_FILE)]
        config: PathBuf,
    },

    /// Run a simulation and write its statistics and pedigree streams.
    Run(Box<RunArgs>),

    /// Tabulate closed-form survival curves of the two-phase model.
    Survival(Box<SurvivalArgs>),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init(args) => {
            init::init_configuration(&args)?;
        }
        Commands::Validate { config } => {
            validate::validate_configuration(&config)?;
        }
        Commands::Run(args) => {
            run::run_simulation(&args)?;
        }
        Commands::Survival(args) => {
            survival::survival_table(&args)?;
        }
    }

    Ok(())
}
