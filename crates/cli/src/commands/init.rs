use anyhow::{Context, Result};
use agepop_sim::evolution::{AgingParams, TraitAssignment, TraitModel};
use agepop_sim::simulation::{Configuration, Demography, SimulationBuilder};
use agepop_sim::storage::{RecordingConfig, RecordingStrategy};

use crate::args::InitArgs;
use crate::printing::print_parameters;

pub fn init_configuration(args: &InitArgs) -> Result<()> {
    let output = &args.output;

    println!("🧬 agepop - Age-Structured Population Simulator");
    println!("============================================\n");

    if output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let config = build_configuration(args)?;
    println!("Configuration:");
    print_parameters(&config);

    let json = config.to_json().context("Failed to serialize configuration")?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("✓ Configuration written: {}", output.display());
    println!("\nSimulation initialized successfully!");
    println!("  Population size: {}", args.population_size);
    println!("  Generations: {}", args.generations);
    println!(
        "\n💡 Use 'agepop run -c {}' to start the simulation",
        output.display()
    );

    Ok(())
}

pub fn build_configuration(args: &InitArgs) -> Result<Configuration> {
    let mut builder = SimulationBuilder::new()
        .population_size(args.population_size)
        .generations(args.generations)
        .mortality_named(&args.mortality, args.smurf_hazard)
        .context("Invalid mortality model")?
        .smurf_onset(args.onset.into())
        .mutation_rate(args.mutation_rate)
        .mutant_frequency(args.mutant_frequency)
        .stop_on_fixation(args.stop_on_fixation)
        .recording(RecordingConfig {
            every: RecordingStrategy::EveryN(args.record_every),
            ..RecordingConfig::default()
        })
        .demography(match args.target_size {
            Some(size) => Demography::Constant { size },
            None => Demography::Warmup {
                generations: 10,
                size: args.population_size,
            },
        });

    if let (Some(a), Some(b)) = (args.a, args.b) {
        let params = AgingParams::new(a, b);
        builder = builder.traits(
            TraitAssignment::new(TraitModel::Constant {
                female: params,
                male: params,
            })
            .with_onset(),
        );
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    builder.build_config().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use agepop_sim::evolution::{MortalityModel, SmurfOnset};
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: InitArgs,
    }

    fn parse(argv: &[&str]) -> InitArgs {
        Wrapper::parse_from(std::iter::once("init").chain(argv.iter().copied())).args
    }

    #[test]
    fn test_defaults_build() {
        let config = build_configuration(&parse(&[])).unwrap();
        assert_eq!(config.execution.population_size, 1000);
        assert_eq!(config.execution.total_generations, 100);
        assert_eq!(config.aging.onset, SmurfOnset::Exponential);
        assert_eq!(config.recording.every, RecordingStrategy::EveryN(10));
    }

    #[test]
    fn test_overrides() {
        let config = build_configuration(&parse(&[
            "-n", "50", "-g", "20", "-m", "smurf", "-k", "0.3", "--onset", "linear", "-a", "0.01",
            "-b", "-0.1", "--target-size", "60", "--seed", "4",
        ]))
        .unwrap();
        assert_eq!(config.aging.mortality, MortalityModel::TwoPhases { k: 0.3 });
        assert_eq!(config.aging.onset, SmurfOnset::Linear);
        assert_eq!(config.mating.demography, Demography::Constant { size: 60 });
        assert_eq!(config.execution.seed, Some(4));
        assert!(matches!(config.evolution.traits.model, TraitModel::Constant { .. }));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(build_configuration(&parse(&["-m", "logistic"])).is_err());
        assert!(build_configuration(&parse(&["-q", "1.5"])).is_err());
        assert!(build_configuration(&parse(&["-n", "0"])).is_err());
    }
}
