use agepop_sim::evolution::{MortalityModel, TraitModel};
use agepop_sim::simulation::{Configuration, Demography, FounderAge, RunSummary, StopReason};

pub fn print_parameters(config: &Configuration) {
    let execution = &config.execution;
    let evolution = &config.evolution;

    println!("\n📋 Simulation Configuration");
    println!(
        "  • Population Size: {} [-n, --population-size]",
        execution.population_size
    );
    println!("  • Generations: {} [-g, --generations]", execution.total_generations);
    if let Some(seed) = execution.seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Random [--seed]");
    }
    if execution.replicates > 1 {
        println!("  • Replicates: {}", execution.replicates);
    }
    if execution.stop_on_fixation {
        println!("  • Stops when every locus is fixed");
    }

    println!("\n🧬 Genome");
    for chromosome in &config.genome.chromosomes {
        println!(
            "  • {} ({:?}): {} loci",
            chromosome.name, chromosome.kind, chromosome.loci
        );
    }

    println!("\n⏳ Aging");
    match config.aging.mortality {
        MortalityModel::TwoPhases { k } => {
            println!("  • Mortality: two phases, smurf hazard k = {k} [-m, -k]");
            println!("  • Smurf Onset: {:?} [--onset]", config.aging.onset);
        }
        model => println!("  • Mortality: {} [-m]", model.kind()),
    }
    match &evolution.traits.model {
        TraitModel::Constant { female, male } => {
            println!(
                "  • Traits: constant, female (a={}, b={}), male (a={}, b={})",
                female.a, female.b, male.a, male.b
            );
        }
        TraitModel::LocusEffect {
            locus,
            sex,
            base_a,
            effect,
            ..
        } => {
            println!(
                "  • Traits: locus {locus} shifts a of {sex:?}s, a = {base_a} + {effect} per mutant copy"
            );
        }
        TraitModel::AdditiveCodominant { min_a, max_a, .. } => {
            println!("  • Traits: additive codominant, a in [{min_a}, {max_a}]");
        }
        TraitModel::AdditiveRecessive { min_a, max_a, .. } => {
            println!("  • Traits: additive recessive, a in [{min_a}, {max_a}]");
        }
    }

    println!("\n⚡ Mutation & Recombination");
    println!("  • Mutation Rate: {:.2e} [--mutation-rate]", evolution.mutation.rate);
    if let Some(targets) = &evolution.mutation_targets {
        println!("  • Mutated Categories: {}", targets.join(", "));
    }
    println!("  • Maternal Rates: {:?}", evolution.recombination.maternal);
    println!("  • Paternal Rates: {:?}", evolution.recombination.paternal);

    println!("\n🎯 Mating");
    println!("  • Clones: {}", config.mating.clones.join(", "));
    for scheme in &config.mating.sexual {
        println!(
            "  • Parents: {} (weight {}, {:?})",
            scheme.parents.join(", "),
            scheme.weight,
            scheme.offspring
        );
    }
    match config.mating.demography {
        Demography::Constant { size } => println!("  • Target Size: {size} [--target-size]"),
        Demography::Current => println!("  • Target Size: current size"),
        Demography::Warmup { generations, size } => {
            println!("  • Target Size: current size for {generations} ticks, then {size}")
        }
    }

    println!("\n🌱 Founders");
    println!(
        "  • Mutant Frequency: {} [-q, --mutant-frequency]",
        config.initialization.mutant_frequency
    );
    match config.initialization.age {
        FounderAge::Zero => println!("  • Age: 0"),
        FounderAge::Uniform { max } => println!("  • Age: uniform in 0..={max}"),
    }

    println!("\n📝 Recording");
    println!("  • Statistics: {:?} [--record-every]", config.recording.every);
    println!("  • Columns: {}", config.recording.statistics.len());
    println!();
}

pub fn print_run_summary(summary: &RunSummary) {
    let outcome = match summary.stop {
        StopReason::Completed => "completed",
        StopReason::Extinct => "population extinct",
        StopReason::Fixed => "all loci fixed",
    };
    println!("  Outcome: {outcome}");
    println!("  Generations: {}", summary.generations);
    println!("  Final size: {}", summary.final_size);
    println!("  Births: {}", summary.births);
}
