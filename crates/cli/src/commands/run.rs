use anyhow::{Context, Result};
use agepop_analysis::Summary;
use agepop_sim::errors::SimulationError;
use agepop_sim::genome::GenomeLayout;
use agepop_sim::simulation::{run_replicates, Classifier, Configuration, Simulation};
use agepop_sim::storage::{PedigreeRecorder, RecordingStrategy, StatisticsRecorder};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use super::validate::load_configuration;
use crate::args::RunArgs;
use crate::printing::{print_parameters, print_run_summary};

type Streams = (
    Option<PedigreeRecorder<BufWriter<File>>>,
    StatisticsRecorder<BufWriter<File>>,
);

pub fn run_simulation(args: &RunArgs) -> Result<()> {
    println!("🧬 agepop - Running Simulation");
    println!("============================================\n");

    let mut config = load_configuration(&args.config)?;
    info!("Loaded configuration from {}", args.config.display());
    apply_overrides(&mut config, args);
    let (layout, classifier) = config.validate().context("Invalid configuration")?;

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    println!("Configuration:");
    print_parameters(&config);

    if config.execution.replicates > 1 {
        run_many(args, &config, &layout, &classifier)?;
    } else {
        run_single(args, config)?;
    }

    println!(
        "\n💡 Output streams written to {}",
        args.output_dir.display()
    );
    Ok(())
}

fn apply_overrides(config: &mut Configuration, args: &RunArgs) {
    if let Some(seed) = args.seed {
        config.execution.seed = Some(seed);
    }
    if let Some(generations) = args.generations {
        config.execution.total_generations = generations;
    }
    if let Some(replicates) = args.replicates {
        config.execution.replicates = replicates;
    }
    if let Some(every) = args.record_every {
        config.recording.every = RecordingStrategy::EveryN(every);
    }
}

fn stream_path(args: &RunArgs, replicate: Option<usize>, suffix: &str) -> PathBuf {
    let name = match replicate {
        Some(index) => format!("{}.rep{index}.{suffix}", args.prefix),
        None => format!("{}.{suffix}", args.prefix),
    };
    args.output_dir.join(name)
}

fn open_streams(
    args: &RunArgs,
    replicate: Option<usize>,
    config: &Configuration,
    layout: &GenomeLayout,
    classifier: &Classifier,
) -> Result<Streams, SimulationError> {
    let path = stream_path(args, replicate, "stats.tsv");
    info!("Writing statistics to {}", path.display());
    let statistics = StatisticsRecorder::new(
        BufWriter::new(File::create(path)?),
        &config.recording,
        classifier,
        layout,
    )?;
    let pedigree = if args.no_pedigree {
        None
    } else {
        Some(PedigreeRecorder::new(
            BufWriter::new(File::create(stream_path(args, replicate, "pedigree.txt"))?),
            &config.recording.pedigree,
            layout,
        )?)
    };
    Ok((pedigree, statistics))
}

fn progress_bar(len: u64, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn run_single(args: &RunArgs, config: Configuration) -> Result<()> {
    let mut sim = Simulation::new(config).context("Failed to initialize simulation")?;
    let mut streams = open_streams(args, None, sim.config(), sim.layout(), sim.classifier())
        .context("Failed to create output streams")?;

    let execution = &sim.config().execution;
    println!(
        "Running {} generations with seed {}...",
        execution.total_generations,
        execution.seed.unwrap_or_default()
    );

    let pb = progress_bar(execution.total_generations as u64, args.no_progress)?;
    let summary = sim
        .run_with(&mut streams, |tick| {
            pb.set_position(tick.generation as u64);
            pb.set_message(format!("N={}", tick.size));
        })
        .context("Simulation failed")?;
    pb.finish_with_message("Done");

    println!("\n✓ Simulation complete!");
    print_run_summary(&summary);
    Ok(())
}

fn run_many(
    args: &RunArgs,
    config: &Configuration,
    layout: &GenomeLayout,
    classifier: &Classifier,
) -> Result<()> {
    let replicates = config.execution.replicates;
    println!("Running {replicates} replicates in parallel...");

    let pb = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };
    pb.set_message(format!("{replicates} replicates"));
    let outcomes = run_replicates(config, |index| {
        open_streams(args, Some(index), config, layout, classifier)
    })
    .context("Replicate run failed")?;
    pb.finish_with_message("Done");

    println!("\n✓ Simulation complete!");
    for outcome in &outcomes {
        println!("\nReplicate {}:", outcome.index);
        print_run_summary(&outcome.summary);
    }

    let sizes: Vec<f64> = outcomes
        .iter()
        .map(|o| o.summary.final_size as f64)
        .collect();
    if let Some(summary) = Summary::of(&sizes) {
        println!(
            "\nFinal size over {} replicates: mean {:.1}, sd {:.1}, range {}..{}",
            summary.n, summary.mean, summary.sd, summary.min, summary.max
        );
    }
    Ok(())
}
