use anyhow::{Context, Result};
use agepop_analysis::{ParameterGrid, SurvivalTable};
use agepop_sim::evolution::{AgeFecundity, AgingConfig, MortalityModel};
use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::args::SurvivalArgs;

pub fn build_grid(args: &SurvivalArgs) -> Result<ParameterGrid> {
    let ranged = args.max_a.is_some() || args.max_b.is_some();
    let n = if ranged { args.num_values } else { 1 };
    let a_range = (args.min_a, args.max_a.unwrap_or(args.min_a));

    let grid = match args.min_b {
        Some(min_b) => ParameterGrid::paired(a_range, (min_b, args.max_b.unwrap_or(min_b)), n),
        None => ParameterGrid::fixed_onset(a_range.0, a_range.1, args.t0, n),
    };
    grid.context("Invalid parameter grid")
}

pub fn survival_table(args: &SurvivalArgs) -> Result<()> {
    let aging = AgingConfig {
        mortality: MortalityModel::TwoPhases {
            k: args.smurf_hazard,
        },
        onset: args.onset.into(),
    };
    let fecundity: AgeFecundity = args.fecundity.into();
    let grid = build_grid(args)?;
    let table = SurvivalTable::build(&aging, &grid, args.oldest, &fecundity)
        .context("Failed to compute survival curves")?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    if args.json {
        let mut out = out;
        serde_json::to_writer_pretty(&mut out, &table).context("Failed to write JSON")?;
        writeln!(out)?;
        out.flush()?;
    } else {
        table.write_tsv(out).context("Failed to write table")?;
    }

    if let Some(path) = &args.output {
        println!("✓ Survival table written: {}", path.display());
    }
    Ok(())
}
