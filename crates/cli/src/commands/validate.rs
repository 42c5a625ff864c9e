use anyhow::{Context, Result};
use agepop_sim::simulation::Configuration;
use std::path::Path;

use crate::printing::print_parameters;

/// Read a configuration file and parse it, without validating.
pub fn load_configuration(path: &Path) -> Result<Configuration> {
    let text = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read {}. Did you run 'agepop init' first?",
            path.display()
        )
    })?;
    Configuration::from_json(&text)
        .with_context(|| format!("Failed to parse configuration {}", path.display()))
}

pub fn validate_configuration(path: &Path) -> Result<()> {
    println!("🔍 Validating configuration: {}", path.display());

    let config = load_configuration(path)?;
    let (layout, classifier) = config.validate().context("Invalid configuration")?;

    print_parameters(&config);
    println!(
        "✓ Genome: {} loci on {} chromosomes",
        layout.total_loci(),
        layout.num_chromosomes()
    );
    let names: Vec<&str> = classifier
        .categories()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    println!("✓ Categories: {}", names.join(", "));
    println!("\n✓ Validation complete: No issues found");

    Ok(())
}
