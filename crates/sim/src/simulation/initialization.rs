//! Founder generation.

use rand::Rng;

use super::configs::{Configuration, FounderAge};
use super::population::Population;
use crate::base::Allele;
use crate::errors::ConfigError;
use crate::genome::{GenomeLayout, Genotype, Individual, IndividualId, Sex};

/// Draw one founder genotype with mutant frequency `q` on expressed slots.
fn founder_genotype<R: Rng + ?Sized>(
    layout: &GenomeLayout,
    sex: Sex,
    q: f64,
    rng: &mut R,
) -> Genotype {
    let alleles = (0..layout.total_loci())
        .map(|_| {
            [
                Allele::from_mutant(rng.random::<f64>() < q),
                Allele::from_mutant(rng.random::<f64>() < q),
            ]
        })
        .collect();
    let mut genotype = Genotype::new(alleles);
    genotype.mask(layout, sex);
    genotype
}

/// Create the founders with ids `1..=N`.
///
/// Draws per founder, in order: sex, alleles, age, luck. Founders older than
/// zero get one pass of the smurf onset rule so that an aged start already
/// carries smurfs.
pub fn initialize<R: Rng + ?Sized>(
    config: &Configuration,
    layout: &GenomeLayout,
    rng: &mut R,
) -> Result<Population, ConfigError> {
    let n = config.execution.population_size;
    if n == 0 {
        return Err(ConfigError::InvalidPopulationSize(0));
    }
    let q = config.initialization.mutant_frequency;

    let mut founders = Vec::with_capacity(n);
    for id in 1..=n as IndividualId {
        let sex = if rng.random::<f64>() < 0.5 {
            Sex::Male
        } else {
            Sex::Female
        };
        let genotype = founder_genotype(layout, sex, q, rng);
        let age = match config.initialization.age {
            FounderAge::Zero => 0,
            FounderAge::Uniform { max } => rng.random_range(0..=max),
        };
        let traits = config.evolution.traits.assign_traits(&genotype, sex, layout);

        let mut founder = Individual::founder(id, sex, genotype, traits).with_age(age);
        founder.set_luck(rng.random());
        if age > 0 {
            config.aging.update_smurf(&mut founder);
        }
        founders.push(founder);
    }
    Population::new(founders)
}
