//! Point mutation of biallelic loci.
//!
//! Every expressed allele slot of a newborn mutates independently with a
//! fixed per-slot probability. A mutation flips the slot between the wild
//! and mutant states. Slots holding the unexpressed sentinel never mutate,
//! so a hemizygous locus in a male is exposed to half the mutational input
//! of the same locus in a female.
//!
//! Rates are small in practice, so instead of drawing once per slot the
//! model samples the gap to the next mutated slot from a geometric
//! distribution and jumps straight to it. The outcome has the same
//! distribution as the per-slot Bernoulli scheme.

use rand::Rng;
use rand_distr::{Distribution, Geometric};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::genome::{GenomeLayout, Genotype};

/// Symmetric biallelic mutation applied to newborns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationModel {
    /// Probability that one expressed slot flips.
    pub rate: f64,
    /// Restrict mutation to these global loci. `None` targets every locus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loci: Option<Vec<usize>>,
}

impl MutationModel {
    /// Create a model with rate in [0, 1] targeting every locus.
    pub fn new(rate: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidProbability {
                name: "mutation rate",
                value: rate,
            });
        }
        Ok(Self { rate, loci: None })
    }

    /// No mutation.
    pub fn none() -> Self {
        Self {
            rate: 0.0,
            loci: None,
        }
    }

    /// Restrict the model to the given loci.
    pub fn at_loci(mut self, loci: Vec<usize>) -> Self {
        self.loci = Some(loci);
        self
    }

    /// True when this model can never change a genotype.
    pub fn is_inert(&self) -> bool {
        self.rate <= 0.0 || self.loci.as_ref().is_some_and(|l| l.is_empty())
    }

    /// Check the rate and the targeted loci against the genome.
    pub fn validate(&self, layout: &GenomeLayout) -> Result<(), ConfigError> {
        Self::new(self.rate)?;
        if let Some(loci) = &self.loci {
            for &locus in loci {
                layout.check_locus(locus)?;
            }
        }
        Ok(())
    }

    /// Mutate `genotype` in place and return the number of flipped slots.
    pub fn mutate<R: Rng + ?Sized>(&self, genotype: &mut Genotype, rng: &mut R) -> usize {
        if self.is_inert() {
            return 0;
        }

        // Candidate slots in locus order, maternal slot first.
        let candidates: Vec<(usize, usize)> = match &self.loci {
            Some(loci) => loci
                .iter()
                .flat_map(|&l| [(l, 0), (l, 1)])
                .filter(|&(l, s)| genotype.get(l, s).is_expressed())
                .collect(),
            None => (0..genotype.num_loci())
                .flat_map(|l| [(l, 0), (l, 1)])
                .filter(|&(l, s)| genotype.get(l, s).is_expressed())
                .collect(),
        };
        if candidates.is_empty() {
            return 0;
        }

        let Ok(gap) = Geometric::new(self.rate) else {
            return 0;
        };

        let mut count = 0;
        let mut pos: usize = 0;
        loop {
            // number of non-mutating slots before the next hit
            let skip = usize::try_from(gap.sample(rng)).unwrap_or(usize::MAX);
            pos = pos.saturating_add(skip);
            if pos >= candidates.len() {
                break;
            }
            let (locus, slot) = candidates[pos];
            genotype.set(locus, slot, genotype.get(locus, slot).flipped());
            count += 1;
            pos += 1;
        }
        count
    }
}

impl Default for MutationModel {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Allele;
    use crate::genome::{ChromosomeSpec, Sex};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn layout() -> GenomeLayout {
        GenomeLayout::new(vec![ChromosomeSpec::x(10), ChromosomeSpec::autosome("2L", 10)])
            .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_rate() {
        assert!(MutationModel::new(1.1).is_err());
        assert!(MutationModel::new(-0.5).is_err());
        assert!(MutationModel::new(0.0).is_ok());
    }

    #[test]
    fn test_zero_rate_does_nothing() {
        let layout = layout();
        let mut genotype = Genotype::wild(&layout, Sex::Female);
        let before = genotype.clone();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        assert_eq!(MutationModel::none().mutate(&mut genotype, &mut rng), 0);
        assert_eq!(genotype, before);
    }

    #[test]
    fn test_full_rate_flips_every_expressed_slot() {
        let layout = layout();
        let mut genotype = Genotype::wild(&layout, Sex::Male);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let model = MutationModel::new(1.0).unwrap();

        // 10 hemizygous X loci + 10 autosomal loci with two copies
        assert_eq!(model.mutate(&mut genotype, &mut rng), 30);
        for locus in 0..10 {
            assert_eq!(genotype.locus(locus), [Allele::Mutant, Allele::Unexpressed]);
        }
        for locus in 10..20 {
            assert_eq!(genotype.locus(locus), [Allele::Mutant, Allele::Mutant]);
        }
    }

    #[test]
    fn test_restricted_loci() {
        let layout = layout();
        let mut genotype = Genotype::wild(&layout, Sex::Female);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let model = MutationModel::new(1.0).unwrap().at_loci(vec![3, 15]);

        assert_eq!(model.mutate(&mut genotype, &mut rng), 4);
        assert_eq!(genotype.mutant_dosage(3), 2);
        assert_eq!(genotype.mutant_dosage(15), 2);
        assert_eq!(genotype.total_dosage(), 4);
    }

    #[test]
    fn test_mutation_count_matches_rate() {
        let layout = GenomeLayout::new(vec![ChromosomeSpec::autosome("2L", 500)]).unwrap();
        let model = MutationModel::new(0.01).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);

        let mut total = 0;
        let trials = 200;
        for _ in 0..trials {
            let mut genotype = Genotype::wild(&layout, Sex::Female);
            total += model.mutate(&mut genotype, &mut rng);
        }
        // expected 1000 slots * 0.01 * 200 = 2000
        let expected = 2000.0;
        assert!(((total as f64) - expected).abs() < 0.1 * expected, "total = {total}");
    }

    #[test]
    fn test_validate_rejects_out_of_range_locus() {
        let model = MutationModel::new(0.1).unwrap().at_loci(vec![20]);
        assert_eq!(
            model.validate(&layout()),
            Err(ConfigError::LocusOutOfRange { locus: 20, total: 20 })
        );
    }
}
