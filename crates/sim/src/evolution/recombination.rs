//! Sex-specific recombination and Mendelian transmission.
//!
//! Each chromosome carries one switching rate per transmission side. A gamete
//! is built by starting on a random parental copy and switching copies
//! between adjacent loci with that rate. Chromosomes assort independently.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::base::Allele;
use crate::errors::ConfigError;
use crate::genome::{GenomeLayout, Genotype, Individual, Sex};

/// Per-chromosome switching rates for the maternal and paternal sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecombinationModel {
    /// Rates used when a mother forms a gamete.
    pub maternal: Vec<f64>,
    /// Rates used when a father forms a gamete.
    pub paternal: Vec<f64>,
}

impl RecombinationModel {
    /// Create a model, checking every rate lies in [0, 1].
    pub fn new(maternal: Vec<f64>, paternal: Vec<f64>) -> Result<Self, ConfigError> {
        for &rate in maternal.iter().chain(paternal.iter()) {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::InvalidProbability {
                    name: "recombination rate",
                    value: rate,
                });
            }
        }
        Ok(Self { maternal, paternal })
    }

    /// Same rate on every chromosome, both sides.
    pub fn uniform(rate: f64, chromosomes: usize) -> Result<Self, ConfigError> {
        Self::new(vec![rate; chromosomes], vec![rate; chromosomes])
    }

    /// Recombination in females only; males transmit whole chromosomes.
    pub fn female_only(rates: Vec<f64>) -> Result<Self, ConfigError> {
        let paternal = vec![0.0; rates.len()];
        Self::new(rates, paternal)
    }

    /// Check the rate vectors against the genome.
    pub fn validate(&self, layout: &GenomeLayout) -> Result<(), ConfigError> {
        let expected = layout.num_chromosomes();
        for (side, rates) in [("maternal", &self.maternal), ("paternal", &self.paternal)] {
            if rates.len() != expected {
                return Err(ConfigError::RateVectorLength {
                    side,
                    expected,
                    found: rates.len(),
                });
            }
        }
        Self::new(self.maternal.clone(), self.paternal.clone()).map(|_| ())
    }

    fn rates_for(&self, sex: Sex) -> &[f64] {
        match sex {
            Sex::Female => &self.maternal,
            Sex::Male => &self.paternal,
        }
    }

    /// Write one gamete of `parent` for chromosome `chr` into `slot` of `child`.
    ///
    /// A parent carrying a single copy passes it unchanged. A parent carrying
    /// none leaves the slot untouched.
    fn write_gamete<R: Rng + ?Sized>(
        &self,
        parent: &Individual,
        chr: usize,
        layout: &GenomeLayout,
        child: &mut Genotype,
        slot: usize,
        rng: &mut R,
    ) {
        let kind = layout.chromosomes()[chr].kind;
        let carried = kind.expressed_slots(parent.sex());
        let source = parent.genotype();
        let range = layout.range(chr);

        match carried {
            [true, true] => {
                let rate = self.rates_for(parent.sex())[chr];
                let mut copy = usize::from(rng.random::<f64>() < 0.5);
                for (i, locus) in range.enumerate() {
                    if i > 0 && rate > 0.0 && rng.random::<f64>() < rate {
                        copy = 1 - copy;
                    }
                    child.set(locus, slot, source.get(locus, copy));
                }
            }
            [true, false] | [false, true] => {
                let copy = if carried[0] { 0 } else { 1 };
                for locus in range {
                    child.set(locus, slot, source.get(locus, copy));
                }
            }
            [false, false] => {}
        }
    }

    /// Form the genotype of an offspring of sex `sex`.
    ///
    /// The maternal gamete fills slot 0 and the paternal gamete slot 1 on
    /// every chromosome where the offspring carries that copy. Every other
    /// slot is set to the sentinel.
    pub fn transmit<R: Rng + ?Sized>(
        &self,
        mother: &Individual,
        father: &Individual,
        sex: Sex,
        layout: &GenomeLayout,
        rng: &mut R,
    ) -> Genotype {
        let mut child = Genotype::new(vec![[Allele::Unexpressed; 2]; layout.total_loci()]);
        for (chr, spec) in layout.chromosomes().iter().enumerate() {
            let [maternal, paternal] = spec.kind.expressed_slots(sex);
            if maternal {
                self.write_gamete(mother, chr, layout, &mut child, 0, rng);
            }
            if paternal {
                self.write_gamete(father, chr, layout, &mut child, 1, rng);
            }
        }
        child
    }
}
