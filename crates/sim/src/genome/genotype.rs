use std::fmt;

use serde::{Deserialize, Serialize};

use super::{GenomeLayout, Sex};
use crate::base::Allele;

/// Two allele slots per locus, indexed globally.
///
/// Slot 0 holds the maternally inherited allele and slot 1 the paternal one.
/// Slots without a chromosome copy hold [`Allele::Unexpressed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genotype {
    alleles: Vec<[Allele; 2]>,
}

impl Genotype {
    pub fn new(alleles: Vec<[Allele; 2]>) -> Self {
        Self { alleles }
    }

    /// All-wild genotype with sentinel slots set for `sex`.
    pub fn wild(layout: &GenomeLayout, sex: Sex) -> Self {
        let mut genotype = Self::new(vec![[Allele::Wild; 2]; layout.total_loci()]);
        genotype.mask(layout, sex);
        genotype
    }

    /// Overwrite every slot without a chromosome copy with the sentinel.
    pub fn mask(&mut self, layout: &GenomeLayout, sex: Sex) {
        for (chr, spec) in layout.chromosomes().iter().enumerate() {
            let expressed = spec.kind.expressed_slots(sex);
            for locus in layout.range(chr) {
                for (slot, &on) in expressed.iter().enumerate() {
                    if !on {
                        self.alleles[locus][slot] = Allele::Unexpressed;
                    }
                }
            }
        }
    }

    pub fn num_loci(&self) -> usize {
        self.alleles.len()
    }

    /// Both slots at `locus`.
    #[inline]
    pub fn locus(&self, locus: usize) -> [Allele; 2] {
        self.alleles[locus]
    }

    #[inline]
    pub fn get(&self, locus: usize, slot: usize) -> Allele {
        self.alleles[locus][slot]
    }

    #[inline]
    pub fn set(&mut self, locus: usize, slot: usize, allele: Allele) {
        self.alleles[locus][slot] = allele;
    }

    pub fn as_slice(&self) -> &[[Allele; 2]] {
        &self.alleles
    }

    /// Mutant copies carried at `locus` (0, 1 or 2).
    pub fn mutant_dosage(&self, locus: usize) -> u32 {
        self.alleles[locus].iter().map(|a| a.dosage()).sum()
    }

    /// Mutant copies across the whole genome.
    pub fn total_dosage(&self) -> u32 {
        (0..self.alleles.len()).map(|l| self.mutant_dosage(l)).sum()
    }
}

/// Renders the genotype as `ab ab ...`, one pair per locus.
impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, [a, b]) in self.alleles.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{a}{b}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{ChromosomeSpec, ChromosomeType};

    fn layout() -> GenomeLayout {
        GenomeLayout::new(vec![
            ChromosomeSpec::x(1),
            ChromosomeSpec::autosome("2L", 1),
            ChromosomeSpec::new("Y", ChromosomeType::Y, 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_wild_male_masks_hemizygous_slots() {
        let g = Genotype::wild(&layout(), Sex::Male);
        assert_eq!(g.locus(0), [Allele::Wild, Allele::Unexpressed]);
        assert_eq!(g.locus(1), [Allele::Wild, Allele::Wild]);
        assert_eq!(g.locus(2), [Allele::Unexpressed, Allele::Wild]);
        assert_eq!(g.to_string(), "0- 00 -0");
    }

    #[test]
    fn test_wild_female_has_no_y() {
        let g = Genotype::wild(&layout(), Sex::Female);
        assert_eq!(g.locus(0), [Allele::Wild, Allele::Wild]);
        assert_eq!(g.locus(2), [Allele::Unexpressed, Allele::Unexpressed]);
    }

    #[test]
    fn test_dosage_ignores_sentinel() {
        let mut g = Genotype::wild(&layout(), Sex::Male);
        g.set(0, 0, Allele::Mutant);
        g.set(1, 1, Allele::Mutant);
        assert_eq!(g.mutant_dosage(0), 1);
        assert_eq!(g.mutant_dosage(1), 1);
        assert_eq!(g.mutant_dosage(2), 0);
        assert_eq!(g.total_dosage(), 2);
    }
}
