use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::Sex;
use crate::errors::ConfigError;

/// Inheritance type of a chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChromosomeType {
    /// Two copies in both sexes.
    Autosome,
    /// Two copies in females, one (maternal) in males.
    X,
    /// One (paternal) copy in males, absent in females.
    Y,
}

impl ChromosomeType {
    /// Which of the two allele slots carry a chromosome copy for `sex`.
    ///
    /// Slot 0 is the maternal copy and slot 1 the paternal copy.
    pub fn expressed_slots(self, sex: Sex) -> [bool; 2] {
        match (self, sex) {
            (Self::Autosome, _) => [true, true],
            (Self::X, Sex::Female) => [true, true],
            (Self::X, Sex::Male) => [true, false],
            (Self::Y, Sex::Female) => [false, false],
            (Self::Y, Sex::Male) => [false, true],
        }
    }

    /// Number of expressed slots for `sex`.
    pub fn copies(self, sex: Sex) -> u32 {
        self.expressed_slots(sex).iter().filter(|&&e| e).count() as u32
    }

    /// True for the X and Y chromosomes.
    pub fn is_sex_linked(self) -> bool {
        !matches!(self, Self::Autosome)
    }
}

/// A named chromosome with a fixed number of biallelic loci.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromosomeSpec {
    pub name: String,
    pub kind: ChromosomeType,
    pub loci: usize,
}

impl ChromosomeSpec {
    pub fn new(name: impl Into<String>, kind: ChromosomeType, loci: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            loci,
        }
    }

    pub fn autosome(name: impl Into<String>, loci: usize) -> Self {
        Self::new(name, ChromosomeType::Autosome, loci)
    }

    pub fn x(loci: usize) -> Self {
        Self::new("X", ChromosomeType::X, loci)
    }
}

/// Flat locus indexing over an ordered list of chromosomes.
///
/// Loci are numbered globally in chromosome order, the way genotypes store
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct GenomeLayout {
    chromosomes: Vec<ChromosomeSpec>,
    offsets: Vec<usize>,
    total: usize,
}

impl GenomeLayout {
    /// Build a layout. At least one locus is required and names must be unique.
    pub fn new(chromosomes: Vec<ChromosomeSpec>) -> Result<Self, ConfigError> {
        if chromosomes.is_empty() {
            return Err(ConfigError::InvalidParameter(
                "genome must declare at least one chromosome".into(),
            ));
        }
        let mut offsets = Vec::with_capacity(chromosomes.len());
        let mut total = 0;
        for (i, chr) in chromosomes.iter().enumerate() {
            if chr.loci == 0 {
                return Err(ConfigError::InvalidParameter(format!(
                    "chromosome '{}' has no loci",
                    chr.name
                )));
            }
            if chromosomes[..i].iter().any(|c| c.name == chr.name) {
                return Err(ConfigError::InvalidParameter(format!(
                    "chromosome '{}' declared twice",
                    chr.name
                )));
            }
            offsets.push(total);
            total += chr.loci;
        }
        Ok(Self {
            chromosomes,
            offsets,
            total,
        })
    }

    pub fn chromosomes(&self) -> &[ChromosomeSpec] {
        &self.chromosomes
    }

    pub fn num_chromosomes(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn total_loci(&self) -> usize {
        self.total
    }

    /// Global locus indices of chromosome `chr`.
    pub fn range(&self, chr: usize) -> Range<usize> {
        let start = self.offsets[chr];
        start..start + self.chromosomes[chr].loci
    }

    /// Index of the chromosome holding global locus `locus`.
    pub fn chromosome_of(&self, locus: usize) -> Option<usize> {
        if locus >= self.total {
            return None;
        }
        // offsets are sorted and start at 0
        Some(self.offsets.partition_point(|&o| o <= locus) - 1)
    }

    /// Inheritance type of the chromosome holding `locus`.
    pub fn kind_of(&self, locus: usize) -> Option<ChromosomeType> {
        self.chromosome_of(locus).map(|c| self.chromosomes[c].kind)
    }

    /// Index of the chromosome named `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.chromosomes.iter().position(|c| c.name == name)
    }

    /// Reject a locus index past the end of the genome.
    pub fn check_locus(&self, locus: usize) -> Result<(), ConfigError> {
        if locus < self.total {
            Ok(())
        } else {
            Err(ConfigError::LocusOutOfRange {
                locus,
                total: self.total,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GenomeLayout {
        GenomeLayout::new(vec![
            ChromosomeSpec::x(2),
            ChromosomeSpec::autosome("2L", 3),
            ChromosomeSpec::new("Y", ChromosomeType::Y, 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_expressed_slots() {
        assert_eq!(ChromosomeType::X.expressed_slots(Sex::Male), [true, false]);
        assert_eq!(ChromosomeType::X.expressed_slots(Sex::Female), [true, true]);
        assert_eq!(ChromosomeType::Y.expressed_slots(Sex::Female), [false, false]);
        assert_eq!(ChromosomeType::Y.copies(Sex::Male), 1);
        assert_eq!(ChromosomeType::Autosome.copies(Sex::Male), 2);
    }

    #[test]
    fn test_layout_offsets() {
        let layout = layout();
        assert_eq!(layout.total_loci(), 6);
        assert_eq!(layout.range(0), 0..2);
        assert_eq!(layout.range(1), 2..5);
        assert_eq!(layout.range(2), 5..6);
        assert_eq!(layout.chromosome_of(0), Some(0));
        assert_eq!(layout.chromosome_of(2), Some(1));
        assert_eq!(layout.chromosome_of(4), Some(1));
        assert_eq!(layout.chromosome_of(5), Some(2));
        assert_eq!(layout.chromosome_of(6), None);
        assert_eq!(layout.kind_of(1), Some(ChromosomeType::X));
    }

    #[test]
    fn test_layout_rejects_empty_chromosome() {
        let err = GenomeLayout::new(vec![ChromosomeSpec::autosome("2L", 0)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter(_)));
    }

    #[test]
    fn test_layout_rejects_duplicate_names() {
        let result = GenomeLayout::new(vec![
            ChromosomeSpec::autosome("A", 1),
            ChromosomeSpec::autosome("A", 1),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_locus() {
        let layout = layout();
        assert!(layout.check_locus(5).is_ok());
        assert_eq!(
            layout.check_locus(6),
            Err(ConfigError::LocusOutOfRange { locus: 6, total: 6 })
        );
    }
}
