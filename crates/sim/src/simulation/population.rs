//! The individual store and the demographic target.
//!
//! Individuals are kept sorted by identifier. Identifiers come from a
//! counter owned by the store, so new individuals always sort after the
//! existing ones.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::genome::{Individual, IndividualId};

/// The live individuals of one replicate.
#[derive(Debug, Clone)]
pub struct Population {
    /// Sorted by id
    individuals: Vec<Individual>,
    /// Generation counter
    generation: usize,
    /// Next identifier to hand out
    next_id: IndividualId,
}

impl Population {
    /// Create a population from founders. Ids must be strictly increasing.
    pub fn new(individuals: Vec<Individual>) -> Result<Self, ConfigError> {
        if individuals.windows(2).any(|w| w[0].id() >= w[1].id()) {
            return Err(ConfigError::InvalidParameter(
                "founder ids must be strictly increasing".into(),
            ));
        }
        let next_id = individuals.last().map_or(1, |ind| ind.id() + 1);
        Ok(Self {
            individuals,
            generation: 0,
            next_id,
        })
    }

    /// Get the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Get the number of individuals in the population.
    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    /// Check if population is empty.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get all individuals as a slice.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Get mutable access to individuals.
    pub fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    /// Get a specific individual by store index.
    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    /// Look up an individual by identifier.
    pub fn find(&self, id: IndividualId) -> Option<&Individual> {
        self.individuals
            .binary_search_by_key(&id, Individual::id)
            .ok()
            .map(|i| &self.individuals[i])
    }

    /// Mutable lookup by identifier.
    pub fn find_mut(&mut self, id: IndividualId) -> Option<&mut Individual> {
        self.individuals
            .binary_search_by_key(&id, Individual::id)
            .ok()
            .map(|i| &mut self.individuals[i])
    }

    /// Hand out the next identifier.
    pub fn allocate_id(&mut self) -> IndividualId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Identifier the next allocation will return.
    pub fn peek_next_id(&self) -> IndividualId {
        self.next_id
    }

    /// Remove every individual for which `dead` holds. Returns how many left.
    pub fn discard(&mut self, dead: &[bool]) -> usize {
        debug_assert_eq!(dead.len(), self.individuals.len());
        let before = self.individuals.len();
        let mut flags = dead.iter();
        self.individuals
            .retain(|_| !flags.next().copied().unwrap_or(false));
        before - self.individuals.len()
    }

    /// Swap in the next generation and advance the generation counter.
    ///
    /// `next` must be sorted by id; the old live set is dropped as a whole.
    pub fn replace(&mut self, next: Vec<Individual>) {
        debug_assert!(next.windows(2).all(|w| w[0].id() < w[1].id()));
        self.individuals = next;
        self.generation += 1;
    }

    /// Mutant allele frequency at `locus` over expressed slots.
    ///
    /// `None` when no individual carries a copy of the locus.
    pub fn allele_frequency(&self, locus: usize) -> Option<f64> {
        let (mutant, total) = self
            .individuals
            .iter()
            .flat_map(|ind| ind.genotype().locus(locus))
            .filter(|a| a.is_expressed())
            .fold((0u64, 0u64), |(m, t), a| (m + u64::from(a.dosage()), t + 1));
        (total > 0).then(|| mutant as f64 / total as f64)
    }

    /// True when every locus is monomorphic (Σ p(1 - p) = 0).
    pub fn is_fixed(&self, loci: usize) -> bool {
        (0..loci)
            .filter_map(|l| self.allele_frequency(l))
            .map(|p| p * (1.0 - p))
            .sum::<f64>()
            == 0.0
    }
}

/// Desired population size after mating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Demography {
    /// Always `size`.
    Constant { size: usize },
    /// Keep the current size.
    Current,
    /// Current size for the first `generations` ticks, then `size`.
    Warmup { generations: usize, size: usize },
}

impl Demography {
    /// Target size for tick `generation` given the size before mating.
    pub fn target(&self, generation: usize, current: usize) -> usize {
        match *self {
            Self::Constant { size } => size,
            Self::Current => current,
            Self::Warmup { generations, size } => {
                if generation < generations {
                    current
                } else {
                    size
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Allele;
    use crate::genome::{AgingTraits, Genotype, Sex};

    fn ind(id: IndividualId, sex: Sex, alleles: [Allele; 2]) -> Individual {
        Individual::founder(id, sex, Genotype::new(vec![alleles]), AgingTraits::new(0.004, -0.02))
    }

    fn population() -> Population {
        Population::new(vec![
            ind(1, Sex::Female, [Allele::Mutant, Allele::Wild]),
            ind(2, Sex::Male, [Allele::Mutant, Allele::Unexpressed]),
            ind(5, Sex::Female, [Allele::Wild, Allele::Wild]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_sets_next_id() {
        let mut pop = population();
        assert_eq!(pop.size(), 3);
        assert_eq!(pop.generation(), 0);
        assert_eq!(pop.allocate_id(), 6);
        assert_eq!(pop.allocate_id(), 7);
    }

    #[test]
    fn test_new_rejects_unsorted_ids() {
        let result = Population::new(vec![
            ind(2, Sex::Female, [Allele::Wild; 2]),
            ind(2, Sex::Female, [Allele::Wild; 2]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_find_by_id() {
        let mut pop = population();
        assert_eq!(pop.find(5).map(|i| i.sex()), Some(Sex::Female));
        assert!(pop.find(3).is_none());
        pop.find_mut(2).unwrap().mark_smurf();
        assert!(pop.find(2).unwrap().is_smurf());
    }

    #[test]
    fn test_discard() {
        let mut pop = population();
        assert_eq!(pop.discard(&[false, true, false]), 1);
        let ids: Vec<_> = pop.individuals().iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn test_replace_advances_generation() {
        let mut pop = population();
        let next = vec![pop.individuals()[0].clone()];
        pop.replace(next);
        assert_eq!(pop.generation(), 1);
        assert_eq!(pop.size(), 1);
    }

    #[test]
    fn test_allele_frequency_skips_sentinel() {
        let pop = population();
        // 2 mutant out of 5 expressed slots
        assert!((pop.allele_frequency(0).unwrap() - 0.4).abs() < 1e-12);
        assert!(!pop.is_fixed(1));

        let empty = Population::new(Vec::new()).unwrap();
        assert_eq!(empty.allele_frequency(0), None);
        assert!(empty.is_fixed(1));
    }

    #[test]
    fn test_demography() {
        assert_eq!(Demography::Constant { size: 50 }.target(0, 10), 50);
        assert_eq!(Demography::Current.target(3, 17), 17);
        let warmup = Demography::Warmup {
            generations: 10,
            size: 100,
        };
        assert_eq!(warmup.target(9, 40), 40);
        assert_eq!(warmup.target(10, 40), 100);
    }
}
