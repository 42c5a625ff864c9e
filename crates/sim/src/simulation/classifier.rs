//! Virtual subpopulations.
//!
//! A classifier is a list of splitters evaluated side by side. Each splitter
//! cuts the population into a fixed number of exclusive parts, and the parts
//! of all splitters are numbered consecutively. Named categories are unions
//! of those parts. Membership is a pure function of age, sex and the smurf
//! flag, so it is recomputed whenever it is needed and never stored.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::genome::{Individual, Sex};

/// One predicate tree producing exclusive parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "splitter", rename_all = "snake_case")]
pub enum Splitter {
    /// Part 0: `age < cutoff`; part 1: `age >= cutoff`.
    AgeCutoff { cutoff: u32 },
    /// Part 0: normal; part 1: smurf.
    Smurf,
    /// Part 0: male; part 1: female.
    Sex,
    /// Single part holding individuals of exactly `age`.
    AgeEquals { age: u32 },
    /// Cross product of the inner splitters, last splitter varying fastest.
    Product { splitters: Vec<Splitter> },
}

impl Splitter {
    /// Number of parts this splitter produces.
    pub fn parts(&self) -> usize {
        match self {
            Self::AgeCutoff { .. } | Self::Smurf | Self::Sex => 2,
            Self::AgeEquals { .. } => 1,
            Self::Product { splitters } => splitters.iter().map(Self::parts).product(),
        }
    }

    /// Part holding `individual`, if any.
    pub fn part_of(&self, individual: &Individual) -> Option<usize> {
        match self {
            Self::AgeCutoff { cutoff } => Some(usize::from(individual.age() >= *cutoff)),
            Self::Smurf => Some(usize::from(individual.is_smurf())),
            Self::Sex => Some(match individual.sex() {
                Sex::Male => 0,
                Sex::Female => 1,
            }),
            Self::AgeEquals { age } => (individual.age() == *age).then_some(0),
            Self::Product { splitters } => {
                let mut index = 0;
                for splitter in splitters {
                    index = index * splitter.parts() + splitter.part_of(individual)?;
                }
                Some(index)
            }
        }
    }
}

/// A named union of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub parts: Vec<usize>,
}

impl CategoryDef {
    pub fn new(name: impl Into<String>, parts: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            parts,
        }
    }
}

/// Serializable description of a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    pub splitters: Vec<Splitter>,
    pub categories: Vec<CategoryDef>,
}

impl ClassificationConfig {
    /// The standard life stages.
    ///
    /// | part | meaning               | category |
    /// |------|-----------------------|----------|
    /// | 0    | young, normal         | larvae   |
    /// | 1    | young, smurf          | smurfs   |
    /// | 2    | mature, normal        | adults   |
    /// | 3    | mature, smurf         | smurfs   |
    /// | 4    | male                  | males    |
    /// | 5    | female                | females  |
    /// | 6    | age 0                 | newborn  |
    pub fn life_stages(maturity: u32) -> Self {
        Self {
            splitters: vec![
                Splitter::Product {
                    splitters: vec![Splitter::AgeCutoff { cutoff: maturity }, Splitter::Smurf],
                },
                Splitter::Sex,
                Splitter::AgeEquals { age: 0 },
            ],
            categories: vec![
                CategoryDef::new("larvae", vec![0]),
                CategoryDef::new("adults", vec![2]),
                CategoryDef::new("smurfs", vec![1, 3]),
                CategoryDef::new("males", vec![4]),
                CategoryDef::new("females", vec![5]),
                CategoryDef::new("newborn", vec![6]),
            ],
        }
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self::life_stages(10)
    }
}

/// Index of a category within its classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(usize);

impl CategoryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The categories one individual belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategorySet(u64);

impl CategorySet {
    #[inline]
    pub fn contains(self, id: CategoryId) -> bool {
        self.0 & (1 << id.0) != 0
    }

    #[inline]
    pub fn intersects(self, ids: &[CategoryId]) -> bool {
        ids.iter().any(|&id| self.contains(id))
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

const MAX_CATEGORIES: usize = 64;

/// Compiled classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    splitters: Vec<Splitter>,
    offsets: Vec<usize>,
    categories: Vec<CategoryDef>,
    /// For each global part, the categories containing it.
    part_masks: Vec<u64>,
}

impl Classifier {
    pub fn new(config: &ClassificationConfig) -> Result<Self, ConfigError> {
        if config.categories.len() > MAX_CATEGORIES {
            return Err(ConfigError::InvalidParameter(format!(
                "at most {MAX_CATEGORIES} categories are supported, got {}",
                config.categories.len()
            )));
        }
        let mut offsets = Vec::with_capacity(config.splitters.len());
        let mut total = 0;
        for splitter in &config.splitters {
            offsets.push(total);
            total += splitter.parts();
        }

        let mut part_masks = vec![0u64; total];
        for (i, category) in config.categories.iter().enumerate() {
            if config.categories[..i].iter().any(|c| c.name == category.name) {
                return Err(ConfigError::DuplicateCategory(category.name.clone()));
            }
            for &part in &category.parts {
                let mask = part_masks.get_mut(part).ok_or_else(|| ConfigError::InvalidPart {
                    category: category.name.clone(),
                    part,
                    total,
                })?;
                *mask |= 1 << i;
            }
        }

        Ok(Self {
            splitters: config.splitters.clone(),
            offsets,
            categories: config.categories.clone(),
            part_masks,
        })
    }

    pub fn categories(&self) -> &[CategoryDef] {
        &self.categories
    }

    pub fn name(&self, id: CategoryId) -> &str {
        &self.categories[id.0].name
    }

    /// Look up a category by name.
    pub fn id(&self, name: &str) -> Result<CategoryId, ConfigError> {
        self.categories
            .iter()
            .position(|c| c.name == name)
            .map(CategoryId)
            .ok_or_else(|| ConfigError::UnknownCategory(name.to_string()))
    }

    /// Look up several categories by name.
    pub fn ids<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<CategoryId>, ConfigError> {
        names.iter().map(|n| self.id(n.as_ref())).collect()
    }

    /// Global parts holding `individual`, one per splitter at most.
    pub fn parts_of<'a>(&'a self, individual: &'a Individual) -> impl Iterator<Item = usize> + 'a {
        self.splitters
            .iter()
            .zip(&self.offsets)
            .filter_map(move |(s, &offset)| s.part_of(individual).map(|p| offset + p))
    }

    /// Categories `individual` currently belongs to.
    pub fn classify(&self, individual: &Individual) -> CategorySet {
        CategorySet(
            self.parts_of(individual)
                .fold(0, |acc, part| acc | self.part_masks[part]),
        )
    }

    pub fn contains(&self, individual: &Individual, id: CategoryId) -> bool {
        self.classify(individual).contains(id)
    }

    /// Store indices of individuals in any of `ids`, in store order.
    pub fn members(&self, individuals: &[Individual], ids: &[CategoryId]) -> Vec<usize> {
        individuals
            .iter()
            .enumerate()
            .filter(|(_, ind)| self.classify(ind).intersects(ids))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of individuals in category `id`.
    pub fn count(&self, individuals: &[Individual], id: CategoryId) -> usize {
        individuals.iter().filter(|ind| self.contains(ind, id)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Allele;
    use crate::genome::{AgingTraits, Genotype};

    fn stages() -> Classifier {
        Classifier::new(&ClassificationConfig::life_stages(10)).unwrap()
    }

    fn ind(sex: Sex, age: u32, smurf: bool) -> Individual {
        let mut i = Individual::founder(
            1,
            sex,
            Genotype::new(vec![[Allele::Wild; 2]]),
            AgingTraits::new(0.004, -0.02),
        )
        .with_age(age);
        if smurf {
            i.mark_smurf();
        }
        i
    }

    #[test]
    fn test_product_is_row_major() {
        let product = Splitter::Product {
            splitters: vec![Splitter::AgeCutoff { cutoff: 10 }, Splitter::Smurf],
        };
        assert_eq!(product.parts(), 4);
        assert_eq!(product.part_of(&ind(Sex::Male, 3, false)), Some(0));
        assert_eq!(product.part_of(&ind(Sex::Male, 3, true)), Some(1));
        assert_eq!(product.part_of(&ind(Sex::Male, 10, false)), Some(2));
        assert_eq!(product.part_of(&ind(Sex::Male, 15, true)), Some(3));
    }

    #[test]
    fn test_life_stages() {
        let c = stages();
        let larvae = c.id("larvae").unwrap();
        let adults = c.id("adults").unwrap();
        let smurfs = c.id("smurfs").unwrap();
        let males = c.id("males").unwrap();
        let females = c.id("females").unwrap();
        let newborn = c.id("newborn").unwrap();

        let egg = c.classify(&ind(Sex::Female, 0, false));
        assert!(egg.contains(larvae) && egg.contains(females) && egg.contains(newborn));
        assert!(!egg.contains(adults) && !egg.contains(males));

        let adult = c.classify(&ind(Sex::Male, 12, false));
        assert!(adult.contains(adults) && adult.contains(males));
        assert!(!adult.contains(smurfs) && !adult.contains(newborn));

        // smurf merges the young and mature smurf parts
        assert!(c.classify(&ind(Sex::Male, 4, true)).contains(smurfs));
        let old_smurf = c.classify(&ind(Sex::Female, 30, true));
        assert!(old_smurf.contains(smurfs) && !old_smurf.contains(adults));
    }

    #[test]
    fn test_members_in_store_order() {
        let c = stages();
        let population = vec![
            ind(Sex::Male, 12, false),
            ind(Sex::Male, 2, false),
            ind(Sex::Female, 20, true),
            ind(Sex::Female, 11, false),
        ];
        let ids = c.ids(&["smurfs", "adults"]).unwrap();
        assert_eq!(c.members(&population, &ids), vec![0, 2, 3]);
        assert_eq!(c.count(&population, c.id("larvae").unwrap()), 1);
    }

    #[test]
    fn test_membership_follows_attributes() {
        let c = stages();
        let adults = c.id("adults").unwrap();
        let mut i = ind(Sex::Female, 9, false);
        assert!(!c.contains(&i, adults));
        i.grow_older();
        assert!(c.contains(&i, adults));
        i.mark_smurf();
        assert!(!c.contains(&i, adults));
    }

    #[test]
    fn test_unknown_category() {
        let c = stages();
        assert_eq!(
            c.id("pupae"),
            Err(ConfigError::UnknownCategory("pupae".into()))
        );
    }

    #[test]
    fn test_invalid_part_and_duplicates() {
        let mut config = ClassificationConfig::life_stages(10);
        config.categories.push(CategoryDef::new("ghost", vec![7]));
        assert!(matches!(
            Classifier::new(&config),
            Err(ConfigError::InvalidPart { part: 7, total: 7, .. })
        ));

        let mut config = ClassificationConfig::life_stages(10);
        config.categories.push(CategoryDef::new("adults", vec![2]));
        assert!(matches!(
            Classifier::new(&config),
            Err(ConfigError::DuplicateCategory(_))
        ));
    }
}
