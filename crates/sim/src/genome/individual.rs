use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Genotype;
use crate::base::FitnessValue;

/// Identifier of an individual. Allocated in strictly increasing order.
pub type IndividualId = u64;

/// Parent id recorded for founders.
pub const FOUNDER_PARENT: IndividualId = 0;

/// Biological sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Single-letter code used in the pedigree log.
    pub fn code(self) -> char {
        match self {
            Self::Male => 'M',
            Self::Female => 'F',
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" | "m" | "male" => Ok(Self::Male),
            "F" | "f" | "female" => Ok(Self::Female),
            other => Err(format!("unknown sex '{other}'")),
        }
    }
}

/// Life-history parameters derived from the genotype at birth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgingTraits {
    /// Slope of the aging hazard.
    pub a: f64,
    /// Intercept of the aging hazard.
    pub b: f64,
    /// Explicit onset age, when the trait model assigns one.
    pub t0: Option<f64>,
}

impl AgingTraits {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b, t0: None }
    }

    /// Same parameters with `t0 = -b / a` attached.
    pub fn with_onset(self) -> Self {
        Self {
            t0: Some(-self.b / self.a),
            ..self
        }
    }

    /// Age at which the hazard crosses zero: `t0` if assigned, else `-b / a`.
    pub fn onset_age(&self) -> f64 {
        self.t0.unwrap_or(-self.b / self.a)
    }
}

/// A living diploid individual.
///
/// Category membership (larva, adult, smurf ...) is never stored here; it is
/// recomputed from age, sex and the smurf flag every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    id: IndividualId,
    sex: Sex,
    age: u32,
    genotype: Genotype,
    traits: AgingTraits,
    /// Once set, stays set until the individual is removed.
    smurf: bool,
    luck: f64,
    fitness: FitnessValue,
    father_id: IndividualId,
    mother_id: IndividualId,
    birthday: usize,
}

impl Individual {
    /// Create a founder: no recorded parents, born at tick 0.
    pub fn founder(id: IndividualId, sex: Sex, genotype: Genotype, traits: AgingTraits) -> Self {
        Self::offspring(id, sex, genotype, traits, FOUNDER_PARENT, FOUNDER_PARENT, 0)
    }

    /// Create a newborn of age 0 with the smurf flag cleared.
    pub fn offspring(
        id: IndividualId,
        sex: Sex,
        genotype: Genotype,
        traits: AgingTraits,
        father_id: IndividualId,
        mother_id: IndividualId,
        birthday: usize,
    ) -> Self {
        Self {
            id,
            sex,
            age: 0,
            genotype,
            traits,
            smurf: false,
            luck: 0.0,
            fitness: FitnessValue::NEUTRAL,
            father_id,
            mother_id,
            birthday,
        }
    }

    /// Set the starting age of a founder.
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    #[inline]
    pub fn id(&self) -> IndividualId {
        self.id
    }

    /// Assign the store identifier. Only the population store calls this.
    #[inline]
    pub(crate) fn set_id(&mut self, id: IndividualId) {
        self.id = id;
    }

    #[inline]
    pub fn sex(&self) -> Sex {
        self.sex
    }

    #[inline]
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Advance age by one tick.
    #[inline]
    pub fn grow_older(&mut self) {
        self.age += 1;
    }

    #[inline]
    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    /// Mutable genotype, for mutating a newborn before its traits are set.
    #[inline]
    pub(crate) fn genotype_mut(&mut self) -> &mut Genotype {
        &mut self.genotype
    }

    #[inline]
    pub fn traits(&self) -> &AgingTraits {
        &self.traits
    }

    #[inline]
    pub(crate) fn set_traits(&mut self, traits: AgingTraits) {
        self.traits = traits;
    }

    #[inline]
    pub fn is_smurf(&self) -> bool {
        self.smurf
    }

    /// Enter the smurf state. There is no way back.
    #[inline]
    pub fn mark_smurf(&mut self) {
        self.smurf = true;
    }

    /// The luck draw of the current tick.
    #[inline]
    pub fn luck(&self) -> f64 {
        self.luck
    }

    #[inline]
    pub fn set_luck(&mut self, luck: f64) {
        self.luck = luck;
    }

    #[inline]
    pub fn fitness(&self) -> FitnessValue {
        self.fitness
    }

    #[inline]
    pub fn set_fitness(&mut self, fitness: impl Into<FitnessValue>) {
        self.fitness = fitness.into();
    }

    #[inline]
    pub fn father_id(&self) -> IndividualId {
        self.father_id
    }

    #[inline]
    pub fn mother_id(&self) -> IndividualId {
        self.mother_id
    }

    /// True when both parent ids are the founder sentinel.
    pub fn is_founder(&self) -> bool {
        self.father_id == FOUNDER_PARENT && self.mother_id == FOUNDER_PARENT
    }

    /// Tick of birth.
    #[inline]
    pub fn birthday(&self) -> usize {
        self.birthday
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Allele;

    fn genotype() -> Genotype {
        Genotype::new(vec![[Allele::Mutant, Allele::Unexpressed]])
    }

    #[test]
    fn test_founder_has_sentinel_parents() {
        let ind = Individual::founder(7, Sex::Male, genotype(), AgingTraits::new(0.004, -0.02));
        assert_eq!(ind.id(), 7);
        assert!(ind.is_founder());
        assert_eq!(ind.father_id(), FOUNDER_PARENT);
        assert_eq!(ind.birthday(), 0);
        assert_eq!(ind.age(), 0);
        assert!(!ind.is_smurf());
    }

    #[test]
    fn test_offspring_records_parents() {
        let ind = Individual::offspring(
            12,
            Sex::Female,
            genotype(),
            AgingTraits::new(0.004, -0.02),
            3,
            4,
            9,
        );
        assert!(!ind.is_founder());
        assert_eq!((ind.father_id(), ind.mother_id()), (3, 4));
        assert_eq!(ind.birthday(), 9);
    }

    #[test]
    fn test_age_and_smurf_are_monotone() {
        let mut ind = Individual::founder(1, Sex::Female, genotype(), AgingTraits::new(0.004, -0.02))
            .with_age(3);
        ind.grow_older();
        assert_eq!(ind.age(), 4);
        ind.mark_smurf();
        ind.mark_smurf();
        assert!(ind.is_smurf());
    }

    #[test]
    fn test_onset_age() {
        let traits = AgingTraits::new(0.004, -0.02);
        assert!((traits.onset_age() - 5.0).abs() < 1e-12);
        let explicit = AgingTraits {
            t0: Some(8.0),
            ..traits
        };
        assert!((explicit.onset_age() - 8.0).abs() < 1e-12);
        assert_eq!(traits.with_onset().t0, Some(traits.onset_age()));
    }

    #[test]
    fn test_sex_codes() {
        assert_eq!(Sex::Male.to_string(), "M");
        assert_eq!("F".parse::<Sex>().unwrap(), Sex::Female);
        assert!("X".parse::<Sex>().is_err());
    }
}
