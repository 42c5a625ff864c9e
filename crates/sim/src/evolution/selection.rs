//! Fitness as a reproduction weight.
//!
//! The weight of a candidate parent is an age-specific fecundity multiplied
//! by a sex-specific genotype factor at one locus. Weights bias who gets
//! drawn as a parent; they never kill anyone.

use serde::{Deserialize, Serialize};

use crate::base::FitnessValue;
use crate::errors::ConfigError;
use crate::genome::{GenomeLayout, Genotype, Sex};

/// Age-specific reproductive value from Lin et al. 2014 (Florida
/// Entomologist 94(4):1434-43, Fig. 4B), ages 0 to 49.
const LIN_2014: [f64; 50] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 23.0, //
    27.0, 14.0, 17.0, 19.0, 21.0, 21.0, 23.0, 24.0, 26.0, 26.0, //
    26.0, 27.0, 25.0, 23.0, 23.0, 22.0, 20.0, 17.0, 16.0, 13.0, //
    12.0, 9.0, 6.0, 7.0, 7.0, 4.0, 8.0, 8.0, 3.0, 4.0, //
    3.0, 3.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
];

/// Age component of fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum AgeFecundity {
    /// Every age reproduces equally.
    Uniform,
    /// Zero below `floor`, then `1 - (age - peak)^2 / width`, clipped at zero.
    Parabola { floor: u32, peak: f64, width: f64 },
    /// Reproductive value per age, normalized by the largest entry.
    /// Ages past the end of the table have zero weight.
    Table { values: Vec<f64> },
}

impl AgeFecundity {
    /// The default fecundity curve: mature at 10, peak at 12.
    pub fn parabola() -> Self {
        Self::Parabola {
            floor: 10,
            peak: 12.0,
            width: 100.0,
        }
    }

    /// The Lin et al. 2014 reproductive-value table.
    pub fn lin_2014() -> Self {
        Self::Table {
            values: LIN_2014.to_vec(),
        }
    }

    pub fn weight(&self, age: u32) -> f64 {
        match self {
            Self::Uniform => 1.0,
            Self::Parabola { floor, peak, width } => {
                if age < *floor {
                    0.0
                } else {
                    let d = f64::from(age) - peak;
                    (1.0 - d * d / width).max(0.0)
                }
            }
            Self::Table { values } => {
                let max = values.iter().copied().fold(0.0, f64::max);
                if max <= 0.0 {
                    return 0.0;
                }
                values.get(age as usize).map_or(0.0, |v| v / max)
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Uniform => Ok(()),
            Self::Parabola { peak, width, .. } => {
                if *width > 0.0 && peak.is_finite() {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidParameter(format!(
                        "fecundity parabola needs a finite peak and positive width, got peak {peak}, width {width}"
                    )))
                }
            }
            Self::Table { values } => {
                if values.iter().all(|v| v.is_finite() && *v >= 0.0) {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidParameter(
                        "fecundity table entries must be finite and non-negative".into(),
                    ))
                }
            }
        }
    }
}

/// Selection coefficient `s` with dominance `h`, acting against the wild allele.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionCoefficient {
    pub s: f64,
    pub h: f64,
}

impl SelectionCoefficient {
    pub fn new(s: f64, h: f64) -> Self {
        Self { s, h }
    }

    /// Factor for an individual carrying `dosage` mutant copies out of `copies`.
    ///
    /// All copies mutant gives 1, none gives `1 - s`, anything between
    /// `1 - h * s`.
    pub fn factor(&self, dosage: u32, copies: u32) -> f64 {
        if copies == 0 || dosage == copies {
            1.0
        } else if dosage == 0 {
            1.0 - self.s
        } else {
            1.0 - self.h * self.s
        }
    }
}

/// Genotype component of fitness at one locus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenotypeSelection {
    pub locus: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub female: Option<SelectionCoefficient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub male: Option<SelectionCoefficient>,
}

impl GenotypeSelection {
    pub fn factor(&self, genotype: &Genotype, sex: Sex, layout: &GenomeLayout) -> f64 {
        let coefficient = match sex {
            Sex::Female => self.female,
            Sex::Male => self.male,
        };
        let Some(coefficient) = coefficient else {
            return 1.0;
        };
        let copies = layout
            .kind_of(self.locus)
            .map_or(0, |kind| kind.copies(sex));
        coefficient.factor(genotype.mutant_dosage(self.locus), copies)
    }
}

/// Fecundity curve times an optional genotype factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessModel {
    pub age: AgeFecundity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genotype: Option<GenotypeSelection>,
}

impl FitnessModel {
    /// Every individual gets the same weight.
    pub fn neutral() -> Self {
        Self {
            age: AgeFecundity::Uniform,
            genotype: None,
        }
    }

    pub fn fitness(&self, genotype: &Genotype, sex: Sex, age: u32, layout: &GenomeLayout) -> FitnessValue {
        let mut value = FitnessValue::new(self.age.weight(age));
        if let Some(selection) = &self.genotype {
            value *= FitnessValue::new(selection.factor(genotype, sex, layout));
        }
        value
    }

    pub fn validate(&self, layout: &GenomeLayout) -> Result<(), ConfigError> {
        self.age.validate()?;
        if let Some(selection) = &self.genotype {
            layout.check_locus(selection.locus)?;
            for c in [selection.female, selection.male].into_iter().flatten() {
                for (name, value) in [("selection coefficient", c.s), ("dominance", c.h)] {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(ConfigError::InvalidProbability { name, value });
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for FitnessModel {
    fn default() -> Self {
        Self::neutral()
    }
}
