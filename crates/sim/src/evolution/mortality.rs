//! Mortality models and the smurf onset rule.
//!
//! Under the two-phase model an individual first lives in a normal state in
//! which it cannot die, then enters the smurf state through an age-dependent
//! onset rule, and from there dies with a constant per-tick hazard. The
//! Weibull and Gompertz models have no smurf phase; the hazard depends on
//! age and on the individual's own `(a, b)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::genome::{AgingTraits, Individual};

/// Default constant hazard of the smurf phase.
pub const DEFAULT_SMURF_HAZARD: f64 = 0.1911;

/// Mortality model names, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MortalityKind {
    TwoPhases,
    Weibull,
    Gompertz,
}

impl FromStr for MortalityKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "two_phases" | "two-phases" | "two_phase" | "two-phase" | "smurf" => Ok(Self::TwoPhases),
            "weibull" | "weibul" => Ok(Self::Weibull),
            "gompertz" | "gomperz" => Ok(Self::Gompertz),
            _ => Err(ConfigError::UnknownMortalityModel(s.to_string())),
        }
    }
}

impl fmt::Display for MortalityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TwoPhases => "two_phases",
            Self::Weibull => "weibull",
            Self::Gompertz => "gompertz",
        };
        write!(f, "{name}")
    }
}

/// Per-tick death decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum MortalityModel {
    /// Smurfs die with probability `1 - exp(-k)`; nobody else dies.
    TwoPhases { k: f64 },
    /// `1 - exp(-(a/b) * ((age + 1)^b - age^b))`.
    Weibull,
    /// `1 - exp((a * exp(b * age) / b) * (1 - exp(b)))`.
    Gompertz,
}

impl MortalityModel {
    /// Model of the given kind. `k` only matters for the two-phase model.
    pub fn from_kind(kind: MortalityKind, k: f64) -> Self {
        match kind {
            MortalityKind::TwoPhases => Self::TwoPhases { k },
            MortalityKind::Weibull => Self::Weibull,
            MortalityKind::Gompertz => Self::Gompertz,
        }
    }

    pub fn kind(&self) -> MortalityKind {
        match self {
            Self::TwoPhases { .. } => MortalityKind::TwoPhases,
            Self::Weibull => MortalityKind::Weibull,
            Self::Gompertz => MortalityKind::Gompertz,
        }
    }

    /// Only the two-phase model has a smurf state.
    pub fn has_smurf_phase(&self) -> bool {
        matches!(self, Self::TwoPhases { .. })
    }

    /// Probability of dying this tick, in [0, 1].
    pub fn death_probability(&self, age: u32, smurf: bool, traits: &AgingTraits) -> f64 {
        let p = match *self {
            Self::TwoPhases { k } => {
                if smurf {
                    1.0 - (-k).exp()
                } else {
                    0.0
                }
            }
            Self::Weibull => {
                let (a, b) = (traits.a, traits.b);
                let x = f64::from(age);
                1.0 - (-(a / b) * ((x + 1.0).powf(b) - x.powf(b))).exp()
            }
            Self::Gompertz => {
                let (a, b) = (traits.a, traits.b);
                let x = f64::from(age);
                1.0 - ((a * (b * x).exp() / b) * (1.0 - b.exp())).exp()
            }
        };
        if p.is_nan() {
            0.0
        } else {
            p.clamp(0.0, 1.0)
        }
    }

    /// Compare one uniform draw in [0, 1) against the death probability.
    pub fn is_dying(&self, individual: &Individual, draw: f64) -> bool {
        draw < self.death_probability(individual.age(), individual.is_smurf(), individual.traits())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::TwoPhases { k } if !(k.is_finite() && k >= 0.0) => Err(
                ConfigError::InvalidParameter(format!("smurf hazard k must be finite and >= 0, got {k}")),
            ),
            _ => Ok(()),
        }
    }
}

impl Default for MortalityModel {
    fn default() -> Self {
        Self::TwoPhases {
            k: DEFAULT_SMURF_HAZARD,
        }
    }
}

/// How a normal individual becomes a smurf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmurfOnset {
    /// Probability `a * age + b`.
    Linear,
    /// Zero up to `t0`, then `1 - exp(-a * (age - t0 + 1/2))`.
    #[default]
    Exponential,
}

impl SmurfOnset {
    /// Onset probability at `age` (not clamped; compared against a draw).
    pub fn probability(&self, age: u32, traits: &AgingTraits) -> f64 {
        let x = f64::from(age);
        match self {
            Self::Linear => traits.a * x + traits.b,
            Self::Exponential => {
                let t0 = traits.onset_age();
                if x > t0 {
                    1.0 - (-traits.a * x + traits.a * t0 - traits.a / 2.0).exp()
                } else {
                    0.0
                }
            }
        }
    }

    /// Whether `individual` is a smurf after this tick's luck draw.
    ///
    /// Smurfs stay smurfs.
    pub fn becomes_smurf(&self, individual: &Individual) -> bool {
        individual.is_smurf()
            || individual.luck() < self.probability(individual.age(), individual.traits())
    }
}

/// Mortality model together with its onset rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgingConfig {
    pub mortality: MortalityModel,
    #[serde(default)]
    pub onset: SmurfOnset,
}

impl AgingConfig {
    /// Apply the onset rule in place. No-op for models without a smurf phase.
    /// Returns true when the individual entered the smurf state.
    pub fn update_smurf(&self, individual: &mut Individual) -> bool {
        if !self.mortality.has_smurf_phase() || individual.is_smurf() {
            return false;
        }
        if self.onset.becomes_smurf(individual) {
            individual.mark_smurf();
            true
        } else {
            false
        }
    }
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            mortality: MortalityModel::default(),
            onset: SmurfOnset::Exponential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Allele;
    use crate::genome::{Genotype, Sex};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn individual(age: u32, traits: AgingTraits) -> Individual {
        Individual::founder(1, Sex::Female, Genotype::new(vec![[Allele::Wild; 2]]), traits)
            .with_age(age)
    }

    #[test]
    fn test_kind_aliases() {
        for name in ["two_phases", "two-phase", "smurf", "Two_Phases"] {
            assert_eq!(name.parse::<MortalityKind>().unwrap(), MortalityKind::TwoPhases);
        }
        assert_eq!("weibul".parse::<MortalityKind>().unwrap(), MortalityKind::Weibull);
        assert_eq!("gomperz".parse::<MortalityKind>().unwrap(), MortalityKind::Gompertz);
        assert!(matches!(
            "logistic".parse::<MortalityKind>(),
            Err(ConfigError::UnknownMortalityModel(_))
        ));
    }

    #[test]
    fn test_two_phase_probability() {
        let model = MortalityModel::TwoPhases { k: 0.2 };
        let traits = AgingTraits::new(0.004, -0.02);
        assert!(approx_eq(model.death_probability(30, false, &traits), 0.0));
        assert!(approx_eq(
            model.death_probability(30, true, &traits),
            1.0 - (-0.2f64).exp()
        ));
        assert!(approx_eq(
            model.death_probability(0, true, &traits),
            model.death_probability(60, true, &traits)
        ));
    }

    #[test]
    fn test_two_phase_probability_increases_with_k() {
        let traits = AgingTraits::new(0.004, -0.02);
        let low = MortalityModel::TwoPhases { k: 0.1 }.death_probability(1, true, &traits);
        let high = MortalityModel::TwoPhases { k: 0.5 }.death_probability(1, true, &traits);
        assert!(low < high);
        assert!(high < 1.0);
    }

    #[test]
    fn test_weibull_probability() {
        let traits = AgingTraits::new(0.01, 2.0);
        let p = MortalityModel::Weibull.death_probability(3, false, &traits);
        // (a/b) * (16 - 9) = 0.035
        assert!(approx_eq(p, 1.0 - (-0.035f64).exp()));
    }

    #[test]
    fn test_gompertz_probability() {
        let traits = AgingTraits::new(0.01, 0.1);
        let p = MortalityModel::Gompertz.death_probability(5, false, &traits);
        let expected = 1.0 - ((0.01 * (0.5f64).exp() / 0.1) * (1.0 - (0.1f64).exp())).exp();
        assert!(approx_eq(p, expected));
        assert!(p > MortalityModel::Gompertz.death_probability(1, false, &traits));
    }

    #[test]
    fn test_is_dying_compares_draw() {
        let model = MortalityModel::TwoPhases { k: 0.2 };
        let mut ind = individual(20, AgingTraits::new(0.004, -0.02));
        assert!(!model.is_dying(&ind, 0.0));
        ind.mark_smurf();
        assert!(model.is_dying(&ind, 0.1));
        assert!(!model.is_dying(&ind, 0.5));
    }

    #[test]
    fn test_exponential_onset_is_zero_before_t0() {
        let traits = AgingTraits::new(0.004, -0.02);
        let onset = SmurfOnset::Exponential;
        assert!(approx_eq(onset.probability(5, &traits), 0.0));
        let p = onset.probability(10, &traits);
        assert!(approx_eq(p, 1.0 - (-0.004 * 5.5f64).exp()));
    }

    #[test]
    fn test_linear_onset() {
        let traits = AgingTraits::new(0.004, -0.02);
        assert!(approx_eq(SmurfOnset::Linear.probability(10, &traits), 0.02));
    }

    #[test]
    fn test_update_smurf_is_monotone() {
        let aging = AgingConfig::default();
        let mut ind = individual(50, AgingTraits::new(0.004, -0.02));
        ind.set_luck(0.0);
        assert!(aging.update_smurf(&mut ind));
        ind.set_luck(0.999);
        assert!(!aging.update_smurf(&mut ind));
        assert!(ind.is_smurf());
    }

    #[test]
    fn test_no_smurfs_without_smurf_phase() {
        let aging = AgingConfig {
            mortality: MortalityModel::Gompertz,
            onset: SmurfOnset::Exponential,
        };
        let mut ind = individual(50, AgingTraits::new(0.004, -0.02));
        ind.set_luck(0.0);
        assert!(!aging.update_smurf(&mut ind));
        assert!(!ind.is_smurf());
    }
}
