//! Survival under the aging models.
//!
//! `S(x)` is the probability that a newborn is still alive at the start of
//! the tick in which it has age `x`. In every tick the engine applies the
//! onset rule at the current age, then the death draw, then ages everyone by
//! one; the recurrences below follow the same order, so `S(0) = 1` and
//! `S(x + 1)` accounts for the tick spent at age `x`.

use agepop_sim::evolution::{AgeFecundity, AgingConfig, MortalityModel, SmurfOnset};
use agepop_sim::genome::AgingTraits;
use serde::Serialize;

use crate::error::AnalysisError;

/// `S(0) ..= S(oldest)` for one parameter set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalCurve {
    pub traits: AgingTraits,
    values: Vec<f64>,
}

impl SurvivalCurve {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Last age covered by the curve.
    pub fn oldest(&self) -> u32 {
        (self.values.len() - 1) as u32
    }

    pub fn at(&self, age: u32) -> Option<f64> {
        self.values.get(age as usize).copied()
    }

    /// Mean number of ticks survived, truncated at the end of the curve.
    pub fn expected_lifespan(&self) -> f64 {
        self.values[1..].iter().sum()
    }

    /// First age at which half of the cohort is gone.
    pub fn median_lifespan(&self) -> Option<u32> {
        self.values
            .iter()
            .position(|&s| s <= 0.5)
            .map(|age| age as u32)
    }
}

fn check_parameters(aging: &AgingConfig, traits: &AgingTraits) -> Result<(), AnalysisError> {
    aging
        .mortality
        .validate()
        .map_err(|e| AnalysisError::InvalidParameter(e.to_string()))?;
    if !(traits.a.is_finite() && traits.b.is_finite()) {
        return Err(AnalysisError::InvalidParameter(format!(
            "a and b must be finite, got a={} b={}",
            traits.a, traits.b
        )));
    }
    if aging.mortality.has_smurf_phase()
        && aging.onset == SmurfOnset::Exponential
        && !(traits.a > 0.0 && traits.onset_age().is_finite())
    {
        return Err(AnalysisError::InvalidParameter(format!(
            "exponential onset needs a > 0 and a finite t0, got a={}",
            traits.a
        )));
    }
    Ok(())
}

/// Survival curve of `traits` under `aging`, from age 0 to `oldest`.
pub fn survival_curve(
    aging: &AgingConfig,
    traits: &AgingTraits,
    oldest: u32,
) -> Result<SurvivalCurve, AnalysisError> {
    check_parameters(aging, traits)?;

    let mut values = Vec::with_capacity(oldest as usize + 1);
    values.push(1.0);
    match aging.mortality {
        MortalityModel::TwoPhases { .. } => {
            let keep = 1.0 - aging.mortality.death_probability(0, true, traits);
            let (mut normal, mut smurf) = (1.0_f64, 0.0_f64);
            for age in 0..oldest {
                let entering = normal * aging.onset.probability(age, traits).clamp(0.0, 1.0);
                normal -= entering;
                smurf = (smurf + entering) * keep;
                values.push(normal + smurf);
            }
        }
        model => {
            let mut alive = 1.0;
            for age in 0..oldest {
                alive *= 1.0 - model.death_probability(age, false, traits);
                values.push(alive);
            }
        }
    }

    Ok(SurvivalCurve {
        traits: *traits,
        values,
    })
}

/// `S(x)` for a single age.
pub fn survival_at(aging: &AgingConfig, traits: &AgingTraits, x: u32) -> Result<f64, AnalysisError> {
    let curve = survival_curve(aging, traits, x)?;
    Ok(curve.values[x as usize])
}

/// Two-phase model with exponential onset after `t0 = -b / a`.
pub fn two_phase_survival(a: f64, b: f64, k: f64, x: u32) -> Result<f64, AnalysisError> {
    let aging = AgingConfig {
        mortality: MortalityModel::TwoPhases { k },
        onset: SmurfOnset::Exponential,
    };
    survival_at(&aging, &AgingTraits::new(a, b).with_onset(), x)
}

/// Two-phase model with onset probability `a * age + b`.
pub fn linear_onset_survival(a: f64, b: f64, k: f64, x: u32) -> Result<f64, AnalysisError> {
    let aging = AgingConfig {
        mortality: MortalityModel::TwoPhases { k },
        onset: SmurfOnset::Linear,
    };
    survival_at(&aging, &AgingTraits::new(a, b), x)
}

/// Lifetime reproductive output `W = sum over x >= 1 of S(x) * fecundity(x)`.
pub fn lifetime_output(curve: &SurvivalCurve, fecundity: &AgeFecundity) -> f64 {
    curve
        .values
        .iter()
        .enumerate()
        .skip(1)
        .map(|(age, s)| s * fecundity.weight(age as u32))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use agepop_sim::base::Allele;
    use agepop_sim::genome::{Genotype, Individual, Sex};
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn two_phases(k: f64, onset: SmurfOnset) -> AgingConfig {
        AgingConfig {
            mortality: MortalityModel::TwoPhases { k },
            onset,
        }
    }

    /// Sum over the age of onset, written out term by term.
    fn exponential_reference(a: f64, b: f64, k: f64, x: u32) -> f64 {
        let t0 = -b / a;
        let first = t0.floor() as u32 + 1;
        let stay = |i: u32| (-a * f64::from(i) + a * t0 - a / 2.0).exp();
        if x <= first {
            return 1.0;
        }
        let mut s: f64 = (first..x).map(stay).product();
        for i in first..x {
            let normal_until: f64 = (first..i).map(stay).product();
            s += (1.0 - stay(i)) * (-k * f64::from(x - i)).exp() * normal_until;
        }
        s
    }

    #[test]
    fn test_no_death_before_onset() {
        for x in 0..=11 {
            assert_eq!(two_phase_survival(0.01, -0.1, 0.2, x).unwrap(), 1.0);
        }
        let onset = 1.0 - (-0.01f64 * 1.5).exp();
        let expected = 1.0 - onset * (1.0 - (-0.2f64).exp());
        let s12 = two_phase_survival(0.01, -0.1, 0.2, 12).unwrap();
        assert!((s12 - expected).abs() < 1e-12);
    }

    #[test]
    fn test_matches_sum_over_onset_age() {
        for &(a, b, k) in &[(0.0039, -0.039, 0.1911), (0.02, -0.25, 0.5), (0.05, -0.3, 0.05)] {
            for x in [5, 20, 40, 80] {
                let s = two_phase_survival(a, b, k, x).unwrap();
                let reference = exponential_reference(a, b, k, x);
                assert!((s - reference).abs() < 1e-10, "a={a} b={b} x={x}: {s} vs {reference}");
            }
        }
    }

    #[test]
    fn test_curve_is_monotone() {
        let curve = survival_curve(
            &two_phases(0.1911, SmurfOnset::Exponential),
            &AgingTraits::new(0.0039, -0.019).with_onset(),
            150,
        )
        .unwrap();
        assert_eq!(curve.oldest(), 150);
        assert_eq!(curve.at(0), Some(1.0));
        assert!(curve.values().windows(2).all(|w| w[1] <= w[0]));
        assert!(curve.values().iter().all(|s| (0.0..=1.0).contains(s)));
        assert!(curve.median_lifespan().is_some());
    }

    #[test]
    fn test_zero_hazard_never_dies() {
        let curve = survival_curve(
            &two_phases(0.0, SmurfOnset::Exponential),
            &AgingTraits::new(0.05, -0.1).with_onset(),
            60,
        )
        .unwrap();
        assert!(curve.values().iter().all(|&s| (s - 1.0).abs() < 1e-12));
        assert_eq!(curve.median_lifespan(), None);
    }

    #[test]
    fn test_linear_onset() {
        // onset probability 0.1 at age 6, smurfs die at once
        let s = linear_onset_survival(0.1, -0.5, 50.0, 7).unwrap();
        assert!((s - 0.9).abs() < 1e-9);
        assert_eq!(linear_onset_survival(0.1, -0.5, 50.0, 6).unwrap(), 1.0);
        // probability past 1 is certain onset
        let late = linear_onset_survival(0.1, -0.5, 50.0, 30).unwrap();
        assert!(late < 1e-9);
    }

    #[test]
    fn test_gompertz_is_product_of_hazards() {
        let aging = AgingConfig {
            mortality: MortalityModel::Gompertz,
            onset: SmurfOnset::Exponential,
        };
        let traits = AgingTraits::new(0.01, 0.08);
        let curve = survival_curve(&aging, &traits, 30).unwrap();
        let expected: f64 = (0..30)
            .map(|age| 1.0 - MortalityModel::Gompertz.death_probability(age, false, &traits))
            .product();
        assert!((curve.at(30).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_lifetime_output() {
        let curve = survival_curve(
            &two_phases(0.1911, SmurfOnset::Exponential),
            &AgingTraits::new(0.0039, -0.039).with_onset(),
            100,
        )
        .unwrap();
        let uniform = lifetime_output(&curve, &AgeFecundity::Uniform);
        assert!((uniform - curve.expected_lifespan()).abs() < 1e-12);

        let parabola = lifetime_output(&curve, &AgeFecundity::parabola());
        let manual: f64 = (10..=22)
            .map(|x| curve.at(x).unwrap() * (1.0 - (f64::from(x) - 12.0).powi(2) / 100.0))
            .sum();
        assert!((parabola - manual).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            two_phase_survival(0.0, -0.1, 0.2, 10),
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(matches!(
            two_phase_survival(0.01, -0.1, -1.0, 10),
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(matches!(
            linear_onset_survival(f64::NAN, -0.1, 0.2, 10),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_simulated_cohort_follows_curve() {
        let aging = two_phases(0.2, SmurfOnset::Exponential);
        let traits = AgingTraits::new(0.02, -0.2).with_onset();
        let curve = survival_curve(&aging, &traits, 40).unwrap();

        let n = 20_000;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(314);
        let mut cohort: Vec<Individual> = (1..=n)
            .map(|id| {
                let genotype = Genotype::new(vec![[Allele::Wild, Allele::Wild]]);
                Individual::founder(id, Sex::Female, genotype, traits)
            })
            .collect();

        for age in 0..40u32 {
            if age == 20 || age == 30 {
                let observed = cohort.len() as f64 / n as f64;
                let expected = curve.at(age).unwrap();
                assert!((observed - expected).abs() < 0.015, "age {age}: {observed} vs {expected}");
            }
            for ind in &mut cohort {
                ind.set_luck(rng.random());
                aging.update_smurf(ind);
            }
            cohort.retain(|ind| !aging.mortality.is_dying(ind, rng.random()));
            cohort.iter_mut().for_each(Individual::grow_older);
        }
    }
}
