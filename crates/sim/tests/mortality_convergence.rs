//! Empirical death rates against the model hazards.

use agepop_sim::base::Allele;
use agepop_sim::evolution::{AgingConfig, MortalityModel, SmurfOnset};
use agepop_sim::genome::{AgingTraits, Genotype, Individual, Sex};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

fn cohort(n: u64, traits: AgingTraits, age: u32) -> Vec<Individual> {
    (1..=n)
        .map(|id| {
            let genotype = Genotype::new(vec![[Allele::Wild, Allele::Wild]]);
            Individual::founder(id, Sex::Female, genotype, traits).with_age(age)
        })
        .collect()
}

fn death_rate(model: &MortalityModel, individuals: &[Individual], seed: u64) -> f64 {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let deaths = individuals
        .iter()
        .filter(|ind| model.is_dying(ind, rng.random()))
        .count();
    deaths as f64 / individuals.len() as f64
}

#[test]
fn test_two_phase_smurf_hazard() {
    let model = MortalityModel::TwoPhases { k: 0.2 };
    let mut smurfs = cohort(200_000, AgingTraits::new(0.004, -0.02), 30);
    smurfs.iter_mut().for_each(Individual::mark_smurf);

    let expected = 1.0 - (-0.2f64).exp();
    let observed = death_rate(&model, &smurfs, 17);
    // binomial sd is about 0.00086
    assert!((observed - expected).abs() < 0.005, "observed {observed}, expected {expected}");

    let normals = cohort(10_000, AgingTraits::new(0.004, -0.02), 30);
    assert_eq!(death_rate(&model, &normals, 18), 0.0);
}

#[test]
fn test_gompertz_and_weibull_hazards() {
    let traits = AgingTraits::new(0.01, 0.08);
    let individuals = cohort(100_000, traits, 25);
    for (seed, model) in [(1, MortalityModel::Gompertz), (2, MortalityModel::Weibull)] {
        let expected = model.death_probability(25, false, &traits);
        let observed = death_rate(&model, &individuals, seed);
        assert!(
            (observed - expected).abs() < 0.01,
            "{model:?}: observed {observed}, expected {expected}"
        );
    }
}

#[test]
fn test_exponential_onset_fraction() {
    let aging = AgingConfig {
        mortality: MortalityModel::TwoPhases { k: 0.2 },
        onset: SmurfOnset::Exponential,
    };
    let traits = AgingTraits::new(0.05, -0.5).with_onset();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);

    let mut young = cohort(10_000, traits, 10);
    for ind in &mut young {
        ind.set_luck(rng.random());
        aging.update_smurf(ind);
    }
    assert!(young.iter().all(|i| !i.is_smurf()), "no onset at t0");

    let mut old = cohort(100_000, traits, 20);
    for ind in &mut old {
        ind.set_luck(rng.random());
        aging.update_smurf(ind);
    }
    let expected = 1.0 - (-0.05f64 * (20.0 - 10.0 + 0.5)).exp();
    let observed = old.iter().filter(|i| i.is_smurf()).count() as f64 / old.len() as f64;
    assert!((observed - expected).abs() < 0.01, "observed {observed}, expected {expected}");
}
