//! Genotype-to-phenotype mapping for the aging parameters `a`, `b` and `t0`.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::genome::{AgingTraits, GenomeLayout, Genotype, Sex};

/// A fixed `(a, b)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgingParams {
    pub a: f64,
    pub b: f64,
}

impl AgingParams {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

/// How `b` follows from `a`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum BRule {
    /// `b` does not depend on the genotype.
    Constant { b: f64 },
    /// `b = factor * a`.
    Proportional { factor: f64 },
}

impl BRule {
    #[inline]
    pub fn apply(&self, a: f64) -> f64 {
        match *self {
            Self::Constant { b } => b,
            Self::Proportional { factor } => factor * a,
        }
    }
}

/// Trait model variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum TraitModel {
    /// Same parameters for every individual of a sex.
    Constant {
        female: AgingParams,
        male: AgingParams,
    },
    /// One locus shifts `a` of one sex by `effect` per mutant copy.
    LocusEffect {
        locus: usize,
        sex: Sex,
        base_a: f64,
        effect: f64,
        b: BRule,
    },
    /// Every mutant copy anywhere adds `(max_a - min_a) / total_loci`.
    AdditiveCodominant { min_a: f64, max_a: f64, b: BRule },
    /// A locus adds `(max_a - min_a) / total_loci` only when every copy the
    /// individual carries is mutant: one copy on a hemizygous locus, both
    /// copies otherwise.
    AdditiveRecessive { min_a: f64, max_a: f64, b: BRule },
}

impl TraitModel {
    fn gene_effect(min_a: f64, max_a: f64, layout: &GenomeLayout) -> f64 {
        (max_a - min_a) / layout.total_loci() as f64
    }

    /// Loci at which every expressed copy is mutant.
    fn recessive_hits(genotype: &Genotype, sex: Sex, layout: &GenomeLayout) -> u32 {
        let mut hits = 0;
        for (chr, spec) in layout.chromosomes().iter().enumerate() {
            let copies = spec.kind.copies(sex);
            if copies == 0 {
                continue;
            }
            for locus in layout.range(chr) {
                if genotype.mutant_dosage(locus) == copies {
                    hits += 1;
                }
            }
        }
        hits
    }

    /// Compute `(a, b)` for a genotype.
    pub fn params(&self, genotype: &Genotype, sex: Sex, layout: &GenomeLayout) -> AgingParams {
        match self {
            Self::Constant { female, male } => match sex {
                Sex::Female => *female,
                Sex::Male => *male,
            },
            Self::LocusEffect {
                locus,
                sex: affected,
                base_a,
                effect,
                b,
            } => {
                let a = if sex == *affected {
                    base_a + effect * f64::from(genotype.mutant_dosage(*locus))
                } else {
                    *base_a
                };
                AgingParams::new(a, b.apply(a))
            }
            Self::AdditiveCodominant { min_a, max_a, b } => {
                let a = min_a
                    + f64::from(genotype.total_dosage()) * Self::gene_effect(*min_a, *max_a, layout);
                AgingParams::new(a, b.apply(a))
            }
            Self::AdditiveRecessive { min_a, max_a, b } => {
                let hits = Self::recessive_hits(genotype, sex, layout);
                let a = min_a + f64::from(hits) * Self::gene_effect(*min_a, *max_a, layout);
                AgingParams::new(a, b.apply(a))
            }
        }
    }

    pub fn validate(&self, layout: &GenomeLayout) -> Result<(), ConfigError> {
        let finite = |name: &str, v: f64| {
            if v.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter(format!(
                    "trait parameter {name} must be finite, got {v}"
                )))
            }
        };
        let check_b = |rule: &BRule| match rule {
            BRule::Constant { b } => finite("b", *b),
            BRule::Proportional { factor } => finite("b factor", *factor),
        };
        match self {
            Self::Constant { female, male } => {
                finite("female a", female.a)?;
                finite("female b", female.b)?;
                finite("male a", male.a)?;
                finite("male b", male.b)
            }
            Self::LocusEffect {
                locus,
                base_a,
                effect,
                b,
                ..
            } => {
                layout.check_locus(*locus)?;
                finite("base_a", *base_a)?;
                finite("effect", *effect)?;
                check_b(b)
            }
            Self::AdditiveCodominant { min_a, max_a, b }
            | Self::AdditiveRecessive { min_a, max_a, b } => {
                finite("min_a", *min_a)?;
                finite("max_a", *max_a)?;
                check_b(b)
            }
        }
    }
}

/// Trait model plus whether newborns carry an explicit onset age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitAssignment {
    pub model: TraitModel,
    /// Attach `t0 = -b / a` to every newborn.
    #[serde(default)]
    pub onset: bool,
}

impl TraitAssignment {
    pub fn new(model: TraitModel) -> Self {
        Self {
            model,
            onset: false,
        }
    }

    pub fn with_onset(mut self) -> Self {
        self.onset = true;
        self
    }

    /// Derive the aging traits of a newborn from its genotype and sex.
    pub fn assign_traits(&self, genotype: &Genotype, sex: Sex, layout: &GenomeLayout) -> AgingTraits {
        let AgingParams { a, b } = self.model.params(genotype, sex, layout);
        let traits = AgingTraits::new(a, b);
        if self.onset {
            traits.with_onset()
        } else {
            traits
        }
    }

    pub fn validate(&self, layout: &GenomeLayout) -> Result<(), ConfigError> {
        self.model.validate(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Allele;
    use crate::genome::ChromosomeSpec;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn layout() -> GenomeLayout {
        GenomeLayout::new(vec![ChromosomeSpec::x(2), ChromosomeSpec::autosome("2L", 2)]).unwrap()
    }

    fn genotype(alleles: &[[u8; 2]], sex: Sex, layout: &GenomeLayout) -> Genotype {
        let mut g = Genotype::new(
            alleles
                .iter()
                .map(|&[x, y]| [Allele::from_mutant(x == 1), Allele::from_mutant(y == 1)])
                .collect(),
        );
        g.mask(layout, sex);
        g
    }

    #[test]
    fn test_b_rules() {
        assert!(approx_eq(BRule::Constant { b: -0.02 }.apply(1.0), -0.02));
        assert!(approx_eq(BRule::Proportional { factor: -10.0 }.apply(0.004), -0.04));
    }

    #[test]
    fn test_constant_per_sex() {
        let layout = layout();
        let model = TraitModel::Constant {
            female: AgingParams::new(0.004, -0.02),
            male: AgingParams::new(0.005, -0.03),
        };
        let g = genotype(&[[0, 0]; 4], Sex::Male, &layout);
        assert_eq!(model.params(&g, Sex::Male, &layout), AgingParams::new(0.005, -0.03));
        assert_eq!(model.params(&g, Sex::Female, &layout), AgingParams::new(0.004, -0.02));
    }

    #[test]
    fn test_locus_effect_only_in_affected_sex() {
        let layout = layout();
        let model = TraitModel::LocusEffect {
            locus: 0,
            sex: Sex::Male,
            base_a: 0.0039,
            effect: 0.0013,
            b: BRule::Constant { b: -0.019 },
        };
        let son = genotype(&[[1, 0], [0, 0], [0, 0], [0, 0]], Sex::Male, &layout);
        let daughter = genotype(&[[1, 1], [0, 0], [0, 0], [0, 0]], Sex::Female, &layout);
        assert!(approx_eq(model.params(&son, Sex::Male, &layout).a, 0.0052));
        assert!(approx_eq(model.params(&daughter, Sex::Female, &layout).a, 0.0039));
    }

    #[test]
    fn test_additive_codominant() {
        let layout = layout();
        let model = TraitModel::AdditiveCodominant {
            min_a: 0.002,
            max_a: 0.006,
            b: BRule::Proportional { factor: -10.0 },
        };
        let g = genotype(&[[1, 1], [0, 1], [1, 0], [0, 0]], Sex::Female, &layout);
        // 4 mutant copies, gene effect 0.001
        let p = model.params(&g, Sex::Female, &layout);
        assert!(approx_eq(p.a, 0.006));
        assert!(approx_eq(p.b, -0.06));
    }

    #[test]
    fn test_additive_recessive_branches_on_chromosome_type() {
        let layout = layout();
        let model = TraitModel::AdditiveRecessive {
            min_a: 0.002,
            max_a: 0.006,
            b: BRule::Constant { b: -0.02 },
        };
        // Male: X loci hemizygous, a single mutant copy counts.
        let son = genotype(&[[1, 0], [0, 0], [1, 0], [1, 1]], Sex::Male, &layout);
        assert!(approx_eq(model.params(&son, Sex::Male, &layout).a, 0.004));

        // Female: X heterozygote does not count, homozygote does.
        let daughter = genotype(&[[1, 0], [1, 1], [1, 0], [1, 1]], Sex::Female, &layout);
        assert!(approx_eq(model.params(&daughter, Sex::Female, &layout).a, 0.004));
    }

    #[test]
    fn test_assign_traits_with_onset() {
        let layout = layout();
        let assignment = TraitAssignment::new(TraitModel::Constant {
            female: AgingParams::new(0.004, -0.02),
            male: AgingParams::new(0.004, -0.02),
        })
        .with_onset();
        let g = genotype(&[[0, 0]; 4], Sex::Female, &layout);
        let traits = assignment.assign_traits(&g, Sex::Female, &layout);
        assert!(approx_eq(traits.t0.unwrap(), 5.0));
    }

    #[test]
    fn test_validate_checks_locus() {
        let model = TraitModel::LocusEffect {
            locus: 9,
            sex: Sex::Male,
            base_a: 0.004,
            effect: 0.001,
            b: BRule::Constant { b: -0.02 },
        };
        assert!(model.validate(&layout()).is_err());
    }
}
