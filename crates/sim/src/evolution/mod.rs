//! Evolution module: the per-individual operators.
//!
//! - **Recombination**: sex-specific switching rates and Mendelian transmission
//! - **Mutation**: biallelic point mutation of newborns
//! - **Traits**: genotype-to-`(a, b, t0)` mapping
//! - **Selection**: age and genotype reproduction weights
//! - **Mortality**: two-phase, Weibull and Gompertz death decisions

pub mod mortality;
pub mod mutation;
pub mod recombination;
pub mod selection;
pub mod traits;

pub use mortality::{AgingConfig, MortalityKind, MortalityModel, SmurfOnset};
pub use mutation::MutationModel;
pub use recombination::RecombinationModel;
pub use selection::{AgeFecundity, FitnessModel, GenotypeSelection, SelectionCoefficient};
pub use traits::{AgingParams, BRule, TraitAssignment, TraitModel};
