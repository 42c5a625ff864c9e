//! Analysis tools for agepop
//!
//! - Survival curves of the two-phase, Weibull and Gompertz models
//! - Lifetime reproductive output under an age fecundity curve
//! - Parameter sweeps over `(a, b)` rendered as tables
//! - Summaries of replicate outcomes

pub mod grid;
pub mod survival;
pub mod utils;

// Re-export commonly used functions
pub use grid::{ParameterGrid, SurvivalTable};
pub use survival::{
    linear_onset_survival, lifetime_output, survival_at, survival_curve, two_phase_survival,
    SurvivalCurve,
};
pub use utils::{linspace, mean, std_dev, Summary};
