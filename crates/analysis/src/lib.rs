//! Closed-form survival analysis for agepop aging models.
//!
//! The curves here are computed from the same mortality and onset rules the
//! simulator uses, so a large cohort in the engine converges to them.

pub mod analysis;
pub mod error;

pub use analysis::*;
pub use error::AnalysisError;
