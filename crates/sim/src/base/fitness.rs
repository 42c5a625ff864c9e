use std::fmt;
use std::iter::Sum;
use std::ops::{Mul, MulAssign};

use serde::{Deserialize, Serialize};

/// Relative reproduction weight of a candidate parent, kept in [0.0, 1.0].
///
/// Weights only bias parent choice during sexual reproduction; they never
/// remove anyone from the population.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FitnessValue(f64);

impl FitnessValue {
    /// Full reproductive weight.
    pub const NEUTRAL: Self = Self(1.0);
    /// Cannot be drawn as a parent unless every candidate is at zero.
    pub const LETHAL: Self = Self(0.0);

    /// Creates a weight, clamping the input to [0.0, 1.0].
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the inner f64 value.
    pub fn get(self) -> f64 {
        self.0
    }

    /// True for a zero weight.
    pub fn is_lethal(self) -> bool {
        self.0 <= 0.0
    }
}

impl From<FitnessValue> for f64 {
    fn from(fitness: FitnessValue) -> Self {
        fitness.0
    }
}

impl From<f64> for FitnessValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl Default for FitnessValue {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for FitnessValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Mul for FitnessValue {
    type Output = Self;

    /// Independent components combine multiplicatively.
    fn mul(self, rhs: Self) -> Self::Output {
        FitnessValue::new(self.0 * rhs.0)
    }
}

impl MulAssign for FitnessValue {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

/// Sums raw weights, which are no longer bounded by 1.
impl<'a> Sum<&'a FitnessValue> for f64 {
    fn sum<I: Iterator<Item = &'a FitnessValue>>(iter: I) -> Self {
        iter.map(|f| f.0).sum()
    }
}
