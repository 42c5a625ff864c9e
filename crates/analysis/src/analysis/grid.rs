//! Parameter sweeps over `(a, b)`.

use std::io::{self, Write};

use agepop_sim::evolution::{AgeFecundity, AgingConfig};
use agepop_sim::genome::AgingTraits;
use serde::Serialize;

use super::survival::{lifetime_output, survival_curve, SurvivalCurve};
use super::utils::linspace;
use crate::error::AnalysisError;

/// Parameter sets to compare, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    points: Vec<AgingTraits>,
}

impl ParameterGrid {
    pub fn new(points: Vec<AgingTraits>) -> Result<Self, AnalysisError> {
        if points.is_empty() {
            return Err(AnalysisError::EmptyGrid);
        }
        Ok(Self { points })
    }

    /// `n` values of `a` with a common onset age: `b = -a * t0`.
    pub fn fixed_onset(min_a: f64, max_a: f64, t0: f64, n: usize) -> Result<Self, AnalysisError> {
        Self::new(
            linspace(min_a, max_a, n)
                .into_iter()
                .map(|a| AgingTraits::new(a, -a * t0).with_onset())
                .collect(),
        )
    }

    /// `a` and `b` swept side by side, `n` points each.
    pub fn paired(
        (min_a, max_a): (f64, f64),
        (min_b, max_b): (f64, f64),
        n: usize,
    ) -> Result<Self, AnalysisError> {
        Self::new(
            linspace(min_a, max_a, n)
                .into_iter()
                .zip(linspace(min_b, max_b, n))
                .map(|(a, b)| AgingTraits::new(a, b).with_onset())
                .collect(),
        )
    }

    pub fn points(&self) -> &[AgingTraits] {
        &self.points
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalColumn {
    pub curve: SurvivalCurve,
    pub lifetime_output: f64,
}

/// Survival curves of a grid, one column per parameter set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalTable {
    pub oldest: u32,
    pub columns: Vec<SurvivalColumn>,
}

impl SurvivalTable {
    pub fn build(
        aging: &AgingConfig,
        grid: &ParameterGrid,
        oldest: u32,
        fecundity: &AgeFecundity,
    ) -> Result<Self, AnalysisError> {
        let columns = grid
            .points()
            .iter()
            .map(|traits| {
                let curve = survival_curve(aging, traits, oldest)?;
                let lifetime_output = lifetime_output(&curve, fecundity);
                Ok(SurvivalColumn {
                    curve,
                    lifetime_output,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;
        Ok(Self { oldest, columns })
    }

    fn header_line(&self, label: &str, value: impl Fn(&SurvivalColumn) -> String) -> String {
        let mut line = label.to_string();
        for column in &self.columns {
            line.push('\t');
            line.push_str(&value(column));
        }
        line
    }

    /// Tab-separated output: `#a`, `#b`, `#t0`, `#t1` and `#W` header lines,
    /// then one row per age from 1 to `oldest`.
    ///
    /// `t1 = (1 - b) / a` is the age at which `a * age + b` reaches 1.
    pub fn write_tsv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", self.header_line("#a ", |c| format!("{:8.4}", c.curve.traits.a)))?;
        writeln!(out, "{}", self.header_line("#b ", |c| format!("{:8.4}", c.curve.traits.b)))?;
        writeln!(
            out,
            "{}",
            self.header_line("#t0", |c| format!("{:8.2}", c.curve.traits.onset_age()))
        )?;
        writeln!(
            out,
            "{}",
            self.header_line("#t1", |c| {
                let traits = &c.curve.traits;
                format!("{:8.2}", (1.0 - traits.b) / traits.a)
            })
        )?;
        writeln!(out, "{}", self.header_line("#W ", |c| format!("{:8.4}", c.lifetime_output)))?;

        for age in 1..=self.oldest {
            write!(out, "{age}")?;
            for column in &self.columns {
                write!(out, "\t{:.8}", column.curve.values()[age as usize])?;
            }
            writeln!(out)?;
        }
        out.flush()
    }
}
