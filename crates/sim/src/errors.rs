use std::io;

use thiserror::Error;

/// Errors raised while validating a configuration, before any tick runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The population must hold at least one founder.
    #[error("Invalid population size: {0} (must be at least 1)")]
    InvalidPopulationSize(usize),

    /// A probability parameter fell outside [0, 1].
    #[error("Invalid probability for {name}: {value} (must be between 0.0 and 1.0)")]
    InvalidProbability { name: &'static str, value: f64 },

    /// A recombination vector does not carry one rate per chromosome.
    #[error("{side} recombination rates: expected {expected} values, found {found}")]
    RateVectorLength {
        side: &'static str,
        expected: usize,
        found: usize,
    },

    /// A category name is not produced by the classifier.
    #[error("Unknown category: '{0}'")]
    UnknownCategory(String),

    /// Two categories were declared with the same name.
    #[error("Duplicate category: '{0}'")]
    DuplicateCategory(String),

    /// A category merges a part index the splitters never produce.
    #[error("Category '{category}' references part {part}, but only {total} parts exist")]
    InvalidPart {
        category: String,
        part: usize,
        total: usize,
    },

    /// A locus index is past the end of the genome.
    #[error("Locus {locus} out of range (genome has {total} loci)")]
    LocusOutOfRange { locus: usize, total: usize },

    /// A mortality model name that matches no known model.
    #[error("Unknown mortality model: '{0}' (expected two_phases, weibull or gompertz)")]
    UnknownMortalityModel(String),

    /// Any other rejected parameter, described in free text.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A required builder parameter was never supplied.
    #[error("Missing required parameter: {0}")]
    MissingRequired(&'static str),
}

/// Errors writing the statistics stream or the pedigree log.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors replaying a pedigree log.
#[derive(Debug, Error)]
pub enum PedigreeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line could not be parsed.
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A parent id that was never born on an earlier line.
    #[error("Line {line}: parent {parent} of individual {offspring} has no earlier birth record")]
    UnknownParent {
        line: usize,
        offspring: u64,
        parent: u64,
    },

    /// The same id was born twice.
    #[error("Line {line}: individual {id} was already recorded")]
    DuplicateId { line: usize, id: u64 },
}

/// Errors that stop a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Recording error: {0}")]
    Storage(#[from] StorageError),
}

impl From<io::Error> for SimulationError {
    fn from(e: io::Error) -> Self {
        Self::Storage(StorageError::Io(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidProbability {
            name: "mutation rate",
            value: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "Invalid probability for mutation rate: 1.5 (must be between 0.0 and 1.0)"
        );
    }

    #[test]
    fn test_simulation_error_wraps_io() {
        let io_err = io::Error::other("disk full");
        let err = SimulationError::from(io_err);
        assert!(matches!(err, SimulationError::Storage(StorageError::Io(_))));
        assert!(err.to_string().contains("disk full"));
    }
}
