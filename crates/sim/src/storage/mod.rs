//! Recording of simulation output.
//!
//! The engine reports births and end-of-tick states to a [`Recorder`]. Two
//! writers are provided: a tab-separated statistics stream and a pedigree
//! log with one line per birth. [`PedigreeReplay`] reads a log back and
//! checks its consistency.

mod pedigree;
mod recorder;
mod statistics;
pub mod types;

pub use pedigree::{BirthRecord, PedigreeRecorder, PedigreeReplay};
pub use recorder::{MemoryRecorder, Recorder};
pub use statistics::{Cell, StatisticsRecorder, UNDEFINED};
pub use types::{PedigreeConfig, RecordingConfig, RecordingStrategy, Statistic, TraitField};
