//! The observer interface the engine reports to.

use crate::errors::StorageError;
use crate::genome::Individual;
use crate::simulation::{Classifier, Population};

/// Receives births and end-of-tick states from the engine.
///
/// Every method has a no-op default so a recorder only implements what it
/// consumes. Founders are reported through [`Recorder::record_birth`] before
/// the first tick, like any other birth.
pub trait Recorder {
    /// Called once per newborn, in id order.
    fn record_birth(&mut self, _individual: &Individual) -> Result<(), StorageError> {
        Ok(())
    }

    /// Called after the live set has been replaced.
    fn record_generation(
        &mut self,
        _population: &Population,
        _classifier: &Classifier,
    ) -> Result<(), StorageError> {
        Ok(())
    }

    /// Called once with the last state when the run stops, before
    /// [`Recorder::finish`]. The generation may already have been reported.
    fn record_final(
        &mut self,
        _population: &Population,
        _classifier: &Classifier,
    ) -> Result<(), StorageError> {
        Ok(())
    }

    /// Flush everything. Called once when the run stops.
    fn finish(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Records nothing.
impl Recorder for () {}

impl<R: Recorder + ?Sized> Recorder for &mut R {
    fn record_birth(&mut self, individual: &Individual) -> Result<(), StorageError> {
        (**self).record_birth(individual)
    }

    fn record_generation(
        &mut self,
        population: &Population,
        classifier: &Classifier,
    ) -> Result<(), StorageError> {
        (**self).record_generation(population, classifier)
    }

    fn record_final(
        &mut self,
        population: &Population,
        classifier: &Classifier,
    ) -> Result<(), StorageError> {
        (**self).record_final(population, classifier)
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        (**self).finish()
    }
}

impl<R: Recorder + ?Sized> Recorder for Box<R> {
    fn record_birth(&mut self, individual: &Individual) -> Result<(), StorageError> {
        (**self).record_birth(individual)
    }

    fn record_generation(
        &mut self,
        population: &Population,
        classifier: &Classifier,
    ) -> Result<(), StorageError> {
        (**self).record_generation(population, classifier)
    }

    fn record_final(
        &mut self,
        population: &Population,
        classifier: &Classifier,
    ) -> Result<(), StorageError> {
        (**self).record_final(population, classifier)
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        (**self).finish()
    }
}

/// Fan out to two recorders, first then second.
impl<A: Recorder, B: Recorder> Recorder for (A, B) {
    fn record_birth(&mut self, individual: &Individual) -> Result<(), StorageError> {
        self.0.record_birth(individual)?;
        self.1.record_birth(individual)
    }

    fn record_generation(
        &mut self,
        population: &Population,
        classifier: &Classifier,
    ) -> Result<(), StorageError> {
        self.0.record_generation(population, classifier)?;
        self.1.record_generation(population, classifier)
    }

    fn record_final(
        &mut self,
        population: &Population,
        classifier: &Classifier,
    ) -> Result<(), StorageError> {
        self.0.record_final(population, classifier)?;
        self.1.record_final(population, classifier)
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        self.0.finish()?;
        self.1.finish()
    }
}

impl<R: Recorder> Recorder for Option<R> {
    fn record_birth(&mut self, individual: &Individual) -> Result<(), StorageError> {
        match self {
            Some(r) => r.record_birth(individual),
            None => Ok(()),
        }
    }

    fn record_generation(
        &mut self,
        population: &Population,
        classifier: &Classifier,
    ) -> Result<(), StorageError> {
        match self {
            Some(r) => r.record_generation(population, classifier),
            None => Ok(()),
        }
    }

    fn record_final(
        &mut self,
        population: &Population,
        classifier: &Classifier,
    ) -> Result<(), StorageError> {
        match self {
            Some(r) => r.record_final(population, classifier),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        match self {
            Some(r) => r.finish(),
            None => Ok(()),
        }
    }
}

/// Keeps births and per-tick sizes in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    /// `(id, father, mother, birthday)` per recorded birth.
    pub births: Vec<(u64, u64, u64, usize)>,
    /// `(generation, size)` per recorded tick.
    pub sizes: Vec<(usize, usize)>,
    pub finished: bool,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Recorder for MemoryRecorder {
    fn record_birth(&mut self, individual: &Individual) -> Result<(), StorageError> {
        self.births.push((
            individual.id(),
            individual.father_id(),
            individual.mother_id(),
            individual.birthday(),
        ));
        Ok(())
    }

    fn record_generation(
        &mut self,
        population: &Population,
        _classifier: &Classifier,
    ) -> Result<(), StorageError> {
        self.sizes.push((population.generation(), population.size()));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        self.finished = true;
        Ok(())
    }
}
