//! Pedigree log writer and replay.
//!
//! Each birth becomes one space-separated line:
//!
//! ```text
//! id father mother sex birthday [trait ...] [alleles ...]
//! ```
//!
//! Founders carry parent ids `0`. Tracked loci are written as the two allele
//! slots concatenated (`01`, `1-`). Lines starting with `#` are comments.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use super::recorder::Recorder;
use super::types::PedigreeConfig;
use crate::errors::{ConfigError, PedigreeError, StorageError};
use crate::genome::{GenomeLayout, Individual, IndividualId, Sex, FOUNDER_PARENT};
use crate::simulation::{Classifier, Population};

/// Streams birth records as they happen.
///
/// Lines are flushed at the end of every tick, so a crashed run leaves a
/// complete prefix of the log behind.
pub struct PedigreeRecorder<W: Write> {
    writer: W,
    config: PedigreeConfig,
    header_written: bool,
    births: usize,
}

impl<W: Write> PedigreeRecorder<W> {
    pub fn new(writer: W, config: &PedigreeConfig, layout: &GenomeLayout) -> Result<Self, ConfigError> {
        for &locus in &config.loci {
            layout.check_locus(locus)?;
        }
        Ok(Self {
            writer,
            config: config.clone(),
            header_written: false,
            births: 0,
        })
    }

    /// Birth records written so far.
    pub fn births(&self) -> usize {
        self.births
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self) -> Result<(), StorageError> {
        write!(self.writer, "#id father mother sex birthday")?;
        for field in &self.config.traits {
            write!(self.writer, " {}", field.name())?;
        }
        for locus in &self.config.loci {
            write!(self.writer, " locus_{locus}")?;
        }
        writeln!(self.writer)?;
        self.header_written = true;
        Ok(())
    }
}

impl<W: Write> Recorder for PedigreeRecorder<W> {
    fn record_birth(&mut self, individual: &Individual) -> Result<(), StorageError> {
        if !self.header_written {
            self.write_header()?;
        }
        write!(
            self.writer,
            "{} {} {} {} {}",
            individual.id(),
            individual.father_id(),
            individual.mother_id(),
            individual.sex(),
            individual.birthday()
        )?;
        for field in &self.config.traits {
            match field.value(individual.traits()) {
                Some(v) => write!(self.writer, " {v}")?,
                None => write!(self.writer, " NA")?,
            }
        }
        for &locus in &self.config.loci {
            let [m, p] = individual.genotype().locus(locus);
            write!(self.writer, " {m}{p}")?;
        }
        writeln!(self.writer)?;
        self.births += 1;
        Ok(())
    }

    fn record_generation(&mut self, _: &Population, _: &Classifier) -> Result<(), StorageError> {
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        if !self.header_written {
            self.write_header()?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// One parsed birth record.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthRecord {
    pub id: IndividualId,
    pub father: IndividualId,
    pub mother: IndividualId,
    pub sex: Sex,
    pub birthday: usize,
    /// Remaining columns, unparsed.
    pub extra: Vec<String>,
}

impl BirthRecord {
    pub fn is_founder(&self) -> bool {
        self.father == FOUNDER_PARENT && self.mother == FOUNDER_PARENT
    }
}

fn parse_field<T: std::str::FromStr>(
    field: Option<&str>,
    name: &str,
    line: usize,
) -> Result<T, PedigreeError> {
    let raw = field.ok_or_else(|| PedigreeError::Parse {
        line,
        message: format!("missing {name}"),
    })?;
    raw.parse().map_err(|_| PedigreeError::Parse {
        line,
        message: format!("invalid {name} '{raw}'"),
    })
}

/// A validated pedigree, replayed in log order.
#[derive(Debug, Clone, Default)]
pub struct PedigreeReplay {
    records: Vec<BirthRecord>,
    index: HashMap<IndividualId, usize>,
    offspring: HashMap<IndividualId, usize>,
}

impl PedigreeReplay {
    /// Read and check a log.
    ///
    /// Fails on the first parent id that was not born on an earlier line and
    /// on any id born twice.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, PedigreeError> {
        let mut replay = Self::default();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            let number = n + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let mut fields = trimmed.split_whitespace();
            let id: IndividualId = parse_field(fields.next(), "id", number)?;
            let father: IndividualId = parse_field(fields.next(), "father id", number)?;
            let mother: IndividualId = parse_field(fields.next(), "mother id", number)?;
            let sex: Sex = parse_field(fields.next(), "sex", number)?;
            let birthday: usize = parse_field(fields.next(), "birthday", number)?;
            let extra = fields.map(str::to_string).collect();

            replay.push(
                BirthRecord {
                    id,
                    father,
                    mother,
                    sex,
                    birthday,
                    extra,
                },
                number,
            )?;
        }
        Ok(replay)
    }

    fn push(&mut self, record: BirthRecord, line: usize) -> Result<(), PedigreeError> {
        if self.index.contains_key(&record.id) {
            return Err(PedigreeError::DuplicateId { line, id: record.id });
        }
        for parent in [record.father, record.mother] {
            if parent != FOUNDER_PARENT && !self.index.contains_key(&parent) {
                return Err(PedigreeError::UnknownParent {
                    line,
                    offspring: record.id,
                    parent,
                });
            }
        }
        if !record.is_founder() {
            *self.offspring.entry(record.father).or_default() += 1;
            if record.mother != record.father {
                *self.offspring.entry(record.mother).or_default() += 1;
            }
        }
        self.index.insert(record.id, self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[BirthRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: IndividualId) -> Option<&BirthRecord> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    /// Number of recorded offspring of `id`, as father or mother.
    pub fn offspring_count(&self, id: IndividualId) -> usize {
        self.offspring.get(&id).copied().unwrap_or(0)
    }

    /// Births per tick, keyed by birthday, founders excluded.
    pub fn births_per_generation(&self) -> Vec<(usize, usize)> {
        let mut counts: Vec<(usize, usize)> = Vec::new();
        for record in self.records.iter().filter(|r| !r.is_founder()) {
            match counts.last_mut() {
                Some((day, n)) if *day == record.birthday => *n += 1,
                _ => counts.push((record.birthday, 1)),
            }
        }
        counts
    }

    /// Every recorded ancestor of `id`, nearest first, each listed once.
    pub fn ancestors(&self, id: IndividualId) -> Vec<IndividualId> {
        let mut seen = Vec::new();
        let mut queue = std::collections::VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            let Some(record) = self.get(current) else {
                continue;
            };
            for parent in [record.father, record.mother] {
                if parent != FOUNDER_PARENT && !seen.contains(&parent) {
                    seen.push(parent);
                    queue.push_back(parent);
                }
            }
        }
        seen
    }
}
