//! Tab-separated statistics stream.
//!
//! One header line starting with `#gen`, then one line per reporting tick.
//! Column order follows the configured statistics. Undefined values such as
//! the mean age of an empty category are written as `NA`.

use std::fmt;
use std::io::Write;
use std::ops::Range;

use super::recorder::Recorder;
use super::types::{RecordingConfig, RecordingStrategy, Statistic};
use crate::errors::{ConfigError, StorageError};
use crate::genome::{GenomeLayout, Individual};
use crate::simulation::{CategoryId, Classifier, Population};

/// Marker for undefined values.
pub const UNDEFINED: &str = "NA";

#[derive(Debug, Clone)]
enum Column {
    PopulationSize,
    Size(CategoryId),
    MeanAge(CategoryId),
    MaxAge(CategoryId),
    MeanA(CategoryId),
    Frequency(usize),
    MeanFrequency(Range<usize>),
}

/// One computed statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Count(usize),
    Age(Option<u32>),
    Real(Option<f64>),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Age(Some(age)) => write!(f, "{age}"),
            Self::Real(Some(x)) => write!(f, "{x:.6}"),
            Self::Age(None) | Self::Real(None) => f.write_str(UNDEFINED),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn in_category<'a>(
    individuals: &'a [Individual],
    classifier: &'a Classifier,
    id: CategoryId,
) -> impl Iterator<Item = &'a Individual> + 'a {
    individuals.iter().filter(move |ind| classifier.contains(ind, id))
}

/// Writes the statistics stream to any [`Write`] sink.
pub struct StatisticsRecorder<W: Write> {
    writer: W,
    columns: Vec<Column>,
    headers: Vec<String>,
    strategy: RecordingStrategy,
    header_written: bool,
    last_written: Option<usize>,
}

impl<W: Write> StatisticsRecorder<W> {
    /// Resolve the configured statistics against the classifier and genome.
    pub fn new(
        writer: W,
        config: &RecordingConfig,
        classifier: &Classifier,
        layout: &GenomeLayout,
    ) -> Result<Self, ConfigError> {
        let mut columns = Vec::new();
        let mut headers = Vec::new();
        for stat in &config.statistics {
            match stat {
                Statistic::PopulationSize => {
                    columns.push(Column::PopulationSize);
                    headers.push("N".to_string());
                }
                Statistic::Size { category } => {
                    columns.push(Column::Size(classifier.id(category)?));
                    headers.push(format!("n_{category}"));
                }
                Statistic::MeanAge { category } => {
                    columns.push(Column::MeanAge(classifier.id(category)?));
                    headers.push(format!("mean_age_{category}"));
                }
                Statistic::MaxAge { category } => {
                    columns.push(Column::MaxAge(classifier.id(category)?));
                    headers.push(format!("max_age_{category}"));
                }
                Statistic::MeanA { category } => {
                    columns.push(Column::MeanA(classifier.id(category)?));
                    headers.push(format!("mean_a_{category}"));
                }
                Statistic::AlleleFrequency { locus } => {
                    layout.check_locus(*locus)?;
                    columns.push(Column::Frequency(*locus));
                    headers.push(format!("p_{locus}"));
                }
                Statistic::AlleleFrequencies => {
                    for locus in 0..layout.total_loci() {
                        columns.push(Column::Frequency(locus));
                        headers.push(format!("p_{locus}"));
                    }
                }
                Statistic::MeanAlleleFrequency { chromosome } => {
                    let chr = layout.find(chromosome).ok_or_else(|| {
                        ConfigError::InvalidParameter(format!("unknown chromosome '{chromosome}'"))
                    })?;
                    columns.push(Column::MeanFrequency(layout.range(chr)));
                    headers.push(format!("mean_p_{chromosome}"));
                }
            }
        }
        Ok(Self {
            writer,
            columns,
            headers,
            strategy: config.every.clone(),
            header_written: false,
            last_written: None,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Compute the configured statistics for `population`.
    pub fn row(&self, population: &Population, classifier: &Classifier) -> Vec<Cell> {
        let individuals = population.individuals();
        self.columns
            .iter()
            .map(|column| match column {
                Column::PopulationSize => Cell::Count(population.size()),
                Column::Size(id) => Cell::Count(classifier.count(individuals, *id)),
                Column::MeanAge(id) => Cell::Real(mean(
                    in_category(individuals, classifier, *id).map(|i| f64::from(i.age())),
                )),
                Column::MaxAge(id) => {
                    Cell::Age(in_category(individuals, classifier, *id).map(Individual::age).max())
                }
                Column::MeanA(id) => Cell::Real(mean(
                    in_category(individuals, classifier, *id).map(|i| i.traits().a),
                )),
                Column::Frequency(locus) => Cell::Real(population.allele_frequency(*locus)),
                Column::MeanFrequency(range) => Cell::Real(mean(
                    range.clone().filter_map(|l| population.allele_frequency(l)),
                )),
            })
            .collect()
    }

    fn write_header(&mut self) -> Result<(), StorageError> {
        write!(self.writer, "#gen")?;
        for header in &self.headers {
            write!(self.writer, "\t{header}")?;
        }
        writeln!(self.writer)?;
        self.header_written = true;
        Ok(())
    }

    fn write_row(&mut self, population: &Population, classifier: &Classifier) -> Result<(), StorageError> {
        if !self.header_written {
            self.write_header()?;
        }
        let generation = population.generation();
        let row = self.row(population, classifier);
        write!(self.writer, "{generation}")?;
        for cell in row {
            write!(self.writer, "\t{cell}")?;
        }
        writeln!(self.writer)?;
        self.last_written = Some(generation);
        Ok(())
    }

    /// Give back the sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Recorder for StatisticsRecorder<W> {
    fn record_generation(
        &mut self,
        population: &Population,
        classifier: &Classifier,
    ) -> Result<(), StorageError> {
        if !self.strategy.should_record(population.generation()) {
            return Ok(());
        }
        self.write_row(population, classifier)
    }

    /// Off-period last generations (extinction, fixation, odd tick counts)
    /// still get a row.
    fn record_final(
        &mut self,
        population: &Population,
        classifier: &Classifier,
    ) -> Result<(), StorageError> {
        if self.strategy == RecordingStrategy::None
            || self.last_written == Some(population.generation())
        {
            return Ok(());
        }
        self.write_row(population, classifier)
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        if !self.header_written {
            self.write_header()?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Allele;
    use crate::genome::{AgingTraits, ChromosomeSpec, Genotype, Sex};
    use crate::simulation::ClassificationConfig;

    fn ind(id: u64, sex: Sex, age: u32, alleles: [Allele; 2], a: f64) -> Individual {
        Individual::founder(id, sex, Genotype::new(vec![alleles]), AgingTraits::new(a, -0.02))
            .with_age(age)
    }

    fn setup() -> (Classifier, GenomeLayout, Population) {
        let classifier = Classifier::new(&ClassificationConfig::default()).unwrap();
        let layout = GenomeLayout::new(vec![ChromosomeSpec::x(1)]).unwrap();
        let population = Population::new(vec![
            ind(1, Sex::Male, 12, [Allele::Mutant, Allele::Unexpressed], 0.004),
            ind(2, Sex::Female, 3, [Allele::Wild, Allele::Wild], 0.002),
            ind(3, Sex::Female, 20, [Allele::Mutant, Allele::Wild], 0.006),
        ])
        .unwrap();
        (classifier, layout, population)
    }

    fn config(statistics: Vec<Statistic>) -> RecordingConfig {
        RecordingConfig {
            statistics,
            every: RecordingStrategy::All,
            ..Default::default()
        }
    }

    #[test]
    fn test_row_values() {
        let (classifier, layout, population) = setup();
        let stats = StatisticsRecorder::new(
            Vec::new(),
            &config(vec![
                Statistic::PopulationSize,
                Statistic::Size {
                    category: "adults".into(),
                },
                Statistic::MeanAge {
                    category: "females".into(),
                },
                Statistic::MaxAge {
                    category: "smurfs".into(),
                },
                Statistic::MeanA {
                    category: "females".into(),
                },
                Statistic::AlleleFrequencies,
            ]),
            &classifier,
            &layout,
        )
        .unwrap();

        let row = stats.row(&population, &classifier);
        assert_eq!(row[0], Cell::Count(3));
        assert_eq!(row[1], Cell::Count(2));
        assert_eq!(row[2], Cell::Real(Some(11.5)));
        assert_eq!(row[3], Cell::Age(None));
        let Cell::Real(Some(mean_a)) = row[4] else {
            panic!("expected a mean");
        };
        assert!((mean_a - 0.004).abs() < 1e-12);
        // 2 mutant copies out of 5 expressed slots
        let Cell::Real(Some(p)) = row[5] else {
            panic!("expected a frequency");
        };
        assert!((p - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_stream_format_and_undefined() {
        let (classifier, layout, _) = setup();
        let empty = Population::new(Vec::new()).unwrap();
        let mut stats = StatisticsRecorder::new(
            Vec::new(),
            &config(vec![
                Statistic::PopulationSize,
                Statistic::MeanAge {
                    category: "males".into(),
                },
                Statistic::MeanAlleleFrequency {
                    chromosome: "X".into(),
                },
            ]),
            &classifier,
            &layout,
        )
        .unwrap();
        stats.record_generation(&empty, &classifier).unwrap();
        stats.finish().unwrap();

        let text = String::from_utf8(stats.into_inner()).unwrap();
        assert_eq!(text, "#gen\tN\tmean_age_males\tmean_p_X\n0\t0\tNA\tNA\n");
    }

    #[test]
    fn test_reporting_period() {
        let (classifier, layout, mut population) = setup();
        let mut cfg = config(vec![Statistic::PopulationSize]);
        cfg.every = RecordingStrategy::EveryN(2);
        let mut stats = StatisticsRecorder::new(Vec::new(), &cfg, &classifier, &layout).unwrap();
        for _ in 0..4 {
            stats.record_generation(&population, &classifier).unwrap();
            let next = population.individuals().to_vec();
            population.replace(next);
        }
        let text = String::from_utf8(stats.into_inner()).unwrap();
        let gens: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|l| l.split('\t').next().unwrap())
            .collect();
        assert_eq!(gens, vec!["0", "2"]);
    }

    #[test]
    fn test_final_row_written_once() {
        let (classifier, layout, mut population) = setup();
        let mut cfg = config(vec![Statistic::PopulationSize]);
        cfg.every = RecordingStrategy::EveryN(5);
        let mut stats = StatisticsRecorder::new(Vec::new(), &cfg, &classifier, &layout).unwrap();

        stats.record_generation(&population, &classifier).unwrap();
        stats.record_final(&population, &classifier).unwrap();
        population.replace(Vec::new());
        stats.record_generation(&population, &classifier).unwrap();
        stats.record_final(&population, &classifier).unwrap();
        stats.finish().unwrap();

        let text = String::from_utf8(stats.into_inner()).unwrap();
        assert_eq!(text, "#gen\tN\n0\t3\n1\t0\n");
    }

    #[test]
    fn test_no_final_row_without_recording() {
        let (classifier, layout, population) = setup();
        let mut cfg = config(vec![Statistic::PopulationSize]);
        cfg.every = RecordingStrategy::None;
        let mut stats = StatisticsRecorder::new(Vec::new(), &cfg, &classifier, &layout).unwrap();
        stats.record_final(&population, &classifier).unwrap();
        stats.finish().unwrap();
        assert_eq!(String::from_utf8(stats.into_inner()).unwrap(), "#gen\tN\n");
    }

    #[test]
    fn test_unknown_names_rejected() {
        let (classifier, layout, _) = setup();
        let result = StatisticsRecorder::new(
            Vec::new(),
            &config(vec![Statistic::Size {
                category: "pupae".into(),
            }]),
            &classifier,
            &layout,
        );
        assert!(matches!(result, Err(ConfigError::UnknownCategory(_))));

        let result = StatisticsRecorder::new(
            Vec::new(),
            &config(vec![Statistic::AlleleFrequency { locus: 4 }]),
            &classifier,
            &layout,
        );
        assert!(matches!(result, Err(ConfigError::LocusOutOfRange { .. })));
    }
}
