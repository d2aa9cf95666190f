use std::io::BufRead;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::PrepareConfig;
use crate::constants::columns::SENIORITY_COLUMN;
use crate::constants::ingest::SKIP_MALFORMED_MSG;
use crate::constants::seniority::ALL_SENIORITIES;
use crate::errors::PrepareError;
use crate::flatten::{FlatRecord, Flattener};
use crate::record::RecordView;
use crate::sampler::{ClassGroups, DeterministicRng, StratifiedSampler, empty_groups};
use crate::seniority::SeniorityLabel;
use crate::types::{CellText, ColumnName, LineNumber, RawLine};

/// One output row: a flat record plus its seniority class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRow {
    /// Flattened profile.
    #[serde(flatten)]
    pub record: FlatRecord,
    /// Class written to the trailing `Seniority` column.
    #[serde(rename = "Seniority")]
    pub seniority: SeniorityLabel,
}

impl DatasetRow {
    /// Output headers: every flat-record column followed by `Seniority`.
    pub fn columns() -> Vec<ColumnName> {
        let mut columns = FlatRecord::columns().to_vec();
        columns.push(SENIORITY_COLUMN);
        columns
    }

    /// Output cells in header order.
    pub fn to_row(&self) -> Vec<CellText> {
        let mut row = self.record.to_row();
        row.push(self.seniority.as_str().to_string());
        row
    }
}

/// Counters collected while ingesting lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Lines seen, including malformed ones.
    pub lines: usize,
    /// Lines that did not parse as a JSON object.
    pub malformed: usize,
    /// Lines that parsed as a record.
    pub processed: usize,
    /// Records without a usable seniority label.
    pub unclassified: usize,
    /// Classified records missing a job title or summary.
    pub incomplete: usize,
    /// Records buffered for sampling.
    pub accepted: usize,
}

/// Result of evaluating one input line.
#[derive(Clone, Debug, PartialEq)]
pub enum LineOutcome {
    /// Not a JSON object; carries the parse error text.
    Malformed(String),
    /// Parsed, but the seniority label is missing or unmapped.
    Unclassified,
    /// Classified, but job title or summary is unusable.
    Incomplete(SeniorityLabel),
    /// Kept for sampling.
    Accepted(SeniorityLabel, FlatRecord),
}

/// Decode a raw line and evaluate it. Bytes that are not UTF-8 make the
/// line malformed, the same as a JSON syntax error.
pub fn evaluate_raw_line(config: &PrepareConfig, line: &[u8]) -> LineOutcome {
    match std::str::from_utf8(line) {
        Ok(text) => evaluate_line(config, text),
        Err(err) => LineOutcome::Malformed(err.to_string()),
    }
}

/// Drop the `\r` left by `\r\n` line endings after splitting on `\n`.
pub(crate) fn strip_line_ending(mut line: RawLine) -> RawLine {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    line
}

/// Classify, flatten and filter one line. Pure, so it can run on any thread.
pub fn evaluate_line(config: &PrepareConfig, line: &str) -> LineOutcome {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(err) => return LineOutcome::Malformed(err.to_string()),
    };
    if !value.is_object() {
        return LineOutcome::Malformed("record is not a JSON object".to_string());
    }
    let record = RecordView::new(&value);
    let Some(seniority) = config.levels.classify_record(record) else {
        return LineOutcome::Unclassified;
    };
    let flat = Flattener::new(config).flatten(record);
    let rules = &config.validity;
    if !rules.is_valid_str(&flat.job_title) || !rules.is_valid_str(&flat.summary) {
        return LineOutcome::Incomplete(seniority);
    }
    LineOutcome::Accepted(seniority, flat)
}

/// Accumulates classified rows per seniority class and produces the final
/// sampled dataset.
///
/// Bad lines never stop ingestion; they only move counters in
/// [`IngestStats`].
pub struct DatasetBuilder {
    config: PrepareConfig,
    groups: ClassGroups,
    stats: IngestStats,
}

impl DatasetBuilder {
    /// Create a builder after validating `config`.
    pub fn new(config: PrepareConfig) -> Result<Self, PrepareError> {
        config.validate()?;
        Ok(Self {
            config,
            groups: empty_groups(),
            stats: IngestStats::default(),
        })
    }

    /// Counters so far.
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Rows currently buffered for `seniority`.
    pub fn buffered(&self, seniority: SeniorityLabel) -> usize {
        self.groups.get(&seniority).map_or(0, Vec::len)
    }

    /// Ingest a single line.
    pub fn ingest_line(&mut self, line: &str) {
        let outcome = evaluate_line(&self.config, line);
        self.apply(outcome);
    }

    /// Ingest lines in order.
    pub fn ingest_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.ingest_line(line.as_ref());
        }
    }

    /// Ingest one undecoded line.
    pub fn ingest_raw_line(&mut self, line: &[u8]) {
        let outcome = evaluate_raw_line(&self.config, line);
        self.apply(outcome);
    }

    /// Stream lines from a reader. Only read failures are errors; lines that
    /// are not UTF-8 are counted as malformed.
    pub fn ingest_reader<R: BufRead>(&mut self, reader: R) -> Result<(), PrepareError> {
        for line in reader.split(b'\n') {
            let line = strip_line_ending(line?);
            self.ingest_raw_line(&line);
        }
        Ok(())
    }

    /// Evaluate lines on the rayon pool, then fold outcomes in input order.
    ///
    /// Produces the same groups and counters as [`DatasetBuilder::ingest_lines`].
    pub fn ingest_parallel<L>(&mut self, lines: &[L])
    where
        L: AsRef<[u8]> + Sync,
    {
        let config = &self.config;
        let outcomes: Vec<LineOutcome> = lines
            .par_iter()
            .map(|line| evaluate_raw_line(config, line.as_ref()))
            .collect();
        for outcome in outcomes {
            self.apply(outcome);
        }
    }

    fn apply(&mut self, outcome: LineOutcome) {
        self.stats.lines += 1;
        let line: LineNumber = self.stats.lines;
        match outcome {
            LineOutcome::Malformed(error) => {
                self.stats.malformed += 1;
                debug!(line, error = %error, "{}", SKIP_MALFORMED_MSG);
            }
            LineOutcome::Unclassified => {
                self.stats.processed += 1;
                self.stats.unclassified += 1;
            }
            LineOutcome::Incomplete(_) => {
                self.stats.processed += 1;
                self.stats.incomplete += 1;
            }
            LineOutcome::Accepted(seniority, record) => {
                self.stats.processed += 1;
                self.stats.accepted += 1;
                self.groups.entry(seniority).or_default().push(record);
            }
        }
    }

    /// Sample with generators seeded from the configured seeds.
    pub fn build(self) -> Dataset {
        let mut sample_rng = DeterministicRng::new(self.config.seed);
        let mut shuffle_rng = DeterministicRng::new(self.config.shuffle_seed);
        self.build_with(&mut sample_rng, &mut shuffle_rng)
    }

    /// Sample with caller-supplied random sources.
    pub fn build_with<S, T>(self, sample_rng: &mut S, shuffle_rng: &mut T) -> Dataset
    where
        S: Rng + ?Sized,
        T: Rng + ?Sized,
    {
        let stats = self.stats;
        info!(
            lines = stats.lines,
            processed = stats.processed,
            malformed = stats.malformed,
            unclassified = stats.unclassified,
            incomplete = stats.incomplete,
            accepted = stats.accepted,
            "profile ingestion finished"
        );
        for (seniority, rows) in &self.groups {
            debug!(seniority = %seniority, rows = rows.len(), "class buffered");
        }

        let sampler = StratifiedSampler::new(self.config.sample_size);
        let rows = sampler.sample_groups(self.groups, sample_rng, shuffle_rng);
        let dataset = Dataset { rows, stats };
        for seniority in ALL_SENIORITIES {
            info!(
                seniority = %seniority,
                rows = dataset.count_for(seniority),
                "class sampled"
            );
        }
        dataset
    }
}

/// Final sampled and shuffled table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    rows: Vec<DatasetRow>,
    stats: IngestStats,
}

impl Dataset {
    /// Rows in output order.
    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    /// Ingestion counters that produced this dataset.
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no rows survived.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows belonging to `seniority`.
    pub fn count_for(&self, seniority: SeniorityLabel) -> usize {
        self.rows
            .iter()
            .filter(|row| row.seniority == seniority)
            .count()
    }

    /// Output headers.
    pub fn columns(&self) -> Vec<ColumnName> {
        DatasetRow::columns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line(title: &str, level: &str, summary: &str) -> String {
        json!({
            "personal_info": {"name": format!("{title} person"), "summary": summary},
            "experience": [{"title": title, "level": level}]
        })
        .to_string()
    }

    #[test]
    fn evaluate_line_reports_each_outcome() {
        let config = PrepareConfig::default();
        assert!(matches!(
            evaluate_line(&config, "{not json"),
            LineOutcome::Malformed(_)
        ));
        assert!(matches!(
            evaluate_line(&config, "[1, 2, 3]"),
            LineOutcome::Malformed(_)
        ));
        assert_eq!(
            evaluate_line(&config, &line("Dev", "Director", "Builds things")),
            LineOutcome::Unclassified
        );
        assert_eq!(
            evaluate_line(&config, &line("Dev", "mid", "N/A")),
            LineOutcome::Incomplete(SeniorityLabel::Mid)
        );
        assert_eq!(
            evaluate_line(&config, &line("Unknown", "mid", "Builds things")),
            LineOutcome::Incomplete(SeniorityLabel::Mid)
        );
        assert!(matches!(
            evaluate_line(&config, &line("Dev", "Mid-Level", "Builds things")),
            LineOutcome::Accepted(SeniorityLabel::Mid, _)
        ));
    }

    #[test]
    fn counters_track_every_line() {
        let mut builder = DatasetBuilder::new(PrepareConfig::default()).unwrap();
        builder.ingest_lines([
            line("Dev", "junior", "Writes code"),
            "".to_string(),
            "garbage".to_string(),
            line("Dev", "VP", "Writes code"),
            line("", "senior", "Writes code"),
            line("Lead", "senior", "Leads people"),
        ]);
        let stats = builder.stats();
        assert_eq!(
            stats,
            IngestStats {
                lines: 6,
                malformed: 2,
                processed: 4,
                unclassified: 1,
                incomplete: 1,
                accepted: 2,
            }
        );
        assert_eq!(builder.buffered(SeniorityLabel::Junior), 1);
        assert_eq!(builder.buffered(SeniorityLabel::Mid), 0);
        assert_eq!(builder.buffered(SeniorityLabel::Senior), 1);
    }

    #[test]
    fn ingest_reader_streams_lines() {
        let input = format!(
            "{}\n{}\n",
            line("Dev", "entry", "Writes code"),
            line("Lead", "manager", "Leads people")
        );
        let mut builder = DatasetBuilder::new(PrepareConfig::default()).unwrap();
        builder.ingest_reader(input.as_bytes()).unwrap();
        assert_eq!(builder.stats().accepted, 2);
    }

    #[test]
    fn non_utf8_line_is_counted_and_ingestion_continues() {
        let mut input = Vec::new();
        input.extend_from_slice(line("Dev", "entry", "Writes code").as_bytes());
        input.extend_from_slice(b"\n{\"name\": \"\xff\xfe\"}\r\n");
        input.extend_from_slice(line("Lead", "manager", "Leads people").as_bytes());
        input.push(b'\n');

        let mut builder = DatasetBuilder::new(PrepareConfig::default()).unwrap();
        builder.ingest_reader(input.as_slice()).unwrap();
        let stats = builder.stats();
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.accepted, 2);
    }

    #[test]
    fn parallel_ingestion_treats_non_utf8_as_malformed() {
        let lines: Vec<RawLine> = vec![
            line("Dev", "entry", "Writes code").into_bytes(),
            b"\xc3\x28".to_vec(),
            line("Lead", "manager", "Leads people").into_bytes(),
        ];
        let mut sequential = DatasetBuilder::new(PrepareConfig::default()).unwrap();
        for raw in &lines {
            sequential.ingest_raw_line(raw);
        }
        let mut parallel = DatasetBuilder::new(PrepareConfig::default()).unwrap();
        parallel.ingest_parallel(&lines);

        assert_eq!(parallel.stats(), sequential.stats());
        assert_eq!(parallel.stats().malformed, 1);
        assert_eq!(parallel.stats().accepted, 2);
        assert!(matches!(
            evaluate_raw_line(&PrepareConfig::default(), b"\xff"),
            LineOutcome::Malformed(_)
        ));
    }

    #[test]
    fn strip_line_ending_removes_only_carriage_return() {
        assert_eq!(strip_line_ending(b"{}\r".to_vec()), b"{}".to_vec());
        assert_eq!(strip_line_ending(b"{}".to_vec()), b"{}".to_vec());
    }

    #[test]
    fn build_caps_each_class_and_labels_rows() {
        let config = PrepareConfig::default().with_sample_size(3);
        let mut builder = DatasetBuilder::new(config).unwrap();
        for idx in 0..8 {
            builder.ingest_line(&line(&format!("Senior Dev {idx}"), "senior", "Ships"));
        }
        builder.ingest_line(&line("Junior Dev", "intern", "Learns"));

        let dataset = builder.build();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.count_for(SeniorityLabel::Senior), 3);
        assert_eq!(dataset.count_for(SeniorityLabel::Junior), 1);
        assert_eq!(dataset.count_for(SeniorityLabel::Mid), 0);
        assert_eq!(dataset.stats().accepted, 9);
    }

    #[test]
    fn row_columns_end_with_seniority() {
        let columns = DatasetRow::columns();
        assert_eq!(columns.len(), 38);
        assert_eq!(columns.last(), Some(&"Seniority"));

        let row = DatasetRow {
            record: FlatRecord::default(),
            seniority: SeniorityLabel::Senior,
        };
        let cells = row.to_row();
        assert_eq!(cells.len(), 38);
        assert_eq!(cells.last().map(String::as_str), Some("senior"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PrepareConfig::default().with_sample_size(0);
        assert!(matches!(
            DatasetBuilder::new(config),
            Err(PrepareError::Configuration(_))
        ));
    }
}
