#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runner shared by the `prepare_dataset` binary.
pub mod apps;
/// Pipeline configuration types.
pub mod config;
/// Centralized constants: ignore set, level vocabulary, caps, seeds, columns.
pub mod constants;
/// Line ingestion, completeness filtering and dataset assembly.
pub mod dataset;
/// Nested-profile to flat-row conversion.
pub mod flatten;
/// Class balance metrics.
pub mod metrics;
/// Total accessor over raw JSON profiles.
pub mod record;
/// Deterministic per-class sampling.
pub mod sampler;
/// Seniority classes and level vocabulary.
pub mod seniority;
/// Input/output transports (filesystem).
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Text merging helpers for flat cells.
pub mod utils;
/// Validity oracle and safe extraction.
pub mod validity;

mod errors;

pub use config::{PrepareConfig, Separators, SummaryThresholds};
pub use dataset::{
    Dataset, DatasetBuilder, DatasetRow, IngestStats, LineOutcome, evaluate_line,
    evaluate_raw_line,
};
pub use errors::PrepareError;
pub use flatten::{FlatRecord, Flattener, flatten_record};
pub use metrics::{ClassBalance, ClassShare, class_balance};
pub use record::RecordView;
pub use sampler::{DeterministicRng, StratifiedSampler};
pub use seniority::{SeniorityLabel, SeniorityMap, get_seniority_level};
pub use utils::{calculate_job_period, extract_skills_with_levels, join_list};
pub use validity::ValidityRules;
