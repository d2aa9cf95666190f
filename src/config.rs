use std::borrow::Cow;

use crate::constants::sampling::{DEFAULT_SEED, DEFAULT_SHUFFLE_SEED, SAMPLE_SIZE};
use crate::constants::text::{
    LIST_SEPARATOR, NARRATIVE_SEPARATOR, SUMMARY_MEDIUM_BELOW, SUMMARY_SHORT_BELOW,
};
use crate::errors::PrepareError;
use crate::seniority::SeniorityMap;
use crate::validity::ValidityRules;

/// Word-count thresholds for the summary length category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryThresholds {
    /// Counts strictly below this are `short`.
    pub short_below: usize,
    /// Counts strictly below this (and not short) are `medium`; the rest `large`.
    pub medium_below: usize,
}

impl Default for SummaryThresholds {
    fn default() -> Self {
        Self {
            short_below: SUMMARY_SHORT_BELOW,
            medium_below: SUMMARY_MEDIUM_BELOW,
        }
    }
}

impl SummaryThresholds {
    /// Category label for a summary word count.
    pub fn categorize(&self, word_count: usize) -> &'static str {
        if word_count < self.short_below {
            "short"
        } else if word_count < self.medium_below {
            "medium"
        } else {
            "large"
        }
    }
}

/// Separators used when merging multi-valued fields into one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Separators {
    /// Used for names, titles, skills and other short list items.
    pub list: Cow<'static, str>,
    /// Used for responsibilities, project descriptions and impacts.
    pub narrative: Cow<'static, str>,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            list: Cow::Borrowed(LIST_SEPARATOR),
            narrative: Cow::Borrowed(NARRATIVE_SEPARATOR),
        }
    }
}

/// Top-level pipeline configuration.
///
/// Every constant the pipeline depends on is a field here so callers and
/// tests can override it; `Default` reproduces the canonical behavior.
#[derive(Clone, Debug)]
pub struct PrepareConfig {
    /// Ignore set used by every validity check.
    pub validity: ValidityRules,
    /// Level label vocabulary used to classify records.
    pub levels: SeniorityMap,
    /// Maximum rows kept per seniority class.
    pub sample_size: usize,
    /// RNG seed for per-class sampling.
    pub seed: u64,
    /// RNG seed for the final whole-dataset shuffle.
    pub shuffle_seed: u64,
    /// Summary length category thresholds.
    pub summary: SummaryThresholds,
    /// Join separators for multi-valued fields.
    pub separators: Separators,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            validity: ValidityRules::default(),
            levels: SeniorityMap::default(),
            sample_size: SAMPLE_SIZE,
            seed: DEFAULT_SEED,
            shuffle_seed: DEFAULT_SHUFFLE_SEED,
            summary: SummaryThresholds::default(),
            separators: Separators::default(),
        }
    }
}

impl PrepareConfig {
    /// Override the per-class sample cap.
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Override the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the final shuffle seed.
    pub fn with_shuffle_seed(mut self, shuffle_seed: u64) -> Self {
        self.shuffle_seed = shuffle_seed;
        self
    }

    /// Override the validity rules.
    pub fn with_validity(mut self, validity: ValidityRules) -> Self {
        self.validity = validity;
        self
    }

    /// Override the level vocabulary.
    pub fn with_levels(mut self, levels: SeniorityMap) -> Self {
        self.levels = levels;
        self
    }

    /// Override the summary thresholds.
    pub fn with_summary_thresholds(mut self, summary: SummaryThresholds) -> Self {
        self.summary = summary;
        self
    }

    /// Override the join separators.
    pub fn with_separators(mut self, separators: Separators) -> Self {
        self.separators = separators;
        self
    }

    /// Reject configurations the pipeline cannot honor.
    pub fn validate(&self) -> Result<(), PrepareError> {
        if self.sample_size == 0 {
            return Err(PrepareError::Configuration(
                "sample_size must be greater than zero".to_string(),
            ));
        }
        if self.summary.short_below > self.summary.medium_below {
            return Err(PrepareError::Configuration(format!(
                "summary thresholds out of order: short_below={} > medium_below={}",
                self.summary.short_below, self.summary.medium_below
            )));
        }
        if self.separators.list.is_empty() || self.separators.narrative.is_empty() {
            return Err(PrepareError::Configuration(
                "join separators must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
