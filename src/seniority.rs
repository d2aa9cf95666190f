use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::seniority::LEVEL_MAPPING;
use crate::record::RecordView;
use crate::types::LevelLabel;

/// Canonical seniority classes used for stratification.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SeniorityLabel {
    /// Interns, entry-level and junior roles.
    Junior,
    /// Mid-level roles.
    Mid,
    /// Senior, mid-senior, managerial and professional roles.
    Senior,
}

impl SeniorityLabel {
    /// Lowercase name as written to the `Seniority` column.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SeniorityLabel::Junior => "junior",
            SeniorityLabel::Mid => "mid",
            SeniorityLabel::Senior => "senior",
        }
    }
}

impl fmt::Display for SeniorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Controlled vocabulary from free-text level labels to seniority classes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeniorityMap {
    levels: HashMap<LevelLabel, SeniorityLabel>,
}

impl Default for SeniorityMap {
    fn default() -> Self {
        Self::new(LEVEL_MAPPING)
    }
}

impl SeniorityMap {
    /// Build a mapping; labels are normalized (trimmed, lowercased) on insert.
    pub fn new<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = (S, SeniorityLabel)>,
        S: AsRef<str>,
    {
        Self {
            levels: levels
                .into_iter()
                .map(|(label, class)| (normalize_level(label.as_ref()), class))
                .collect(),
        }
    }

    /// Add or replace one label mapping.
    pub fn with_level(mut self, label: impl AsRef<str>, class: SeniorityLabel) -> Self {
        self.levels.insert(normalize_level(label.as_ref()), class);
        self
    }

    /// Case-insensitive lookup of a level label.
    pub fn classify(&self, level: &str) -> Option<SeniorityLabel> {
        self.levels.get(&normalize_level(level)).copied()
    }

    /// Classify a profile from the `level` of its first experience entry.
    ///
    /// Only `experience[0]` is consulted. Records with no experience, a
    /// non-string level, or an unmapped level are unclassified.
    pub fn classify_record(&self, record: RecordView<'_>) -> Option<SeniorityLabel> {
        let experience = record.field("experience");
        if experience.is_empty() {
            return None;
        }
        let level = experience.first().field("level").as_str()?;
        self.classify(level)
    }

    /// Number of mapped labels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True when no labels are mapped.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Classify a record with the default level vocabulary.
pub fn get_seniority_level(record: RecordView<'_>) -> Option<SeniorityLabel> {
    SeniorityMap::default().classify_record(record)
}

fn normalize_level(level: &str) -> LevelLabel {
    level.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with_level(level: serde_json::Value) -> serde_json::Value {
        json!({"experience": [{"title": "Engineer", "level": level}]})
    }

    #[test]
    fn mid_senior_maps_to_senior_in_any_case() {
        for label in ["Mid-Senior", "mid-senior", "MID-SENIOR", "  Mid-senior "] {
            let record = record_with_level(json!(label));
            assert_eq!(
                get_seniority_level(RecordView::new(&record)),
                Some(SeniorityLabel::Senior),
                "{label}"
            );
        }
    }

    #[test]
    fn default_vocabulary_covers_all_classes() {
        let map = SeniorityMap::default();
        assert_eq!(map.classify("Intern"), Some(SeniorityLabel::Junior));
        assert_eq!(map.classify("Entry-Level"), Some(SeniorityLabel::Junior));
        assert_eq!(map.classify("Mid-Level"), Some(SeniorityLabel::Mid));
        assert_eq!(map.classify("Manager"), Some(SeniorityLabel::Senior));
        assert_eq!(map.classify("Professional"), Some(SeniorityLabel::Senior));
        assert_eq!(map.classify("Director"), None);
        assert_eq!(map.len(), 10);
    }

    #[test]
    fn empty_or_missing_experience_is_unclassified() {
        let empty = json!({"experience": []});
        assert_eq!(get_seniority_level(RecordView::new(&empty)), None);
        let missing = json!({});
        assert_eq!(get_seniority_level(RecordView::new(&missing)), None);
        let wrong_shape = json!({"experience": "Senior"});
        assert_eq!(get_seniority_level(RecordView::new(&wrong_shape)), None);
    }

    #[test]
    fn non_string_level_is_unclassified() {
        let record = record_with_level(json!(3));
        assert_eq!(get_seniority_level(RecordView::new(&record)), None);
        let record = record_with_level(json!(null));
        assert_eq!(get_seniority_level(RecordView::new(&record)), None);
    }

    #[test]
    fn only_first_experience_entry_is_consulted() {
        let record = json!({"experience": [
            {"level": "VP"},
            {"level": "senior"}
        ]});
        assert_eq!(get_seniority_level(RecordView::new(&record)), None);
    }

    #[test]
    fn custom_levels_extend_the_vocabulary() {
        let map = SeniorityMap::default().with_level("Staff", SeniorityLabel::Senior);
        assert_eq!(map.classify("staff"), Some(SeniorityLabel::Senior));
    }

    #[test]
    fn labels_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&SeniorityLabel::Mid).unwrap(),
            "\"mid\""
        );
        assert_eq!(SeniorityLabel::Junior.to_string(), "junior");
    }
}
