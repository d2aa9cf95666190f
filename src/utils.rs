//! Text helpers that merge nested values into single flat cells.

use crate::constants::text::{LIST_SEPARATOR, PERIOD_PRESENT, PERIOD_UNKNOWN};
use crate::record::RecordView;
use crate::types::CellText;
use crate::validity::ValidityRules;

/// Join the valid items of an iterator of fields, preserving order.
pub fn join_valid<'a, I>(rules: &ValidityRules, items: I, separator: &str) -> CellText
where
    I: IntoIterator<Item = RecordView<'a>>,
{
    items
        .into_iter()
        .filter(|item| rules.is_valid(*item))
        .map(|item| item.render())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Join the valid members of a JSON list field.
///
/// Missing, null, non-array and empty inputs all yield `""`. No deduplication.
pub fn join_list(rules: &ValidityRules, list: RecordView<'_>, separator: &str) -> CellText {
    join_valid(rules, list.items(), separator)
}

/// Render `{name, level}` skill entries as `name (level)`, or `name` alone
/// when the level is not usable.
///
/// Entries that are not objects, or whose name is invalid, are dropped
/// without being reported.
pub fn extract_skills_with_levels(rules: &ValidityRules, skills: RecordView<'_>) -> CellText {
    skills
        .items()
        .filter(RecordView::is_object)
        .filter_map(|skill| {
            let name = skill.field("name");
            if !rules.is_valid(name) {
                return None;
            }
            let level = skill.field("level");
            Some(if rules.is_valid(level) {
                format!("{} ({})", name.render(), level.render())
            } else {
                name.render()
            })
        })
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Human-readable job period.
///
/// A valid end date without a valid start collapses to `Unknown`, the same
/// as having neither.
pub fn calculate_job_period(rules: &ValidityRules, start: &str, end: &str) -> CellText {
    match (rules.is_valid_str(start), rules.is_valid_str(end)) {
        (true, true) => format!("{start} - {end}"),
        (true, false) => format!("{start} - {PERIOD_PRESENT}"),
        _ => PERIOD_UNKNOWN.to_string(),
    }
}

/// Whitespace-delimited word count.
pub fn summary_word_count(summary: &str) -> usize {
    summary.split_whitespace().count()
}
