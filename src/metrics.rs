use crate::constants::seniority::ALL_SENIORITIES;
use crate::dataset::DatasetRow;
use crate::seniority::SeniorityLabel;

/// Aggregate balance metrics for per-class row counts.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassBalance {
    /// Rows across all classes.
    pub total: usize,
    /// Smallest class count.
    pub min: usize,
    /// Largest class count.
    pub max: usize,
    /// Share of the largest class.
    pub max_share: f64,
    /// Share of the smallest class.
    pub min_share: f64,
    /// `max / min`; infinite when a class is empty.
    pub ratio: f64,
    /// One entry per class, in canonical order.
    pub per_class: Vec<ClassShare>,
}

/// Per-class share of a dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassShare {
    /// Class.
    pub seniority: SeniorityLabel,
    /// Rows in the class.
    pub count: usize,
    /// Fraction of all rows, in `0.0..=1.0`.
    pub share: f64,
}

/// Compute balance metrics over every class, in canonical class order.
/// Classes with no rows are included with a zero count.
pub fn class_balance(rows: &[DatasetRow]) -> Option<ClassBalance> {
    if rows.is_empty() {
        return None;
    }
    let total = rows.len();
    let per_class: Vec<ClassShare> = ALL_SENIORITIES
        .iter()
        .map(|seniority| {
            let count = rows
                .iter()
                .filter(|row| row.seniority == *seniority)
                .count();
            ClassShare {
                seniority: *seniority,
                count,
                share: count as f64 / total as f64,
            }
        })
        .collect();
    let min = per_class.iter().map(|entry| entry.count).min().unwrap_or(0);
    let max = per_class.iter().map(|entry| entry.count).max().unwrap_or(0);
    let ratio = if min == 0 {
        f64::INFINITY
    } else {
        max as f64 / min as f64
    };
    Some(ClassBalance {
        total,
        min,
        max,
        max_share: max as f64 / total as f64,
        min_share: min as f64 / total as f64,
        ratio,
        per_class,
    })
}
