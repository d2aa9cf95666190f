use std::collections::HashSet;

use serde_json::Value;

use crate::constants::validity::IGNORE_VALUES;
use crate::record::RecordView;
use crate::types::{CellText, IgnoreValue};

/// Decides whether a scalar counts as present.
///
/// Held as an immutable value and passed into every check so tests and
/// callers can swap the ignore set without touching global state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidityRules {
    ignore_values: HashSet<IgnoreValue>,
}

impl Default for ValidityRules {
    fn default() -> Self {
        Self::new(IGNORE_VALUES)
    }
}

impl ValidityRules {
    /// Build rules from an explicit ignore set (matched exactly after trimming).
    pub fn new<I, S>(ignore_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<IgnoreValue>,
    {
        Self {
            ignore_values: ignore_values.into_iter().map(Into::into).collect(),
        }
    }

    /// Add one more ignored value.
    pub fn with_ignored(mut self, value: impl Into<IgnoreValue>) -> Self {
        self.ignore_values.insert(value.into());
        self
    }

    /// True when `text` (trimmed) is in the ignore set.
    pub fn is_ignored(&self, text: &str) -> bool {
        self.ignore_values.contains(text.trim())
    }

    /// Validity of a plain string.
    pub fn is_valid_str(&self, text: &str) -> bool {
        !self.is_ignored(text)
    }

    /// Validity of a JSON value: null is invalid, strings are checked against
    /// the ignore set, everything else is valid.
    pub fn is_valid_value(&self, value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::String(text) => self.is_valid_str(text),
            _ => true,
        }
    }

    /// Validity of a record field; absent fields are invalid.
    pub fn is_valid(&self, view: RecordView<'_>) -> bool {
        view.value().is_some_and(|value| self.is_valid_value(value))
    }

    /// Rendered field text when valid, else the empty string.
    pub fn safe_get(&self, view: RecordView<'_>) -> CellText {
        if self.is_valid(view) {
            view.render()
        } else {
            String::new()
        }
    }

    /// Number of ignored values.
    pub fn len(&self) -> usize {
        self.ignore_values.len()
    }

    /// True when nothing is ignored (only null/missing are then invalid).
    pub fn is_empty(&self) -> bool {
        self.ignore_values.is_empty()
    }
}
