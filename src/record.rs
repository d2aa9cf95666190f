use serde_json::Value;

use crate::types::CellText;

/// Borrowed, total accessor over one raw profile record.
///
/// Every lookup succeeds: a missing key, a key looked up on a non-object, or
/// an index past the end of a list all yield the missing view. Callers decide
/// defaults through the validity rules instead of handling lookup failures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordView<'a> {
    value: Option<&'a Value>,
}

impl<'a> RecordView<'a> {
    /// Wrap a parsed JSON value.
    pub fn new(value: &'a Value) -> Self {
        Self { value: Some(value) }
    }

    /// View that stands for an absent field.
    pub const fn missing() -> Self {
        Self { value: None }
    }

    /// Underlying JSON value, `None` when absent.
    pub fn value(&self) -> Option<&'a Value> {
        self.value
    }

    /// True when the field is absent or JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self.value, None | Some(Value::Null))
    }

    /// True when the field holds a JSON object.
    pub fn is_object(&self) -> bool {
        matches!(self.value, Some(Value::Object(_)))
    }

    /// Child field by key; missing unless this view is an object holding `key`.
    pub fn field(&self, key: &str) -> RecordView<'a> {
        match self.value {
            Some(Value::Object(map)) => map.get(key).map_or(Self::missing(), Self::new),
            _ => Self::missing(),
        }
    }

    /// Follow a chain of object keys.
    pub fn path(&self, keys: &[&str]) -> RecordView<'a> {
        keys.iter().fold(*self, |view, key| view.field(key))
    }

    /// List element by position; missing unless this view is an array long enough.
    pub fn at(&self, idx: usize) -> RecordView<'a> {
        match self.value {
            Some(Value::Array(items)) => items.get(idx).map_or(Self::missing(), Self::new),
            _ => Self::missing(),
        }
    }

    /// First list element.
    pub fn first(&self) -> RecordView<'a> {
        self.at(0)
    }

    /// Iterate list elements; empty for anything that is not an array.
    pub fn items(self) -> impl Iterator<Item = RecordView<'a>> + 'a {
        let items: &'a [Value] = match self.value {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        };
        items.iter().map(Self::new)
    }

    /// Number of list elements (0 for non-arrays).
    pub fn len(&self) -> usize {
        match self.value {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    /// True when `len() == 0`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the string payload, if this is a JSON string.
    pub fn as_str(&self) -> Option<&'a str> {
        self.value.and_then(Value::as_str)
    }

    /// Render the value as cell text.
    ///
    /// Strings are returned verbatim (untrimmed), other scalars use their JSON
    /// text (`42`, `true`), nested arrays/objects are compact JSON. Absent and
    /// null values render as the empty string.
    pub fn render(&self) -> CellText {
        match self.value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_keys_and_wrong_shapes_yield_missing_views() {
        let value = json!({"personal_info": "not an object", "experience": {"title": "x"}});
        let view = RecordView::new(&value);

        assert!(view.path(&["personal_info", "name"]).is_null());
        assert!(view.field("absent").is_null());
        assert!(view.field("experience").first().is_null());
        assert_eq!(view.field("experience").len(), 0);
        assert_eq!(view.field("experience").items().count(), 0);
    }

    #[test]
    fn path_walks_nested_objects() {
        let value = json!({"personal_info": {"location": {"remote_preference": "Hybrid"}}});
        let view = RecordView::new(&value);
        assert_eq!(
            view.path(&["personal_info", "location", "remote_preference"])
                .as_str(),
            Some("Hybrid")
        );
    }

    #[test]
    fn render_keeps_strings_verbatim_and_formats_other_scalars() {
        let value = json!({"a": "  padded ", "b": 42, "c": true, "d": null, "e": [1, "x"]});
        let view = RecordView::new(&value);
        assert_eq!(view.field("a").render(), "  padded ");
        assert_eq!(view.field("b").render(), "42");
        assert_eq!(view.field("c").render(), "true");
        assert_eq!(view.field("d").render(), "");
        assert_eq!(view.field("e").render(), r#"[1,"x"]"#);
        assert_eq!(view.field("zzz").render(), "");
    }

    #[test]
    fn items_and_at_index_into_arrays() {
        let value = json!({"list": ["a", "b", "c"]});
        let list = RecordView::new(&value).field("list");
        assert_eq!(list.len(), 3);
        assert_eq!(list.at(2).as_str(), Some("c"));
        assert!(list.at(3).is_null());
        let collected: Vec<_> = list.items().filter_map(|item| item.as_str()).collect();
        assert_eq!(collected, vec!["a", "b", "c"]);
    }
}
