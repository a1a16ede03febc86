//! Field validation shared by the create form and the edit modal

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;

pub const TITLE_FIELD: &str = "title";
pub const DESCRIPTION_FIELD: &str = "description";
pub const DUE_DATE_FIELD: &str = "dueDate";
/// Key for errors that belong to no single field
pub const GLOBAL_FIELD: &str = "global";

/// Field name to message mapping used for inline form feedback
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message for a field, replacing any earlier one
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// `field: message` lines joined by newlines
    pub fn to_lines(&self) -> String {
        self.0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for FieldErrors {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Check a candidate title/description pair.
///
/// Lengths are counted in characters. A title that is both blank and too long
/// reports the length message.
pub fn validate(title: &str, description: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if title.trim().is_empty() {
        errors.insert(TITLE_FIELD, "Title is required");
    }
    if title.chars().count() > TITLE_MAX_LEN {
        errors.insert(TITLE_FIELD, format!("Title must be <= {} characters", TITLE_MAX_LEN));
    }
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        errors.insert(
            DESCRIPTION_FIELD,
            format!("Description must be <= {} characters", DESCRIPTION_MAX_LEN),
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_input() {
        assert!(validate("Buy milk", "").is_empty());
        assert!(validate(&"a".repeat(100), &"b".repeat(500)).is_empty());
    }

    #[test]
    fn test_blank_title_is_required() {
        for title in ["", "   ", "\t\n"] {
            let errors = validate(title, "");
            assert_eq!(errors.get(TITLE_FIELD), Some("Title is required"));
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn test_long_title() {
        let errors = validate(&"a".repeat(101), "");
        assert_eq!(errors.get(TITLE_FIELD), Some("Title must be <= 100 characters"));
    }

    #[test]
    fn test_long_blank_title_reports_length() {
        let errors = validate(&" ".repeat(101), "");
        assert_eq!(errors.get(TITLE_FIELD), Some("Title must be <= 100 characters"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        assert!(validate(&"é".repeat(100), "").is_empty());
    }

    #[test]
    fn test_long_description() {
        let errors = validate("ok", &"d".repeat(501));
        assert_eq!(
            errors.get(DESCRIPTION_FIELD),
            Some("Description must be <= 500 characters")
        );
        assert!(!errors.contains(TITLE_FIELD));
    }

    #[test]
    fn test_both_fields_invalid() {
        let errors = validate("", &"d".repeat(501));
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_lines(),
            "description: Description must be <= 500 characters\ntitle: Title is required"
        );
    }
}
