//! Extracted field values and post-processing.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::grid::CellValue;

/// Canonical label to value, one entry per field found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, CellValue>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any earlier value for the same label.
    pub fn insert(&mut self, label: impl Into<String>, value: CellValue) -> Option<CellValue> {
        self.0.insert(label.into(), value)
    }

    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.0.get(label)
    }

    pub fn remove(&mut self, label: &str) -> Option<CellValue> {
        self.0.remove(label)
    }

    pub fn contains_key(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, CellValue> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Render the values for `columns` in order, blank where a field is absent.
    pub fn to_record<S: AsRef<str>>(&self, columns: &[S]) -> Vec<String> {
        columns
            .iter()
            .map(|column| {
                self.get(column.as_ref())
                    .map(ToString::to_string)
                    .unwrap_or_default()
            })
            .collect()
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, CellValue);
    type IntoIter = btree_map::IntoIter<String, CellValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = (&'a String, &'a CellValue);
    type IntoIter = btree_map::Iter<'a, String, CellValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Split one combined text field into several columns.
///
/// Applied only when the field holds text containing `separator`; the
/// combined field is then removed. Parts beyond `into.len()` are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRule {
    /// Canonical label of the combined field.
    pub field: String,
    /// Separator between the parts.
    pub separator: String,
    /// Target column for each part, in order.
    pub into: Vec<String>,
}

impl SplitRule {
    pub fn new(field: impl Into<String>, separator: impl Into<String>, into: &[&str]) -> Self {
        Self {
            field: field.into(),
            separator: separator.into(),
            into: into.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Apply this rule to `fields`. Returns whether anything changed.
    pub fn apply(&self, fields: &mut FieldMap) -> bool {
        if self.separator.is_empty() {
            return false;
        }
        let parts: Vec<String> = match fields.get(&self.field).and_then(CellValue::as_text) {
            Some(text) if text.contains(self.separator.as_str()) => text
                .split(self.separator.as_str())
                .map(|part| part.trim().to_string())
                .collect(),
            _ => return false,
        };

        fields.remove(&self.field);
        for (column, part) in self.into.iter().zip(parts) {
            fields.insert(column.clone(), CellValue::Text(part));
        }
        true
    }
}

/// Apply every rule in order.
pub fn apply_split_rules(fields: &mut FieldMap, rules: &[SplitRule]) {
    for rule in rules {
        rule.apply(fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contact_rule() -> SplitRule {
        SplitRule::new("Contact/Phone", "/", &["Contact", "Phone"])
    }

    #[test]
    fn test_split_rule_applies() {
        let mut fields: FieldMap =
            [("Contact/Phone", CellValue::from("Kim / 010-1234-5678"))].into_iter().collect();

        assert!(contact_rule().apply(&mut fields));
        assert_eq!(
            fields,
            [
                ("Contact", CellValue::from("Kim")),
                ("Phone", CellValue::from("010-1234-5678")),
            ]
            .into_iter()
            .collect::<FieldMap>()
        );
    }

    #[test]
    fn test_split_rule_without_separator_keeps_field() {
        let mut fields: FieldMap =
            [("Contact/Phone", CellValue::from("Kim"))].into_iter().collect();

        assert!(!contact_rule().apply(&mut fields));
        assert_eq!(fields.get("Contact/Phone"), Some(&CellValue::from("Kim")));
        assert!(!fields.contains_key("Contact"));
    }

    #[test]
    fn test_split_rule_ignores_non_text() {
        let mut fields: FieldMap =
            [("Contact/Phone", CellValue::Number(5.0))].into_iter().collect();
        assert!(!contact_rule().apply(&mut fields));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_to_record_blanks_missing_columns() {
        let fields: FieldMap = [
            ("Name", CellValue::from("Alice")),
            ("Age", CellValue::Number(30.0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            fields.to_record(&["Age", "Email", "Name"]),
            vec!["30".to_string(), String::new(), "Alice".to_string()]
        );
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let fields: FieldMap = [
            ("Name", CellValue::from("Alice")),
            ("Age", CellValue::Number(30.0)),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"Age":30.0,"Name":"Alice"}"#);
    }
}
