//! Label catalog: groups of interchangeable field labels.

use std::collections::HashMap;

use crate::error::ConfigurationError;

/// Strip every space character from a label or cell text.
pub fn normalize_label(text: &str) -> String {
    text.replace(' ', "")
}

/// Validated, immutable set of label groups.
///
/// Each group maps all of its spellings onto one canonical key, the
/// normalized form of the group's first entry.
#[derive(Debug, Clone, Default)]
pub struct LabelCatalog {
    canonical: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl LabelCatalog {
    /// Build a catalog, rejecting blank labels, empty groups, and spellings
    /// shared by more than one group.
    pub fn new<G, L>(groups: G) -> Result<Self, ConfigurationError>
    where
        G: IntoIterator<Item = L>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        let mut canonical = Vec::new();
        let mut lookup: HashMap<String, usize> = HashMap::new();

        for (group, labels) in groups.into_iter().enumerate() {
            let mut key = None;
            for label in labels {
                let normalized = normalize_label(label.as_ref());
                if normalized.is_empty() {
                    return Err(ConfigurationError::EmptyLabel { group });
                }
                match lookup.get(&normalized) {
                    Some(&other) if other != group => {
                        return Err(ConfigurationError::DuplicateLabel {
                            label: normalized,
                            first_group: other,
                            second_group: group,
                        });
                    }
                    Some(_) => {}
                    None => {
                        lookup.insert(normalized.clone(), group);
                    }
                }
                key.get_or_insert(normalized);
            }
            canonical.push(key.ok_or(ConfigurationError::EmptyGroup { group })?);
        }

        Ok(Self { canonical, lookup })
    }

    /// Canonical key for `text` when it names a label in this catalog.
    pub fn classify(&self, text: &str) -> Option<&str> {
        self.lookup
            .get(&normalize_label(text))
            .map(|&group| self.canonical[group].as_str())
    }

    /// Canonical keys in catalog order.
    pub fn canonical_labels(&self) -> impl Iterator<Item = &str> {
        self.canonical.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_ignores_spaces() {
        let catalog = LabelCatalog::new([vec!["BusinessName"], vec!["Age"]]).unwrap();

        assert_eq!(catalog.classify("Business  Name"), Some("BusinessName"));
        assert_eq!(catalog.classify(" Age "), Some("Age"));
        assert_eq!(catalog.classify("age"), None);
        assert_eq!(catalog.classify("Name"), None);
    }

    #[test]
    fn test_synonyms_map_to_first_entry() {
        let catalog = LabelCatalog::new([vec!["Phone", "Tel", "Contact No"]]).unwrap();

        assert_eq!(catalog.classify("Tel"), Some("Phone"));
        assert_eq!(catalog.classify("Contact No"), Some("Phone"));
        assert_eq!(catalog.canonical_labels().collect::<Vec<_>>(), vec!["Phone"]);
    }

    #[test]
    fn test_duplicate_across_groups_is_rejected() {
        let result = LabelCatalog::new([vec!["Name"], vec!["Age", "N ame"]]);

        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::DuplicateLabel {
                label: "Name".to_string(),
                first_group: 0,
                second_group: 1,
            }
        );
    }

    #[test]
    fn test_duplicate_within_group_is_allowed() {
        let catalog = LabelCatalog::new([vec!["Name", "Na me"]]).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_blank_and_empty_groups_are_rejected() {
        let blank = LabelCatalog::new([vec!["Name"], vec!["  "]]);
        assert_eq!(blank.unwrap_err(), ConfigurationError::EmptyLabel { group: 1 });

        let empty = LabelCatalog::new([vec!["Name"], Vec::<&str>::new()]);
        assert_eq!(empty.unwrap_err(), ConfigurationError::EmptyGroup { group: 1 });
    }
}
