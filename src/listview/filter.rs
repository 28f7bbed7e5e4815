//! Filter criteria and record matching.
//!
//! A [`FilterSpec`] maps filter keys to the value typed or selected by the
//! user. Each key resolves, through the [`ListSchema`](super::ListSchema), to a
//! [`FilterDef`] naming the record field it targets and how values compare.

use crate::domain::FieldValue;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::BTreeMap;

/// How a filter value is compared against a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Case-insensitive substring match. Absent fields match as empty text.
    Contains,
    /// Exact match (numeric when the field is a number). Absent fields never match.
    Equals,
    /// Skim fuzzy match; every whitespace-separated token must match.
    Fuzzy,
}

/// Resolved definition of one filter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDef {
    /// Record field the filter reads.
    pub field: String,
    /// Comparison applied to the field.
    pub kind: FilterKind,
}

impl FilterDef {
    #[must_use]
    pub fn new(field: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

/// Active filter criteria keyed by filter key.
///
/// Only non-empty values are stored, so an entry's presence means "constrained".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    entries: BTreeMap<String, String>,
}

impl FilterSpec {
    /// Sets or clears one entry. `None` and the empty string both clear.
    pub fn set(&mut self, key: &str, value: Option<&str>) {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                self.entries.insert(key.to_string(), value.to_string());
            }
            None => {
                self.entries.remove(key);
            }
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Value currently set for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over active `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Snapshot of the active entries, e.g. for export metadata.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries.clone()
    }
}

/// A filter value prepared once per recomputation.
///
/// Lowercasing and tokenizing happen here instead of once per record.
pub(crate) enum PreparedFilter {
    Contains { field: String, needle: String },
    Equals { field: String, value: String },
    Fuzzy { field: String, tokens: Vec<String> },
}

impl PreparedFilter {
    pub(crate) fn new(def: &FilterDef, value: &str) -> Self {
        let field = def.field.clone();
        match def.kind {
            FilterKind::Contains => Self::Contains {
                field,
                needle: value.to_lowercase(),
            },
            FilterKind::Equals => Self::Equals {
                field,
                value: value.to_string(),
            },
            FilterKind::Fuzzy => Self::Fuzzy {
                field,
                tokens: value.split_whitespace().map(str::to_lowercase).collect(),
            },
        }
    }

    pub(crate) fn field(&self) -> &str {
        match self {
            Self::Contains { field, .. } | Self::Equals { field, .. } | Self::Fuzzy { field, .. } => {
                field
            }
        }
    }

    /// Tests one resolved field value. `None` means the record has no such field.
    pub(crate) fn matches(&self, value: Option<&FieldValue>, matcher: &SkimMatcherV2) -> bool {
        match self {
            Self::Contains { needle, .. } => {
                let haystack = value.map(FieldValue::search_text).unwrap_or_default();
                haystack.to_lowercase().contains(needle.as_str())
            }
            Self::Equals { value: expected, .. } => {
                value.is_some_and(|v| v.equals_filter(expected))
            }
            Self::Fuzzy { tokens, .. } => {
                let haystack = value
                    .map(FieldValue::search_text)
                    .unwrap_or_default()
                    .to_lowercase();
                tokens
                    .iter()
                    .all(|token| matcher.fuzzy_match(&haystack, token).is_some())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared(kind: FilterKind, value: &str) -> PreparedFilter {
        PreparedFilter::new(&FilterDef::new("nome", kind), value)
    }

    #[test]
    fn empty_value_clears_entry() {
        let mut spec = FilterSpec::default();
        spec.set("status", Some("ativo"));
        assert_eq!(spec.get("status"), Some("ativo"));

        spec.set("status", Some(""));
        assert!(spec.is_empty());

        spec.set("status", Some("inativo"));
        spec.set("status", None);
        assert!(spec.is_empty());
    }

    #[test]
    fn contains_is_case_insensitive_and_treats_absent_as_empty() {
        let matcher = SkimMatcherV2::default();
        let filter = prepared(FilterKind::Contains, "SOU");
        let value = FieldValue::from("Ana Souza");
        assert!(filter.matches(Some(&value), &matcher));
        assert!(!filter.matches(None, &matcher));
        assert!(!filter.matches(Some(&FieldValue::Null), &matcher));
    }

    #[test]
    fn equals_rejects_absent_fields() {
        let matcher = SkimMatcherV2::default();
        let filter = prepared(FilterKind::Equals, "ativo");
        assert!(filter.matches(Some(&FieldValue::from("ativo")), &matcher));
        assert!(!filter.matches(Some(&FieldValue::from("Ativo")), &matcher));
        assert!(!filter.matches(None, &matcher));
    }

    #[test]
    fn fuzzy_requires_every_token() {
        let matcher = SkimMatcherV2::default();
        let value = FieldValue::from("Beatriz Fernandes");
        assert!(prepared(FilterKind::Fuzzy, "btz fern").matches(Some(&value), &matcher));
        assert!(!prepared(FilterKind::Fuzzy, "btz xyz").matches(Some(&value), &matcher));
    }
}
