//! Generic record model consumed by the list view engine.
//!
//! A [`Record`] is anything with a stable integer identifier and a set of named
//! fields. Field values are deliberately loose ([`FieldValue`]) because the
//! school API sends strings, numbers and nulls side by side.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single field value of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null (or a value that should behave like one).
    Null,
    /// Numeric value. Integers are stored losslessly up to 2^53.
    Number(f64),
    /// Text value.
    Text(String),
}

impl FieldValue {
    /// Text used for substring and fuzzy matching.
    ///
    /// Null becomes the empty string; numbers use their shortest display form
    /// (`10`, not `10.0`).
    #[must_use]
    pub fn search_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Exact match against a filter value.
    ///
    /// Numbers match when the filter value parses to the same number, so a
    /// class filter of `"3"` matches `turma_id = 3`. Null never matches.
    #[must_use]
    pub fn equals_filter(&self, value: &str) -> bool {
        match self {
            Self::Null => false,
            Self::Number(n) => value
                .trim()
                .parse::<f64>()
                .is_ok_and(|parsed| parsed.total_cmp(n) == Ordering::Equal),
            Self::Text(s) => s == value,
        }
    }

    /// Ordering used by the sort comparator.
    ///
    /// Values rank by kind first (null, then numbers, then text) so the
    /// ordering stays total when a field mixes kinds. Numbers compare
    /// numerically, text compares case-insensitively.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    const fn kind_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// An entity the list view engine can filter, sort and paginate.
///
/// Implementors return `None` from [`Record::field`] for keys they do not know;
/// the engine then applies its "absent field" rules.
pub trait Record: Clone {
    /// Stable identifier, also used as the sort tie-breaker.
    fn id(&self) -> i64;

    /// Looks up a named field.
    fn field(&self, key: &str) -> Option<FieldValue>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_match_numeric_filter_text() {
        let value = FieldValue::from(3_i64);
        assert!(value.equals_filter("3"));
        assert!(value.equals_filter(" 3 "));
        assert!(!value.equals_filter("4"));
        assert!(!value.equals_filter("three"));
    }

    #[test]
    fn null_never_equals() {
        assert!(!FieldValue::Null.equals_filter(""));
        assert!(!FieldValue::Null.equals_filter("ativo"));
    }

    #[test]
    fn text_sorts_case_insensitively() {
        let a = FieldValue::from("ana");
        let b = FieldValue::from("Bruno");
        assert_eq!(a.sort_cmp(&b), Ordering::Less);
    }

    #[test]
    fn null_sorts_before_everything() {
        let null = FieldValue::Null;
        assert_eq!(null.sort_cmp(&FieldValue::from("")), Ordering::Less);
        assert_eq!(null.sort_cmp(&FieldValue::from(-5_i64)), Ordering::Less);
        assert_eq!(null.sort_cmp(&FieldValue::Null), Ordering::Equal);
    }

    #[test]
    fn mixed_kinds_order_transitively() {
        let values = [
            FieldValue::from(9_i64),
            FieldValue::from(10_i64),
            FieldValue::from("1a"),
            FieldValue::from("B"),
            FieldValue::from("b"),
            FieldValue::Null,
            FieldValue::from(""),
            FieldValue::from(2.5),
        ];

        for a in &values {
            assert_eq!(a.sort_cmp(a), Ordering::Equal);
            for b in &values {
                assert_eq!(a.sort_cmp(b), b.sort_cmp(a).reverse());
                for c in &values {
                    if a.sort_cmp(b) != Ordering::Greater && b.sort_cmp(c) != Ordering::Greater {
                        assert_ne!(a.sort_cmp(c), Ordering::Greater, "{a:?} {b:?} {c:?}");
                    }
                }
            }
        }

        assert_eq!(
            FieldValue::from(10_i64).sort_cmp(&FieldValue::from("1a")),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::from("1a").sort_cmp(&FieldValue::from(9_i64)),
            Ordering::Greater
        );
    }

    #[test]
    fn numbers_sort_numerically() {
        let nine = FieldValue::from(9_i64);
        let ten = FieldValue::from(10_i64);
        assert_eq!(nine.sort_cmp(&ten), Ordering::Less);
        assert_eq!(ten.search_text(), "10");
    }
}
