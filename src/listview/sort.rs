//! Sort specification.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Applies the direction to an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    /// Parses `asc` / `desc` (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Active sort field and direction.
///
/// Serializes as `{"sortBy": "...", "sortOrder": "asc"}` so a saved preference
/// stays readable by other clients of the same API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(rename = "sortBy")]
    pub field: String,
    #[serde(rename = "sortOrder", default)]
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desc_reverses_primary_ordering() {
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortDirection::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn toggling_twice_is_identity() {
        assert_eq!(SortDirection::Asc.toggled().toggled(), SortDirection::Asc);
    }

    #[test]
    fn spec_uses_preference_field_names() {
        let spec = SortSpec::new("idade", SortDirection::Desc);
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"sortBy":"idade","sortOrder":"desc"}"#);
    }
}
