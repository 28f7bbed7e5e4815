//! Per-list configuration: filter keys, sortable fields and derived fields.

use super::filter::{FilterDef, FilterKind};
use crate::domain::{FieldValue, Record};
use std::collections::HashMap;
use std::sync::Arc;

/// Computes a field that is not a direct record attribute.
pub type Accessor<R> = Arc<dyn Fn(&R) -> FieldValue + Send + Sync>;

/// Describes how a [`ListViewState`](super::ListViewState) reads its records.
///
/// # Example
///
/// ```
/// use roster::listview::{FilterDef, FilterKind, ListSchema};
/// use roster::domain::{FieldValue, Student};
///
/// let schema: ListSchema<Student> = ListSchema::new("nome")
///     .with_filter("search", FilterDef::new("nome", FilterKind::Contains))
///     .with_sort_field("idade")
///     .with_derived("turma", |s: &Student| {
///         FieldValue::from(s.class_name.clone().unwrap_or_default())
///     });
///
/// assert_eq!(schema.resolve_sort_field("turma"), "turma");
/// assert_eq!(schema.resolve_sort_field("bogus"), "nome");
/// ```
pub struct ListSchema<R> {
    filters: HashMap<String, FilterDef>,
    sort_fields: Vec<String>,
    default_sort: String,
    accessors: HashMap<String, Accessor<R>>,
}

impl<R: Record> ListSchema<R> {
    /// Creates a schema whose fallback sort field is `default_sort`.
    #[must_use]
    pub fn new(default_sort: impl Into<String>) -> Self {
        let default_sort = default_sort.into();
        Self {
            filters: HashMap::new(),
            sort_fields: vec![default_sort.clone()],
            default_sort,
            accessors: HashMap::new(),
        }
    }

    /// Registers a filter key.
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, def: FilterDef) -> Self {
        self.filters.insert(key.into(), def);
        self
    }

    /// Registers a sortable record field.
    #[must_use]
    pub fn with_sort_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.sort_fields.contains(&field) {
            self.sort_fields.push(field);
        }
        self
    }

    /// Registers a derived field. Derived fields are sortable and filterable.
    #[must_use]
    pub fn with_derived<F>(mut self, field: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        let field = field.into();
        self.accessors.insert(field.clone(), Arc::new(accessor));
        self.with_sort_field(field)
    }

    /// Definition for a filter key.
    ///
    /// Unregistered keys filter by equality on the field of the same name.
    #[must_use]
    pub fn filter_def(&self, key: &str) -> FilterDef {
        self.filters
            .get(key)
            .cloned()
            .unwrap_or_else(|| FilterDef::new(key, FilterKind::Equals))
    }

    /// Returns `field` if it is sortable, otherwise the default sort field.
    #[must_use]
    pub fn resolve_sort_field<'a>(&'a self, field: &'a str) -> &'a str {
        if self.sort_fields.iter().any(|f| f == field) {
            field
        } else {
            &self.default_sort
        }
    }

    #[must_use]
    pub fn default_sort_field(&self) -> &str {
        &self.default_sort
    }

    /// Reads a field, consulting derived accessors before the record itself.
    #[must_use]
    pub fn value(&self, record: &R, field: &str) -> Option<FieldValue> {
        self.accessors
            .get(field)
            .map_or_else(|| record.field(field), |accessor| Some(accessor(record)))
    }
}

impl<R> Clone for ListSchema<R> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            sort_fields: self.sort_fields.clone(),
            default_sort: self.default_sort.clone(),
            accessors: self.accessors.clone(),
        }
    }
}

impl<R> std::fmt::Debug for ListSchema<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut derived: Vec<&String> = self.accessors.keys().collect();
        derived.sort();
        f.debug_struct("ListSchema")
            .field("filters", &self.filters)
            .field("sort_fields", &self.sort_fields)
            .field("default_sort", &self.default_sort)
            .field("derived", &derived)
            .finish()
    }
}
