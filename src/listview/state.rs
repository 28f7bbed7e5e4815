//! The list view state engine.
//!
//! [`ListViewState`] maps (full record set, filters, sort, page) to (visible
//! page, pagination metadata). The derived set is never edited in place: every
//! mutating call rebuilds it from the full set so it can't drift from the
//! inputs that produced it.
//!
//! # Example
//!
//! ```
//! use roster::listview::{ListSchema, ListViewState, SortDirection};
//! use roster::domain::{FieldValue, Record};
//!
//! #[derive(Clone)]
//! struct Row { id: i64, age: u32 }
//!
//! impl Record for Row {
//!     fn id(&self) -> i64 { self.id }
//!     fn field(&self, key: &str) -> Option<FieldValue> {
//!         (key == "idade").then(|| FieldValue::from(self.age))
//!     }
//! }
//!
//! let schema = ListSchema::new("idade");
//! let mut view = ListViewState::new(schema, 10)?;
//! view.set_records(vec![Row { id: 1, age: 10 }, Row { id: 2, age: 7 }, Row { id: 3, age: 15 }]);
//! view.set_sort("idade", SortDirection::Desc);
//!
//! let ages: Vec<u32> = view.visible_page().iter().map(|r| r.age).collect();
//! assert_eq!(ages, vec![15, 10, 7]);
//! # Ok::<(), roster::RosterError>(())
//! ```

use super::filter::{FilterSpec, PreparedFilter};
use super::page::{PageState, PaginationInfo};
use super::schema::ListSchema;
use super::sort::{SortDirection, SortSpec};
use crate::domain::{FieldValue, Record, Result};
use fuzzy_matcher::skim::SkimMatcherV2;

/// Filterable, sortable, paginated view over a record collection.
#[derive(Debug, Clone)]
pub struct ListViewState<R> {
    schema: ListSchema<R>,
    records: Vec<R>,
    derived: Vec<R>,
    filters: FilterSpec,
    sort: SortSpec,
    page: PageState,
}

impl<R: Record> ListViewState<R> {
    /// Creates an empty view sorted ascending by the schema's default field.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Config`](crate::RosterError::Config) when
    /// `page_size` is zero.
    pub fn new(schema: ListSchema<R>, page_size: usize) -> Result<Self> {
        let page = PageState::new(page_size)?;
        let sort = SortSpec::ascending(schema.default_sort_field());
        Ok(Self {
            schema,
            records: Vec::new(),
            derived: Vec::new(),
            filters: FilterSpec::default(),
            sort,
            page,
        })
    }

    /// Replaces the full record set and returns to page 1.
    pub fn set_records(&mut self, records: Vec<R>) {
        tracing::debug!(count = records.len(), "records replaced");
        self.records = records;
        self.page.reset();
        self.recompute();
    }

    /// Sets one filter entry, or clears it when `value` is `None` or empty.
    /// Returns to page 1.
    pub fn set_filter(&mut self, key: &str, value: Option<&str>) {
        tracing::debug!(key, value = ?value, "filter updated");
        self.filters.set(key, value);
        self.page.reset();
        self.recompute();
    }

    /// Clears every filter entry and returns to page 1.
    pub fn clear_filters(&mut self) {
        tracing::debug!("filters cleared");
        self.filters.clear();
        self.page.reset();
        self.recompute();
    }

    /// Changes the sort order, keeping the current page.
    ///
    /// Fields the schema does not know fall back to its default sort field.
    pub fn set_sort(&mut self, field: &str, direction: SortDirection) {
        let resolved = self.schema.resolve_sort_field(field);
        if resolved != field {
            tracing::debug!(requested = field, fallback = resolved, "unknown sort field");
        }
        self.sort = SortSpec::new(resolved, direction);
        self.recompute();
    }

    /// Applies a saved [`SortSpec`]; see [`ListViewState::set_sort`].
    pub fn apply_sort(&mut self, spec: &SortSpec) {
        self.set_sort(&spec.field, spec.direction);
    }

    /// Advances one page. No-op on the last page.
    pub fn next_page(&mut self) -> bool {
        self.page.next()
    }

    /// Goes back one page. No-op on page 1.
    pub fn prev_page(&mut self) -> bool {
        self.page.prev()
    }

    /// Jumps to `page`, clamped into `[1, max(1, total_pages)]`.
    pub fn go_to_page(&mut self, page: usize) {
        self.page.go_to(page);
    }

    /// Records of the current page.
    #[must_use]
    pub fn visible_page(&self) -> &[R] {
        self.derived
            .get(self.page.window(self.derived.len()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn pagination_info(&self) -> PaginationInfo {
        PaginationInfo {
            current_page: self.page.current(),
            total_pages: self.page.total_pages(),
            total_count: self.derived.len(),
        }
    }

    #[must_use]
    pub const fn sort(&self) -> &SortSpec {
        &self.sort
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    /// The full record set, in fetch order.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Filtered and sorted records, before pagination.
    #[must_use]
    pub fn derived(&self) -> &[R] {
        &self.derived
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page.size()
    }

    #[must_use]
    pub const fn schema(&self) -> &ListSchema<R> {
        &self.schema
    }

    /// Looks a record up by identifier in the full set.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    fn recompute(&mut self) {
        let _span = tracing::debug_span!(
            "recompute",
            total = self.records.len(),
            filters = self.filters.iter().count(),
            sort_field = %self.sort.field,
            sort_direction = self.sort.direction.as_str(),
        )
        .entered();

        let prepared: Vec<PreparedFilter> = self
            .filters
            .iter()
            .map(|(key, value)| PreparedFilter::new(&self.schema.filter_def(key), value))
            .collect();
        let matcher = SkimMatcherV2::default();

        let schema = &self.schema;
        let mut derived: Vec<R> = self
            .records
            .iter()
            .filter(|record| {
                prepared.iter().all(|filter| {
                    let value = schema.value(record, filter.field());
                    filter.matches(value.as_ref(), &matcher)
                })
            })
            .cloned()
            .collect();

        let field = self.sort.field.as_str();
        let direction = self.sort.direction;
        let mut keyed: Vec<(FieldValue, R)> = derived
            .drain(..)
            .map(|record| {
                let key = schema.value(&record, field).unwrap_or(FieldValue::Null);
                (key, record)
            })
            .collect();
        keyed.sort_by(|(a_key, a), (b_key, b)| {
            direction
                .apply(a_key.sort_cmp(b_key))
                .then_with(|| a.id().cmp(&b.id()))
        });

        self.derived = keyed.into_iter().map(|(_, record)| record).collect();
        self.page.update_total(self.derived.len());

        tracing::debug!(
            derived = self.derived.len(),
            page = self.page.current(),
            total_pages = self.page.total_pages(),
            "derived set recomputed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listview::{FilterDef, FilterKind};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        name: &'static str,
        group: Option<i64>,
    }

    impl Record for Row {
        fn id(&self) -> i64 {
            self.id
        }

        fn field(&self, key: &str) -> Option<FieldValue> {
            match key {
                "nome" => Some(FieldValue::from(self.name)),
                "grupo" => Some(FieldValue::from(self.group)),
                _ => None,
            }
        }
    }

    fn schema() -> ListSchema<Row> {
        ListSchema::new("nome")
            .with_filter("search", FilterDef::new("nome", FilterKind::Contains))
            .with_filter("grupo", FilterDef::new("grupo", FilterKind::Equals))
            .with_sort_field("grupo")
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 3, name: "carla", group: Some(1) },
            Row { id: 1, name: "Bruno", group: None },
            Row { id: 2, name: "ana", group: Some(2) },
            Row { id: 4, name: "Ana", group: Some(1) },
        ]
    }

    fn ids(view: &ListViewState<Row>) -> Vec<i64> {
        view.derived().iter().map(|r| r.id).collect()
    }

    #[test]
    fn zero_page_size_fails_fast() {
        assert!(ListViewState::new(schema(), 0).is_err());
    }

    #[test]
    fn equal_keys_break_ties_by_id() {
        let mut view = ListViewState::new(schema(), 10).unwrap();
        view.set_records(rows());
        assert_eq!(ids(&view), vec![2, 4, 1, 3]);

        view.set_sort("nome", SortDirection::Desc);
        assert_eq!(ids(&view), vec![3, 1, 2, 4]);
    }

    #[test]
    fn unknown_sort_field_falls_back_to_default() {
        let mut view = ListViewState::new(schema(), 10).unwrap();
        view.set_records(rows());
        view.set_sort("shoe_size", SortDirection::Asc);
        assert_eq!(view.sort().field, "nome");
        assert_eq!(ids(&view), vec![2, 4, 1, 3]);
    }

    #[test]
    fn numeric_equality_filter_skips_null_groups() {
        let mut view = ListViewState::new(schema(), 10).unwrap();
        view.set_records(rows());
        view.set_filter("grupo", Some("1"));
        assert_eq!(ids(&view), vec![4, 3]);
    }

    #[test]
    fn null_sort_keys_order_first_ascending() {
        let mut view = ListViewState::new(schema(), 10).unwrap();
        view.set_records(rows());
        view.set_sort("grupo", SortDirection::Asc);
        assert_eq!(ids(&view), vec![1, 3, 4, 2]);
    }

    #[test]
    fn unregistered_filter_key_uses_equality_on_same_field() {
        let mut view = ListViewState::new(schema(), 10).unwrap();
        view.set_records(rows());
        view.set_filter("nome", Some("ana"));
        assert_eq!(ids(&view), vec![2]);
    }

    #[test]
    fn sort_keeps_page_but_filter_resets_it() {
        let mut view = ListViewState::new(schema(), 1).unwrap();
        view.set_records(rows());
        view.go_to_page(3);
        view.set_sort("nome", SortDirection::Desc);
        assert_eq!(view.pagination_info().current_page, 3);

        view.set_filter("search", Some("a"));
        assert_eq!(view.pagination_info().current_page, 1);
    }

    #[test]
    fn find_reads_full_set_regardless_of_filters() {
        let mut view = ListViewState::new(schema(), 10).unwrap();
        view.set_records(rows());
        view.set_filter("search", Some("zzz"));
        assert!(view.derived().is_empty());
        assert_eq!(view.find(3).map(|r| r.name), Some("carla"));
    }
}
