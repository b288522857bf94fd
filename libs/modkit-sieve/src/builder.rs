//! Typed Sieve query builder
//!
//! `SieveQuery` accumulates filter clauses, sort tokens and pagination, and renders them
//! as a filter string, a sort string, a [`SieveModel`] record, a URL query string or a
//! parameter list. The same builder is produced by the parser, so a query can be read
//! back, adjusted and rendered again.
//!
//! # Example
//!
//! ```rust
//! use modkit_sieve::{FieldRef, Schema, SieveQuery};
//!
//! #[derive(Copy, Clone, Debug, Eq, PartialEq)]
//! enum PostField {
//!     Title,
//!     Likes,
//! }
//!
//! struct PostSchema;
//!
//! impl Schema for PostSchema {
//!     type Field = PostField;
//!
//!     const FIELDS: &'static [PostField] = &[PostField::Title, PostField::Likes];
//!
//!     fn field_name(field: Self::Field) -> &'static str {
//!         match field {
//!             PostField::Title => "title",
//!             PostField::Likes => "likes",
//!         }
//!     }
//! }
//!
//! const TITLE: FieldRef<PostSchema, String> = FieldRef::new(PostField::Title);
//! const LIKES: FieldRef<PostSchema, i32> = FieldRef::new(PostField::Likes);
//!
//! let query = SieveQuery::<PostSchema>::new()
//!     .filter_contains(TITLE, "rust")
//!     .filter_greater_than(LIKES, 10)
//!     .sort_by_descending(LIKES)
//!     .page(1)
//!     .page_size(20);
//!
//! assert_eq!(query.filter_string(), "Title@=rust,Likes>10");
//! assert_eq!(
//!     query.to_query_string(),
//!     "filters=Title%40%3Drust%2CLikes%3E10&sorts=-Likes&page=1&pageSize=20"
//! );
//! ```

use crate::grammar::{self, FilterTerm, SortTerm};
use crate::model::{
    self, FILTERS_PARAM, PAGE_PARAM, PAGE_SIZE_PARAM, QueryParam, SORTS_PARAM, SieveModel,
};
use crate::options::SieveOptions;
use crate::schema::{AsFieldKey, FieldRef, FilterClause, Schema, Untyped};
use crate::value::IntoSieveValue;
use std::fmt;
use std::marker::PhantomData;

/// Builder over plain field names, for callers without a declared schema.
pub type DynamicSieveQuery = SieveQuery<Untyped>;

/// Chainable accumulator of Sieve filters, sorts and pagination.
pub struct SieveQuery<S: Schema> {
    pub(crate) filters: Vec<String>,
    pub(crate) sorts: Vec<String>,
    pub(crate) page: Option<u32>,
    pub(crate) page_size: Option<u32>,
    pub(crate) options: SieveOptions,
    _phantom: PhantomData<S>,
}

impl<S: Schema> SieveQuery<S> {
    /// Create an empty builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(SieveOptions::default())
    }

    /// Create an empty builder with the given options.
    #[must_use]
    pub fn with_options(options: SieveOptions) -> Self {
        Self {
            filters: Vec::new(),
            sorts: Vec::new(),
            page: None,
            page_size: None,
            options,
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn options(&self) -> &SieveOptions {
        &self.options
    }

    fn wire_name(&self, field: S::Field) -> String {
        self.options.field_case.apply(S::field_name(field))
    }

    fn push_filter(mut self, clause: String, replace_field: Option<&str>) -> Self {
        if let Some(field) = replace_field {
            self.retain_filters_not_on(field);
        }
        if !clause.is_empty() {
            self.filters.push(clause);
        }
        self
    }

    fn push_sort(mut self, token: String) -> Self {
        if !token.is_empty() {
            self.sorts.push(token);
        }
        self
    }

    fn retain_filters_not_on(&mut self, field: &str) {
        let before = self.filters.len();
        self.filters
            .retain(|clause| FilterTerm::parse(clause).field_name != field);
        let removed = before - self.filters.len();
        if removed > 0 {
            tracing::trace!(field, removed, "removed sieve filters");
        }
    }

    fn typed_clause(&self, clause: &FilterClause<S>) -> (String, String) {
        let field = self.wire_name(clause.field());
        let text = grammar::filter_clause(
            &field,
            clause.operator().symbol(),
            &clause.value().format(),
        );
        (field, text)
    }

    /// Append a typed filter clause.
    ///
    /// ```rust,ignore
    /// builder.filter(TITLE.contains("rust"))
    /// ```
    #[must_use]
    pub fn filter(self, clause: FilterClause<S>) -> Self {
        let (_, text) = self.typed_clause(&clause);
        self.push_filter(text, None)
    }

    /// Remove every filter on the clause's field, then append the clause.
    ///
    /// Calling this on every keystroke of a search box keeps exactly one clause
    /// for that field.
    #[must_use]
    pub fn replace_filter(self, clause: FilterClause<S>) -> Self {
        let (field, text) = self.typed_clause(&clause);
        self.push_filter(text, Some(&field))
    }

    #[must_use]
    pub fn filter_equals<T, V: IntoSieveValue>(self, field: FieldRef<S, T>, value: V) -> Self {
        self.filter(field.eq(value))
    }

    #[must_use]
    pub fn filter_not_equals<T, V: IntoSieveValue>(
        self,
        field: FieldRef<S, T>,
        value: V,
    ) -> Self {
        self.filter(field.ne(value))
    }

    #[must_use]
    pub fn filter_contains(self, field: FieldRef<S, String>, value: &str) -> Self {
        self.filter(field.contains(value))
    }

    #[must_use]
    pub fn filter_starts_with(self, field: FieldRef<S, String>, value: &str) -> Self {
        self.filter(field.starts_with(value))
    }

    #[must_use]
    pub fn filter_greater_than<T, V: IntoSieveValue>(
        self,
        field: FieldRef<S, T>,
        value: V,
    ) -> Self {
        self.filter(field.gt(value))
    }

    #[must_use]
    pub fn filter_less_than<T, V: IntoSieveValue>(self, field: FieldRef<S, T>, value: V) -> Self {
        self.filter(field.lt(value))
    }

    #[must_use]
    pub fn filter_greater_than_or_equal<T, V: IntoSieveValue>(
        self,
        field: FieldRef<S, T>,
        value: V,
    ) -> Self {
        self.filter(field.ge(value))
    }

    #[must_use]
    pub fn filter_less_than_or_equal<T, V: IntoSieveValue>(
        self,
        field: FieldRef<S, T>,
        value: V,
    ) -> Self {
        self.filter(field.le(value))
    }

    #[must_use]
    pub fn replace_equals<T, V: IntoSieveValue>(self, field: FieldRef<S, T>, value: V) -> Self {
        self.replace_filter(field.eq(value))
    }

    #[must_use]
    pub fn replace_not_equals<T, V: IntoSieveValue>(
        self,
        field: FieldRef<S, T>,
        value: V,
    ) -> Self {
        self.replace_filter(field.ne(value))
    }

    #[must_use]
    pub fn replace_contains(self, field: FieldRef<S, String>, value: &str) -> Self {
        self.replace_filter(field.contains(value))
    }

    #[must_use]
    pub fn replace_starts_with(self, field: FieldRef<S, String>, value: &str) -> Self {
        self.replace_filter(field.starts_with(value))
    }

    #[must_use]
    pub fn replace_greater_than<T, V: IntoSieveValue>(
        self,
        field: FieldRef<S, T>,
        value: V,
    ) -> Self {
        self.replace_filter(field.gt(value))
    }

    #[must_use]
    pub fn replace_less_than<T, V: IntoSieveValue>(
        self,
        field: FieldRef<S, T>,
        value: V,
    ) -> Self {
        self.replace_filter(field.lt(value))
    }

    #[must_use]
    pub fn replace_greater_than_or_equal<T, V: IntoSieveValue>(
        self,
        field: FieldRef<S, T>,
        value: V,
    ) -> Self {
        self.replace_filter(field.ge(value))
    }

    #[must_use]
    pub fn replace_less_than_or_equal<T, V: IntoSieveValue>(
        self,
        field: FieldRef<S, T>,
        value: V,
    ) -> Self {
        self.replace_filter(field.le(value))
    }

    /// Append a filter on an arbitrary field name with an arbitrary operator symbol.
    ///
    /// Meant for server-side mapped or computed fields that have no declared property.
    /// Neither the name nor the symbol is validated, and the name is used verbatim.
    #[must_use]
    pub fn filter_by_name<V: IntoSieveValue>(
        self,
        field_name: &str,
        symbol: &str,
        value: V,
    ) -> Self {
        let text = grammar::filter_clause(field_name, symbol, &value.into_sieve_value().format());
        self.push_filter(text, None)
    }

    /// Like [`Self::filter_by_name`] with replace semantics.
    #[must_use]
    pub fn replace_filter_by_name<V: IntoSieveValue>(
        self,
        field_name: &str,
        symbol: &str,
        value: V,
    ) -> Self {
        let text = grammar::filter_clause(field_name, symbol, &value.into_sieve_value().format());
        self.push_filter(text, Some(field_name))
    }

    /// Append an ascending sort on a declared field.
    #[must_use]
    pub fn sort_by<F: AsFieldKey<S>>(self, field: F) -> Self {
        let name = self.wire_name(field.as_field_key());
        self.push_sort(grammar::sort_token(&name, false))
    }

    /// Append a descending sort on a declared field.
    #[must_use]
    pub fn sort_by_descending<F: AsFieldKey<S>>(self, field: F) -> Self {
        let name = self.wire_name(field.as_field_key());
        self.push_sort(grammar::sort_token(&name, true))
    }

    /// Append a sort on an arbitrary field name, used verbatim.
    #[must_use]
    pub fn sort_by_name(self, field_name: &str, descending: bool) -> Self {
        self.push_sort(grammar::sort_token(field_name, descending))
    }

    /// Drop every filter on a declared field.
    #[must_use]
    pub fn remove_filters<F: AsFieldKey<S>>(mut self, field: F) -> Self {
        let name = self.wire_name(field.as_field_key());
        self.retain_filters_not_on(&name);
        self
    }

    /// Drop every filter whose field name equals `field_name`. No-op if none match.
    #[must_use]
    pub fn remove_filters_by_name(mut self, field_name: &str) -> Self {
        self.retain_filters_not_on(field_name);
        self
    }

    #[must_use]
    pub fn clear_filters(mut self) -> Self {
        self.filters.clear();
        self
    }

    #[must_use]
    pub fn clear_sorts(mut self) -> Self {
        self.sorts.clear();
        self
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Whether any filter targets `field_name` (exact match on the decomposed name).
    #[must_use]
    pub fn has_filter(&self, field_name: &str) -> bool {
        self.filters
            .iter()
            .any(|clause| FilterTerm::parse(clause).field_name == field_name)
    }

    /// Whether any sort targets `field_name` (either direction).
    #[must_use]
    pub fn has_sort(&self, field_name: &str) -> bool {
        self.sorts
            .iter()
            .any(|token| SortTerm::parse(token).field_name == field_name)
    }

    #[must_use]
    pub fn has_filter_for<F: AsFieldKey<S>>(&self, field: F) -> bool {
        self.has_filter(&self.wire_name(field.as_field_key()))
    }

    #[must_use]
    pub fn has_sort_for<F: AsFieldKey<S>>(&self, field: F) -> bool {
        self.has_sort(&self.wire_name(field.as_field_key()))
    }

    /// Decomposed filters in insertion order.
    #[must_use]
    pub fn filters(&self) -> Vec<FilterTerm> {
        self.filters.iter().map(|c| FilterTerm::parse(c)).collect()
    }

    /// Decomposed sorts in insertion order.
    #[must_use]
    pub fn sorts(&self) -> Vec<SortTerm> {
        self.sorts.iter().map(|t| SortTerm::parse(t)).collect()
    }

    #[must_use]
    pub fn current_page(&self) -> Option<u32> {
        self.page
    }

    #[must_use]
    pub fn current_page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Filters joined by `,`; empty when there are none.
    #[must_use]
    pub fn filter_string(&self) -> String {
        grammar::join_list(&self.filters)
    }

    /// Sorts joined by `,`; empty when there are none.
    #[must_use]
    pub fn sort_string(&self) -> String {
        grammar::join_list(&self.sorts)
    }

    /// Structured record; page and page size follow [`SieveOptions::pagination`].
    #[must_use]
    pub fn to_model(&self) -> SieveModel {
        let (page, page_size) = self.options.pagination.resolve(self.page, self.page_size);
        SieveModel {
            filters: non_empty(self.filter_string()),
            sorts: non_empty(self.sort_string()),
            page,
            page_size,
        }
    }

    /// Non-empty components as native values, in wire order.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, QueryParam)> {
        let mut params = Vec::with_capacity(4);
        if let Some(filters) = non_empty(self.filter_string()) {
            params.push((FILTERS_PARAM, QueryParam::Text(filters)));
        }
        if let Some(sorts) = non_empty(self.sort_string()) {
            params.push((SORTS_PARAM, QueryParam::Text(sorts)));
        }
        if let Some(page) = self.page {
            params.push((PAGE_PARAM, QueryParam::Number(page)));
        }
        if let Some(page_size) = self.page_size {
            params.push((PAGE_SIZE_PARAM, QueryParam::Number(page_size)));
        }
        params
    }

    /// `filters=…&sorts=…&page=…&pageSize=…` with empty components left out.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        model::render_query_string(&self.to_params())
    }
}

fn non_empty(joined: String) -> Option<String> {
    (!joined.is_empty()).then_some(joined)
}

impl SieveQuery<Untyped> {
    /// Builder that only accepts by-name operations.
    #[must_use]
    pub fn untyped() -> Self {
        Self::new()
    }
}

impl<S: Schema> Default for SieveQuery<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> Clone for SieveQuery<S> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            sorts: self.sorts.clone(),
            page: self.page,
            page_size: self.page_size,
            options: self.options,
            _phantom: PhantomData,
        }
    }
}

impl<S: Schema> fmt::Debug for SieveQuery<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SieveQuery")
            .field("filters", &self.filters)
            .field("sorts", &self.sorts)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("options", &self.options)
            .finish()
    }
}

impl<S: Schema> PartialEq for SieveQuery<S> {
    fn eq(&self, other: &Self) -> bool {
        self.filters == other.filters
            && self.sorts == other.sorts
            && self.page == other.page
            && self.page_size == other.page_size
    }
}

impl<S: Schema> fmt::Display for SieveQuery<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<S: Schema> From<&SieveQuery<S>> for SieveModel {
    fn from(query: &SieveQuery<S>) -> Self {
        query.to_model()
    }
}
