//! Query builder and executor.
//!
//! A [`Query`] is a compiled set of clauses plus orderings. FilterState is
//! compiled into one by the engine, but queries are also built directly for
//! ad hoc views (e.g. "featured drafts").

use crate::clause::{Clause, ClauseValue};
use crate::op::Op;
use crate::ordering::{compare_by_orderings, OrderBy, SortOrder};
use crate::value::{Timestamp, Value};

/// A query for filtering and ordering collections.
///
/// Three clause groups with fixed logic:
///
/// ```text
/// match = (all AND clauses match)
///       ∧ (at least one OR clause matches, OR no OR clauses exist)
///       ∧ (no NOT clause matches)
/// ```
///
/// # Example
///
/// ```
/// use marquee_query::{Number, Query, Value};
///
/// struct Story {
///     title: &'static str,
///     status: &'static str,
///     views: u64,
/// }
///
/// fn accessor<'a>(story: &'a Story, field: &str) -> Value<'a> {
///     match field {
///         "title" => Value::String(story.title),
///         "status" => Value::Tag(story.status),
///         "views" => Value::Number(Number::U64(story.views)),
///         _ => Value::None,
///     }
/// }
///
/// let stories = vec![
///     Story { title: "Night Shift", status: "published", views: 120 },
///     Story { title: "Day One", status: "draft", views: 0 },
///     Story { title: "Night Owl", status: "published", views: 340 },
/// ];
///
/// let query = Query::new()
///     .and_eq("status", "published")
///     .or_icontains("title", "night")
///     .order_desc("views");
///
/// let rows = query.filter(&stories, accessor);
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].title, "Night Owl");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    and_clauses: Vec<Clause>,
    or_clauses: Vec<Clause>,
    not_clauses: Vec<Clause>,
    orderings: Vec<OrderBy>,
    unsatisfiable: bool,
}

impl Query {
    /// Creates an empty query, which matches every item.
    pub fn new() -> Self {
        Query::default()
    }

    // ========================================================================
    // Generic clause builders
    // ========================================================================

    /// Adds an AND clause. All AND clauses must match.
    pub fn and(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.and_clauses.push(Clause::new(field, op, value));
        self
    }

    /// Adds an OR clause. At least one OR clause must match, if any exist.
    pub fn or(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.or_clauses.push(Clause::new(field, op, value));
        self
    }

    /// Adds a NOT clause. No NOT clause may match.
    pub fn not(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.not_clauses.push(Clause::new(field, op, value));
        self
    }

    /// Adds a prebuilt clause to the AND group.
    pub fn and_clause(mut self, clause: Clause) -> Self {
        self.and_clauses.push(clause);
        self
    }

    /// Marks the query as matching nothing.
    ///
    /// Used when a constraint cannot be satisfied by any entity, e.g. a
    /// status label the schema does not know.
    pub fn match_none(mut self) -> Self {
        self.unsatisfiable = true;
        self
    }

    // ========================================================================
    // AND shorthand
    // ========================================================================

    /// Adds an AND equality clause.
    pub fn and_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Eq, value)
    }

    /// Adds an AND not-equal clause.
    pub fn and_ne(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Ne, value)
    }

    /// Adds an AND greater-than clause.
    pub fn and_gt(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Gt, value)
    }

    /// Adds an AND greater-than-or-equal clause.
    pub fn and_gte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Gte, value)
    }

    /// Adds an AND less-than clause.
    pub fn and_lt(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Lt, value)
    }

    /// Adds an AND less-than-or-equal clause.
    pub fn and_lte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Lte, value)
    }

    /// Adds an AND case-insensitive substring clause.
    pub fn and_icontains(self, field: &str, value: &str) -> Self {
        self.and(field, Op::IContains, value)
    }

    /// Adds an AND set-membership clause.
    pub fn and_in<I, S>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: Vec<String> = values.into_iter().map(Into::into).collect();
        self.and(field, Op::In, set)
    }

    /// Adds an AND before clause (timestamp strictly earlier).
    pub fn and_before(self, field: &str, ts: Timestamp) -> Self {
        self.and(field, Op::Before, ts)
    }

    /// Adds an AND after clause (timestamp strictly later).
    pub fn and_after(self, field: &str, ts: Timestamp) -> Self {
        self.and(field, Op::After, ts)
    }

    /// Adds an AND clause requiring the field to be absent.
    pub fn and_is_none(self, field: &str) -> Self {
        self.and_clause(Clause::is_none(field))
    }

    // ========================================================================
    // OR shorthand
    // ========================================================================

    /// Adds an OR equality clause.
    pub fn or_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.or(field, Op::Eq, value)
    }

    /// Adds an OR case-insensitive substring clause.
    pub fn or_icontains(self, field: &str, value: &str) -> Self {
        self.or(field, Op::IContains, value)
    }

    /// Adds an OR case-sensitive substring clause.
    pub fn or_contains(self, field: &str, value: &str) -> Self {
        self.or(field, Op::Contains, value)
    }

    // ========================================================================
    // NOT shorthand
    // ========================================================================

    /// Adds a NOT equality clause.
    pub fn not_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.not(field, Op::Eq, value)
    }

    /// Adds a NOT set-membership clause.
    pub fn not_in<I, S>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: Vec<String> = values.into_iter().map(Into::into).collect();
        self.not(field, Op::In, set)
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Adds an ordering clause.
    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.orderings.push(OrderBy::new(field, order));
        self
    }

    /// Adds an ascending ordering clause.
    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, SortOrder::Asc)
    }

    /// Adds a descending ordering clause.
    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, SortOrder::Desc)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the AND clauses.
    pub fn and_clauses(&self) -> &[Clause] {
        &self.and_clauses
    }

    /// Returns the OR clauses.
    pub fn or_clauses(&self) -> &[Clause] {
        &self.or_clauses
    }

    /// Returns the NOT clauses.
    pub fn not_clauses(&self) -> &[Clause] {
        &self.not_clauses
    }

    /// Returns the ordering clauses.
    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    /// Returns `true` if the query was marked with [`Query::match_none`].
    pub fn is_unsatisfiable(&self) -> bool {
        self.unsatisfiable
    }

    /// Returns `true` if this query has no clauses (matches everything).
    pub fn is_empty(&self) -> bool {
        !self.unsatisfiable
            && self.and_clauses.is_empty()
            && self.or_clauses.is_empty()
            && self.not_clauses.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single item matches this query.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        if self.unsatisfiable {
            return false;
        }

        let and_pass = self
            .and_clauses
            .iter()
            .all(|clause| clause.matches(&accessor(item, &clause.field)));
        if !and_pass {
            return false;
        }

        let or_pass = self.or_clauses.is_empty()
            || self
                .or_clauses
                .iter()
                .any(|clause| clause.matches(&accessor(item, &clause.field)));
        if !or_pass {
            return false;
        }

        self.not_clauses
            .iter()
            .all(|clause| !clause.matches(&accessor(item, &clause.field)))
    }

    /// Filters a slice, returning references to matching items.
    ///
    /// Results are stably sorted by the ordering clauses: items the
    /// orderings consider equal keep their input order.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let mut results: Vec<&'a T> = items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .collect();

        if !self.orderings.is_empty() {
            // slice::sort_by is stable
            results.sort_by(|a, b| compare_by_orderings(*a, *b, &self.orderings, &accessor));
        }

        results
    }

    /// Filters and clones matching items.
    pub fn filter_cloned<T, F>(&self, items: &[T], accessor: F) -> Vec<T>
    where
        T: Clone,
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.filter(items, accessor).into_iter().cloned().collect()
    }

    /// Counts the number of matching items.
    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .count()
    }

    /// Returns `true` if any item matches.
    pub fn any<T, F>(&self, items: &[T], accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items.iter().any(|item| self.matches(item, &accessor))
    }

    /// Returns `true` if all items match (vacuously true when empty).
    pub fn all<T, F>(&self, items: &[T], accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items.iter().all(|item| self.matches(item, &accessor))
    }

    /// Returns the first item in result order, if any.
    pub fn find<'a, T, F>(&self, items: &'a [T], accessor: F) -> Option<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        if self.orderings.is_empty() {
            items.iter().find(|item| self.matches(*item, &accessor))
        } else {
            self.filter(items, accessor).into_iter().next()
        }
    }
}
