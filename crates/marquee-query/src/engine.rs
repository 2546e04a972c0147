//! Collection query engine.
//!
//! Compiles a [`FilterState`] against an [`EntitySchema`] into a [`Query`]
//! and runs it over an in-memory collection. `now` is an argument, read once
//! by the caller, so recency windows are consistent across a pass.
//!
//! Per entity, every active filter must pass:
//!
//! 1. search: lowercase substring in at least one search field
//! 2. facets: exact equality on the bound field
//! 3. date range: inclusive bounds on the creation timestamp
//! 4. recency: last activity at or after `now - window`, or absent for `never`
//!
//! The result is stably sorted by `sortBy` / `sortOrder`. Pagination is not
//! applied here; see [`paginate`](crate::paginate).

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::clause::Clause;
use crate::clock::Clock;
use crate::filter::{Facet, FilterState, LastActive};
use crate::op::Op;
use crate::query::Query;
use crate::schema::{EntitySchema, TagBinding};
use crate::traits::Queryable;
use crate::value::Timestamp;

/// Clause passing entities whose `field` is at or after `threshold`.
///
/// Shared by the recency filter and the "recent" statistics counts.
pub fn since_clause(field: &str, threshold: DateTime<Utc>) -> Clause {
    Clause::new(field, Op::Gte, Timestamp::from(threshold))
}

/// Compiles a filter state into a query.
pub fn compile(state: &FilterState, schema: &EntitySchema, now: DateTime<Utc>) -> Query {
    let mut query = Query::new();

    if !state.search().is_empty() {
        if schema.search_fields().is_empty() {
            query = query.match_none();
        }
        for field in schema.search_fields() {
            query = query.or_icontains(field, state.search());
        }
    }

    for facet in Facet::ALL {
        let Some(wanted) = state.facet(facet).value() else {
            continue;
        };
        query = match schema.binding(facet) {
            Some(TagBinding::Field { field }) => query.and_eq(field, wanted),
            Some(TagBinding::Flag { field, on, off }) => {
                if wanted == on.as_str() {
                    query.and_eq(field, true)
                } else if wanted == off.as_str() {
                    query.and_eq(field, false)
                } else {
                    query.match_none()
                }
            }
            None => query.match_none(),
        };
    }

    if let Some(from) = state.date_from() {
        query = query.and_gte(schema.created_at(), Timestamp::from(from));
    }
    if let Some(to) = state.date_to() {
        query = query.and_lte(schema.created_at(), Timestamp::from(to));
    }

    match state.last_active() {
        LastActive::All => {}
        LastActive::Never => query = query.and_is_none(schema.last_active()),
        window => {
            if let Some(threshold) = window.threshold(now) {
                query = query.and_clause(since_clause(schema.last_active(), threshold));
            }
        }
    }

    query.order_by(state.sort_by(), state.sort_order())
}

/// Tests one entity against a filter state.
pub fn matches<T: Queryable>(
    entity: &T,
    state: &FilterState,
    schema: &EntitySchema,
    now: DateTime<Utc>,
) -> bool {
    compile(state, schema, now).matches(entity, T::accessor)
}

/// Filters and sorts a collection. The input is left untouched.
#[instrument(skip_all, fields(listing = schema.name(), total = entities.len()))]
pub fn query<'a, T: Queryable>(
    entities: &'a [T],
    state: &FilterState,
    schema: &EntitySchema,
    now: DateTime<Utc>,
) -> Vec<&'a T> {
    let compiled = compile(state, schema, now);
    let rows = compiled.filter(entities, T::accessor);
    debug!(matched = rows.len(), sort_by = state.sort_by(), "listing query evaluated");
    rows
}

/// A schema bundled with a clock.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use marquee_query::{EntitySchema, FilterState, FixedClock, QueryEngine, Queryable, Value};
///
/// struct Tag(&'static str);
///
/// impl Queryable for Tag {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(self.0),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
/// let engine = QueryEngine::new(EntitySchema::new("tags").search(["name"]), FixedClock(now));
/// let tags = [Tag("drama"), Tag("comedy"), Tag("docudrama")];
///
/// let rows = engine.query(&tags, &FilterState::default().with_search("DRAMA"));
/// assert_eq!(rows.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct QueryEngine<C> {
    schema: EntitySchema,
    clock: C,
}

impl<C: Clock> QueryEngine<C> {
    /// Creates an engine for one entity type.
    pub fn new(schema: EntitySchema, clock: C) -> Self {
        QueryEngine { schema, clock }
    }

    /// The field mapping.
    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    /// Compiles a state against this engine's schema at the clock's `now`.
    pub fn compile(&self, state: &FilterState) -> Query {
        compile(state, &self.schema, self.clock.now())
    }

    /// Tests one entity.
    pub fn matches<T: Queryable>(&self, entity: &T, state: &FilterState) -> bool {
        matches(entity, state, &self.schema, self.clock.now())
    }

    /// Filters and sorts a collection.
    pub fn query<'a, T: Queryable>(&self, entities: &'a [T], state: &FilterState) -> Vec<&'a T> {
        query(entities, state, &self.schema, self.clock.now())
    }
}
