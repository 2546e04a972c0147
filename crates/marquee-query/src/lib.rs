//! Marquee query - filtering, sorting and statistics for dashboard listings.
//!
//! Every list page of the media admin dashboard (users, stories, scripts,
//! categories, feedback) works the same way: the backend returns a whole
//! collection, and the page filters, sorts and paginates it in memory while a
//! row of summary cards reports on the full collection. This crate is that
//! machinery, written once and parameterized per entity type:
//!
//! - [`FilterState`]: the active search text, facet filters, date range,
//!   recency window, sort and page
//! - [`EntitySchema`]: which entity fields the search box and each facet read
//! - [`query`]: filter plus stable sort, producing references into the input
//! - [`comparator`]: the ordering used for sorting, reusable on its own
//! - [`summarize`]: counts, distributions and aggregates over a collection
//! - [`FilterStore`]: field-scoped updates with synchronous subscribers
//! - [`Listing`]: all of the above bound to one collection snapshot
//!
//! # Quick Start
//!
//! ```rust
//! use chrono::{DateTime, Duration, TimeZone, Utc};
//! use marquee_query::{
//!     query, summarize, EntitySchema, Facet, FilterState, Queryable, StatsSpec, TagBinding,
//!     Value,
//! };
//!
//! struct User {
//!     name: String,
//!     role: &'static str,
//!     active: bool,
//!     created_at: DateTime<Utc>,
//! }
//!
//! impl Queryable for User {
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "name" => Value::String(&self.name),
//!             "role" => Value::Tag(self.role),
//!             "isActive" => Value::Bool(self.active),
//!             "createdAt" => Value::Timestamp(self.created_at.into()),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let users = vec![
//!     User { name: "Ada".into(), role: "admin", active: true, created_at: now - Duration::days(90) },
//!     User { name: "Bob".into(), role: "user", active: false, created_at: now - Duration::days(60) },
//! ];
//!
//! let schema = EntitySchema::new("users")
//!     .search(["name"])
//!     .facet(Facet::Role, TagBinding::field("role"))
//!     .facet(Facet::Status, TagBinding::flag("isActive", "active", "inactive"));
//!
//! let state = FilterState::default().with_status("active");
//! let rows = query(&users, &state, &schema, now);
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].name, "Ada");
//!
//! let spec = StatsSpec::new()
//!     .distribution("roleDistribution", "role", ["admin", "user"])
//!     .flag("activeUsers", "isActive", true)
//!     .recent("newUsers", "createdAt", 30);
//! let summary = summarize(&users, &spec, now);
//! assert_eq!(summary.total, 2);
//! assert_eq!(summary.bucket("roleDistribution", "admin"), 1);
//! assert_eq!(summary.count("activeUsers"), 1);
//! assert_eq!(summary.count("newUsers"), 0);
//! ```
//!
//! # Filter Semantics
//!
//! An entity passes when every active filter passes:
//!
//! ```text
//! match = search matches some search field (case-insensitive substring)
//!       ∧ each set facet equals the bound field
//!       ∧ dateFrom <= createdAt <= dateTo
//!       ∧ lastActive within the recency window (or absent, for `never`)
//! ```
//!
//! A facet value that no entity can carry matches nothing; it never clears
//! the filter. Internally a state compiles to a [`Query`] of clause groups:
//!
//! - **AND group**: All clauses must match (empty = trivially satisfied)
//! - **OR group**: At least one must match (empty = trivially satisfied)
//! - **NOT group**: None may match (empty = trivially satisfied)
//!
//! # Field Types and Operators
//!
//! | Type | Operators |
//! |------|-----------|
//! | String | `Eq`, `Ne`, `StartsWith`, `EndsWith`, `Contains`, `IContains`, `In` |
//! | Tag | `Eq`, `Ne`, `In` |
//! | Number | `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte` |
//! | Timestamp | `Eq`, `Ne`, `Before`, `After`, `Gt`, `Gte`, `Lt`, `Lte` |
//! | Bool | `Eq`, `Ne`, `Is` |
//! | any | `IsNone` |
//!
//! # Sorting
//!
//! Sorting is stable. Text compares case-insensitively, numbers across
//! integer and float kinds, and a missing value sorts before any present one
//! (so last in descending order).

mod clause;
mod clock;
mod config;
mod engine;
mod error;
mod filter;
mod listing;
mod op;
mod ordering;
mod paging;
mod query;
mod schema;
mod stats;
mod store;
mod traits;
mod value;

// Re-export public API
pub use clause::{Clause, ClauseValue};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{DashboardConfig, ListingConfig, ListingDefaults};
pub use engine::{compile, matches, query, since_clause, QueryEngine};
pub use error::{ConfigError, Result};
pub use filter::{
    Constraint, Facet, FilterState, LastActive, DEFAULT_LIMIT, DEFAULT_SORT_BY,
    DEFAULT_SORT_ORDER,
};
pub use listing::Listing;
pub use op::Op;
pub use ordering::{compare_values, comparator, OrderBy, SortOrder};
pub use paging::{paginate, Page};
pub use query::Query;
pub use schema::{EntitySchema, TagBinding};
pub use stats::{
    percentage, summarize, DistributionSpec, FlagSpec, NumericAggregate, NumericSpec, RecentSpec,
    StatisticsSummary, StatsSpec, MAX_RECENT_DAYS,
};
pub use store::{FilterStore, SubscriptionId};
pub use traits::{AsTimestamp, Queryable, Tagged};
pub use value::{Number, Timestamp, Value};
