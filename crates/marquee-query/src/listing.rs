//! One list page: filter store, collection snapshot, rows and summary.
//!
//! A [`Listing`] keeps the last collection the backend returned. A failed
//! fetch is logged and dropped, so the rows and summary keep showing the
//! previous snapshot and the filter state is never touched by I/O.

use std::fmt;

use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ListingConfig;
use crate::engine;
use crate::paging::{paginate, Page};
use crate::schema::EntitySchema;
use crate::stats::{summarize, StatisticsSummary, StatsSpec};
use crate::store::FilterStore;
use crate::traits::Queryable;

/// Filter state, schema and snapshot for one entity type.
///
/// ```
/// use marquee_query::{EntitySchema, Listing, Queryable, StatsSpec, Value};
///
/// #[derive(Clone)]
/// struct Category(&'static str);
///
/// impl Queryable for Category {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(self.0),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let mut listing = Listing::new(EntitySchema::new("categories").search(["name"]), StatsSpec::new());
/// listing.replace(vec![Category("Drama"), Category("Comedy")]);
/// listing.store_mut().set_search("com");
///
/// assert_eq!(listing.showing(), (1, 2));
/// assert_eq!(listing.summary().total, 2);
/// ```
pub struct Listing<T> {
    schema: EntitySchema,
    stats: StatsSpec,
    store: FilterStore,
    clock: Box<dyn Clock>,
    items: Vec<T>,
}

impl<T> fmt::Debug for Listing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listing")
            .field("schema", &self.schema.name())
            .field("store", &self.store)
            .field("items", &self.items.len())
            .finish()
    }
}

impl<T: Queryable> Listing<T> {
    /// An empty listing on the system clock with default filter state.
    pub fn new(schema: EntitySchema, stats: StatsSpec) -> Self {
        Listing {
            schema,
            stats,
            store: FilterStore::new(),
            clock: Box::new(SystemClock),
            items: Vec::new(),
        }
    }

    /// An empty listing whose store starts from the configured defaults.
    pub fn from_config(config: &ListingConfig) -> Self {
        Listing {
            store: FilterStore::with_defaults(config.default_state()),
            ..Listing::new(config.schema.clone(), config.stats.clone())
        }
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The field mapping.
    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    /// The summary declaration.
    pub fn stats(&self) -> &StatsSpec {
        &self.stats
    }

    /// The current snapshot.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The filter store.
    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    /// The filter store, for UI handlers.
    pub fn store_mut(&mut self) -> &mut FilterStore {
        &mut self.store
    }

    /// Swaps in a new snapshot.
    pub fn replace(&mut self, items: Vec<T>) {
        debug!(listing = self.schema.name(), items = items.len(), "snapshot replaced");
        self.items = items;
    }

    /// Applies a fetch result. On error the previous snapshot is kept.
    ///
    /// Returns whether the snapshot changed.
    pub fn apply<E: fmt::Display>(&mut self, result: Result<Vec<T>, E>) -> bool {
        match result {
            Ok(items) => {
                self.replace(items);
                true
            }
            Err(err) => {
                warn!(
                    listing = self.schema.name(),
                    kept = self.items.len(),
                    error = %err,
                    "fetch failed, keeping previous snapshot"
                );
                false
            }
        }
    }

    /// Filtered, sorted rows for the current state.
    pub fn rows(&self) -> Vec<&T> {
        engine::query(&self.items, self.store.state(), &self.schema, self.clock.now())
    }

    /// The current page of filtered rows.
    pub fn page(&self) -> Page<&T> {
        let state = self.store.state();
        paginate(&self.rows(), state.page(), state.limit())
    }

    /// `(filtered, total)` for a "showing N of M" caption.
    pub fn showing(&self) -> (usize, usize) {
        (self.rows().len(), self.items.len())
    }

    /// Statistics over the whole snapshot, ignoring the filter state.
    pub fn summary(&self) -> StatisticsSummary {
        summarize(&self.items, &self.stats, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::clock::FixedClock;
    use crate::filter::{Facet, LastActive};
    use crate::ordering::SortOrder;
    use crate::schema::TagBinding;
    use crate::value::Value;

    #[derive(Debug, Clone, PartialEq)]
    struct Script {
        title: String,
        kind: &'static str,
        created_at: DateTime<Utc>,
        last_edited: Option<DateTime<Utc>>,
    }

    impl Queryable for Script {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "title" => Value::String(&self.title),
                "type" => Value::Tag(self.kind),
                "createdAt" => Value::Timestamp(self.created_at.into()),
                "lastEditedAt" => self
                    .last_edited
                    .map_or(Value::None, |at| Value::Timestamp(at.into())),
                _ => Value::None,
            }
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
    }

    fn scripts(n: i64) -> Vec<Script> {
        (0..n)
            .map(|i| Script {
                title: format!("Script {i:02}"),
                kind: if i % 2 == 0 { "movie" } else { "series" },
                created_at: now() - Duration::days(i),
                last_edited: (i % 3 == 0).then(|| now() - Duration::hours(i)),
            })
            .collect()
    }

    fn listing() -> Listing<Script> {
        let schema = EntitySchema::new("scripts")
            .search(["title"])
            .facet(Facet::Type, TagBinding::field("type"))
            .last_active_field("lastEditedAt");
        let stats = StatsSpec::new().distribution("byType", "type", ["movie", "series"]);
        Listing::new(schema, stats).with_clock(FixedClock(now()))
    }

    #[test]
    fn rows_follow_the_store() {
        let mut listing = listing();
        listing.replace(scripts(6));
        listing.store_mut().set_type("series");
        listing.store_mut().set_sorting("title", SortOrder::Asc);

        let titles: Vec<&str> = listing.rows().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Script 01", "Script 03", "Script 05"]);
        assert_eq!(listing.showing(), (3, 6));
    }

    #[test]
    fn page_uses_state_window() {
        let mut listing = listing();
        listing.replace(scripts(25));
        listing.store_mut().set_page(3);

        let page = listing.page();
        assert_eq!(page.len(), 5);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items[0].title, "Script 20");
    }

    #[test]
    fn failed_fetch_keeps_snapshot_and_state() {
        let mut listing = listing();
        assert!(listing.apply(Ok::<_, String>(scripts(4))));
        listing.store_mut().set_last_active(LastActive::Today);
        let before = listing.store().state().clone();

        assert!(!listing.apply(Err("connection reset")));
        assert_eq!(listing.items().len(), 4);
        assert_eq!(listing.store().state(), &before);
        assert_eq!(listing.summary().bucket("byType", "movie"), 2);
        assert_eq!(listing.showing(), (2, 4));
    }

    #[test]
    fn summary_ignores_filters() {
        let mut listing = listing();
        listing.replace(scripts(5));
        listing.store_mut().set_search("no such title");

        assert!(listing.rows().is_empty());
        let summary = listing.summary();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.bucket("byType", "movie"), 3);
        assert_eq!(summary.bucket("byType", "series"), 2);
    }

    #[test]
    fn built_from_config() {
        let config = ListingConfig {
            defaults: crate::config::ListingDefaults {
                sort_by: "title".into(),
                sort_order: SortOrder::Asc,
                limit: 2,
            },
            ..ListingConfig::new(EntitySchema::new("scripts").search(["title"]), StatsSpec::new())
        };
        let mut listing: Listing<Script> = Listing::from_config(&config).with_clock(FixedClock(now()));
        listing.replace(scripts(3));

        let page = listing.page();
        assert_eq!(page.items.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(), ["Script 00", "Script 01"]);
        assert!(page.has_next);

        listing.store_mut().set_limit(50);
        listing.store_mut().reset();
        assert_eq!(listing.store().state().limit(), 2);
        assert_eq!(listing.schema().name(), "scripts");
        assert!(listing.stats().names().next().is_none());
    }
}
