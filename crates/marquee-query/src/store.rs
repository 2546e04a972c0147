//! Filter state store.
//!
//! Owns the [`FilterState`] of one list page. UI handlers call one mutator
//! per field; each replaces that field only, bumps the revision, and notifies
//! subscribers synchronously before returning.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::filter::{Constraint, Facet, FilterState, LastActive};
use crate::ordering::SortOrder;

/// Handle returned by [`FilterStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&FilterState)>;

/// Holds the active filter state and its subscribers.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use marquee_query::{FilterStore, LastActive};
///
/// let mut store = FilterStore::new();
/// let seen = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&seen);
/// store.subscribe(move |_| counter.set(counter.get() + 1));
///
/// store.set_search("night");
/// store.set_last_active(LastActive::Today);
/// assert_eq!(seen.get(), 2);
///
/// store.reset();
/// assert_eq!(store.state().search(), "");
/// ```
pub struct FilterStore {
    state: FilterState,
    defaults: FilterState,
    revision: u64,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Default for FilterStore {
    fn default() -> Self {
        FilterStore::new()
    }
}

impl fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStore")
            .field("state", &self.state)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl FilterStore {
    /// A store initialized with the documented defaults.
    pub fn new() -> Self {
        FilterStore::with_defaults(FilterState::default())
    }

    /// A store whose initial and reset state is `defaults`.
    pub fn with_defaults(defaults: FilterState) -> Self {
        FilterStore {
            state: defaults.clone(),
            defaults,
            revision: 0,
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// The current state.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// The state `reset` restores.
    pub fn defaults(&self) -> &FilterState {
        &self.defaults
    }

    /// Number of mutations applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a listener called with the new state after every mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&FilterState) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn update(&mut self, field: &'static str, apply: impl FnOnce(FilterState) -> FilterState) {
        let current = std::mem::take(&mut self.state);
        self.state = apply(current);
        self.revision += 1;
        debug!(field, revision = self.revision, "filter state updated");
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }

    /// Sets the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        self.update("search", |s| s.with_search(search));
    }

    /// Sets the role filter (`"all"` clears it).
    pub fn set_role(&mut self, role: impl Into<Constraint>) {
        self.set_facet(Facet::Role, role);
    }

    /// Sets the type filter (`"all"` clears it).
    pub fn set_type(&mut self, kind: impl Into<Constraint>) {
        self.set_facet(Facet::Type, kind);
    }

    /// Sets the status filter (`"all"` clears it).
    pub fn set_status(&mut self, status: impl Into<Constraint>) {
        self.set_facet(Facet::Status, status);
    }

    /// Sets the category filter (`"all"` clears it).
    pub fn set_category(&mut self, category: impl Into<Constraint>) {
        self.set_facet(Facet::Category, category);
    }

    /// Sets any facet filter.
    pub fn set_facet(&mut self, facet: Facet, constraint: impl Into<Constraint>) {
        let constraint = constraint.into();
        self.update(facet.as_str(), |s| s.with_facet(facet, constraint));
    }

    /// Sets both creation-date bounds.
    pub fn set_date_range(&mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) {
        self.update("dateRange", |s| s.with_date_range(from, to));
    }

    /// Sets the lower creation-date bound.
    pub fn set_date_from(&mut self, from: Option<DateTime<Utc>>) {
        self.update("dateFrom", |s| s.with_date_from(from));
    }

    /// Sets the upper creation-date bound.
    pub fn set_date_to(&mut self, to: Option<DateTime<Utc>>) {
        self.update("dateTo", |s| s.with_date_to(to));
    }

    /// Sets the recency window.
    pub fn set_last_active(&mut self, last_active: LastActive) {
        self.update("lastActive", |s| s.with_last_active(last_active));
    }

    /// Sets sort field and direction together.
    pub fn set_sorting(&mut self, sort_by: impl Into<String>, order: SortOrder) {
        let sort_by = sort_by.into();
        self.update("sorting", |s| s.with_sorting(sort_by, order));
    }

    /// Sets the sort field.
    pub fn set_sort_by(&mut self, sort_by: impl Into<String>) {
        let sort_by = sort_by.into();
        self.update("sortBy", |s| s.with_sort_by(sort_by));
    }

    /// Sets the sort direction.
    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.update("sortOrder", |s| s.with_sort_order(order));
    }

    /// Sets the page number.
    pub fn set_page(&mut self, page: usize) {
        self.update("page", |s| s.with_page(page));
    }

    /// Sets the page size.
    pub fn set_limit(&mut self, limit: usize) {
        self.update("limit", |s| s.with_limit(limit));
    }

    /// Restores every field to the store's defaults.
    pub fn reset(&mut self) {
        let defaults = self.defaults.clone();
        self.update("reset", |_| defaults);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::TimeZone;

    use super::*;

    fn recording_store() -> (FilterStore, Rc<RefCell<Vec<FilterState>>>) {
        let mut store = FilterStore::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        store.subscribe(move |state| sink.borrow_mut().push(state.clone()));
        (store, log)
    }

    #[test]
    fn mutators_replace_one_field() {
        let (mut store, _) = recording_store();
        store.set_search("ada");
        store.set_page(4);
        store.set_role("admin");

        let expected = FilterState::default()
            .with_search("ada")
            .with_page(4)
            .with_role("admin");
        assert_eq!(store.state(), &expected);
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn listeners_see_the_new_state_synchronously() {
        let (mut store, log) = recording_store();
        store.set_status("active");
        store.set_sort_order(SortOrder::Asc);

        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].status(), &Constraint::equals("active"));
        assert_eq!(log[0].sort_order(), SortOrder::Desc);
        assert_eq!(log[1].sort_order(), SortOrder::Asc);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = FilterStore::new();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.set_limit(25);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_limit(50);

        assert_eq!(*hits.borrow(), 1);
        assert_eq!(store.state().limit(), 50);
    }

    #[test]
    fn reset_restores_defaults_and_notifies() {
        let (mut store, log) = recording_store();
        store.set_type("movie");
        store.set_category("drama");
        store.set_last_active(LastActive::Never);
        store.reset();

        assert_eq!(store.state(), &FilterState::default());
        assert_eq!(log.borrow().len(), 4);
        assert_eq!(log.borrow()[3], FilterState::default());
    }

    #[test]
    fn custom_defaults_survive_reset() {
        let defaults = FilterState::default().with_sorting("title", SortOrder::Asc).with_limit(25);
        let mut store = FilterStore::with_defaults(defaults.clone());
        assert_eq!(store.state(), &defaults);

        store.set_sort_by("views");
        store.reset();
        assert_eq!(store.state(), &defaults);
        assert_eq!(store.defaults(), &defaults);
    }

    #[test]
    fn date_setters() {
        let (mut store, _) = recording_store();
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();

        store.set_date_range(Some(from), Some(to));
        assert_eq!((store.state().date_from(), store.state().date_to()), (Some(from), Some(to)));

        store.set_date_from(None);
        assert_eq!((store.state().date_from(), store.state().date_to()), (None, Some(to)));

        store.set_date_to(None);
        assert!(store.state().is_unfiltered());
    }

    #[test]
    fn sorting_and_all_sentinel() {
        let (mut store, _) = recording_store();
        store.set_sorting("title", SortOrder::Asc);
        assert_eq!(store.state().sort_by(), "title");
        store.set_role("editor");
        store.set_role("all");
        assert!(store.state().role().is_any());
        store.set_facet(Facet::Status, Constraint::equals("all"));
        assert_eq!(store.state().status().value(), Some("all"));
    }
}
