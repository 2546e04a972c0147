//! The active query of a list page.
//!
//! [`FilterState`] is one immutable record holding every filter, sort and
//! pagination parameter. Each `with_*` method returns a new state with
//! exactly one field replaced, so the engine never observes a half-applied
//! update.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::ordering::SortOrder;

/// Default sort field for every listing.
pub const DEFAULT_SORT_BY: &str = "createdAt";
/// Default sort direction (newest first).
pub const DEFAULT_SORT_ORDER: SortOrder = SortOrder::Desc;
/// Default page size.
pub const DEFAULT_LIMIT: usize = 10;

/// External spelling of [`Constraint::Any`].
const ANY_SENTINEL: &str = "all";

/// A categorical filter value.
///
/// The UI and REST query strings spell "no constraint" as `"all"`; inside
/// the library it is a separate variant, so `Equals("all")` stays
/// constructible for a category that happens to be named "all".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Constraint {
    /// No constraint.
    #[default]
    Any,
    /// The field must equal this value exactly.
    Equals(String),
}

impl Constraint {
    /// Parses the external representation: `"all"` is [`Constraint::Any`].
    pub fn parse(raw: &str) -> Self {
        if raw == ANY_SENTINEL {
            Constraint::Any
        } else {
            Constraint::Equals(raw.to_string())
        }
    }

    /// Builds an equality constraint without sentinel parsing.
    pub fn equals(value: impl Into<String>) -> Self {
        Constraint::Equals(value.into())
    }

    /// Returns `true` if this constraint filters nothing.
    pub fn is_any(&self) -> bool {
        matches!(self, Constraint::Any)
    }

    /// Returns the required value, if constrained.
    pub fn value(&self) -> Option<&str> {
        match self {
            Constraint::Any => None,
            Constraint::Equals(v) => Some(v),
        }
    }

    /// The external representation.
    pub fn as_external(&self) -> &str {
        self.value().unwrap_or(ANY_SENTINEL)
    }
}

impl From<&str> for Constraint {
    fn from(raw: &str) -> Self {
        Constraint::parse(raw)
    }
}

impl From<String> for Constraint {
    fn from(raw: String) -> Self {
        if raw == ANY_SENTINEL {
            Constraint::Any
        } else {
            Constraint::Equals(raw)
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_external())
    }
}

impl Serialize for Constraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_external())
    }
}

impl<'de> Deserialize<'de> for Constraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ConstraintVisitor;

        impl Visitor<'_> for ConstraintVisitor {
            type Value = Constraint;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a category value or \"all\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Constraint, E> {
                Ok(Constraint::parse(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Constraint, E> {
                Ok(Constraint::Any)
            }

            fn visit_none<E: de::Error>(self) -> Result<Constraint, E> {
                Ok(Constraint::Any)
            }
        }

        deserializer.deserialize_any(ConstraintVisitor)
    }
}

/// Recency window over an entity's last-activity timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LastActive {
    /// No constraint.
    #[default]
    All,
    /// Active within the last day.
    Today,
    /// Active within the last 7 days.
    ThisWeek,
    /// Active within the last 30 days.
    ThisMonth,
    /// Never active (no last-activity timestamp).
    Never,
}

impl LastActive {
    /// Window length for the bounded variants.
    pub fn window(self) -> Option<Duration> {
        match self {
            LastActive::Today => Some(Duration::days(1)),
            LastActive::ThisWeek => Some(Duration::days(7)),
            LastActive::ThisMonth => Some(Duration::days(30)),
            LastActive::All | LastActive::Never => None,
        }
    }

    /// Earliest last-activity instant that passes, relative to `now`.
    pub fn threshold(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.window()
            .map(|window| now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC))
    }
}

/// The categorical filters a FilterState carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    /// User role.
    Role,
    /// Entity type (script kind, feedback kind).
    Type,
    /// Lifecycle status.
    Status,
    /// Category name.
    Category,
}

impl Facet {
    /// Every facet, in evaluation order.
    pub const ALL: [Facet; 4] = [Facet::Role, Facet::Type, Facet::Status, Facet::Category];

    /// The external field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Facet::Role => "role",
            Facet::Type => "type",
            Facet::Status => "status",
            Facet::Category => "category",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full set of active query parameters for one list page.
///
/// ```
/// use marquee_query::{Constraint, FilterState, LastActive, SortOrder};
///
/// let state = FilterState::default()
///     .with_search("ada")
///     .with_role("admin")
///     .with_last_active(LastActive::ThisWeek);
///
/// assert_eq!(state.search(), "ada");
/// assert_eq!(state.role(), &Constraint::equals("admin"));
/// assert_eq!(state.status(), &Constraint::Any);
/// assert_eq!(state.sort_order(), SortOrder::Desc);
/// assert_eq!(state.page(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    search: String,
    role: Constraint,
    #[serde(rename = "type")]
    kind: Constraint,
    status: Constraint,
    category: Constraint,
    date_from: Option<DateTime<Utc>>,
    date_to: Option<DateTime<Utc>>,
    last_active: LastActive,
    sort_by: String,
    sort_order: SortOrder,
    page: usize,
    limit: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            search: String::new(),
            role: Constraint::Any,
            kind: Constraint::Any,
            status: Constraint::Any,
            category: Constraint::Any,
            date_from: None,
            date_to: None,
            last_active: LastActive::All,
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_order: DEFAULT_SORT_ORDER,
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl FilterState {
    /// The documented defaults.
    pub fn new() -> Self {
        FilterState::default()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Free-text search; empty means unconstrained.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Role constraint.
    pub fn role(&self) -> &Constraint {
        &self.role
    }

    /// Type constraint.
    pub fn kind(&self) -> &Constraint {
        &self.kind
    }

    /// Status constraint.
    pub fn status(&self) -> &Constraint {
        &self.status
    }

    /// Category constraint.
    pub fn category(&self) -> &Constraint {
        &self.category
    }

    /// Constraint for any facet.
    pub fn facet(&self, facet: Facet) -> &Constraint {
        match facet {
            Facet::Role => &self.role,
            Facet::Type => &self.kind,
            Facet::Status => &self.status,
            Facet::Category => &self.category,
        }
    }

    /// Inclusive lower bound on creation time.
    pub fn date_from(&self) -> Option<DateTime<Utc>> {
        self.date_from
    }

    /// Inclusive upper bound on creation time.
    pub fn date_to(&self) -> Option<DateTime<Utc>> {
        self.date_to
    }

    /// Recency window.
    pub fn last_active(&self) -> LastActive {
        self.last_active
    }

    /// Sort field.
    pub fn sort_by(&self) -> &str {
        &self.sort_by
    }

    /// Sort direction.
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// One-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Page size.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns `true` if no filter narrows the collection.
    ///
    /// Sorting and pagination are not filters.
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty()
            && Facet::ALL.iter().all(|f| self.facet(*f).is_any())
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.last_active == LastActive::All
    }

    // ------------------------------------------------------------------
    // Field-scoped updates
    // ------------------------------------------------------------------

    /// Replaces the search text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Replaces the role constraint.
    pub fn with_role(self, role: impl Into<Constraint>) -> Self {
        self.with_facet(Facet::Role, role)
    }

    /// Replaces the type constraint.
    pub fn with_kind(self, kind: impl Into<Constraint>) -> Self {
        self.with_facet(Facet::Type, kind)
    }

    /// Replaces the status constraint.
    pub fn with_status(self, status: impl Into<Constraint>) -> Self {
        self.with_facet(Facet::Status, status)
    }

    /// Replaces the category constraint.
    pub fn with_category(self, category: impl Into<Constraint>) -> Self {
        self.with_facet(Facet::Category, category)
    }

    /// Replaces one facet constraint.
    pub fn with_facet(mut self, facet: Facet, constraint: impl Into<Constraint>) -> Self {
        let constraint = constraint.into();
        match facet {
            Facet::Role => self.role = constraint,
            Facet::Type => self.kind = constraint,
            Facet::Status => self.status = constraint,
            Facet::Category => self.category = constraint,
        }
        self
    }

    /// Replaces both creation-date bounds.
    pub fn with_date_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Replaces the lower creation-date bound.
    pub fn with_date_from(mut self, from: Option<DateTime<Utc>>) -> Self {
        self.date_from = from;
        self
    }

    /// Replaces the upper creation-date bound.
    pub fn with_date_to(mut self, to: Option<DateTime<Utc>>) -> Self {
        self.date_to = to;
        self
    }

    /// Replaces the recency window.
    pub fn with_last_active(mut self, last_active: LastActive) -> Self {
        self.last_active = last_active;
        self
    }

    /// Replaces the sort field and direction together.
    pub fn with_sorting(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = sort_by.into();
        self.sort_order = order;
        self
    }

    /// Replaces the sort field.
    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }

    /// Replaces the sort direction.
    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Replaces the page number.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Replaces the page size.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}
