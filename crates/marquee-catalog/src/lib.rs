//! Marquee catalog - the media dashboard's listable entities.
//!
//! Concrete types for every list page of the admin dashboard, wired to
//! `marquee-query`:
//!
//! - [`entities`]: `User`, `Story`, `Script`, `Category`, `Feedback`, shaped
//!   like the REST payloads and deriving [`Queryable`](marquee_query::Queryable)
//! - [`tags`]: the closed categorical sets (roles, statuses, types)
//! - [`presets`]: each entity's field mapping, summary declaration and
//!   default sort, plus the whole [`dashboard`] configuration
//! - [`statistics`]: typed summary-card records
//!
//! # Example
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use marquee_catalog::{Listable, Role, User, UserStatistics};
//! use marquee_query::FixedClock;
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let user = |name: &str, role, active| User {
//!     id: name.to_lowercase(),
//!     name: name.to_string(),
//!     email: format!("{}@studio.tv", name.to_lowercase()),
//!     role,
//!     is_active: active,
//!     created_at: now - Duration::days(90),
//!     last_active: None,
//!     avatar: None,
//! };
//!
//! let mut listing = User::listing().with_clock(FixedClock(now));
//! listing.replace(vec![user("Ada", Role::Admin, true), user("Bob", Role::User, false)]);
//! listing.store_mut().set_status("active");
//!
//! assert_eq!(listing.showing(), (1, 2));
//!
//! let cards = UserStatistics::from_summary(&listing.summary());
//! assert_eq!(cards.total_users, 2);
//! assert_eq!(cards.active_users, 1);
//! ```

pub mod entities;
pub mod presets;
pub mod statistics;
pub mod tags;

pub use entities::{Category, Feedback, Script, Story, User};
pub use presets::{dashboard, Listable, NEW_WINDOW_DAYS, RECENT_FEEDBACK_DAYS};
pub use statistics::{
    CategoryStatistics, FeedbackStatistics, ScriptStatistics, StoryStatistics, UserStatistics,
};
pub use tags::{
    FeedbackKind, FeedbackStatus, Role, ScriptKind, ScriptStatus, StoryStatus, UnknownTag,
};
