//! Field mappings and summary declarations for each list page.

use marquee_query::{
    DashboardConfig, EntitySchema, Facet, ListingConfig, ListingDefaults, Listing, Queryable,
    SortOrder, StatsSpec, TagBinding,
};

use crate::entities::{Category, Feedback, Script, Story, User};
use crate::statistics::names;
use crate::tags::{FeedbackKind, FeedbackStatus, Role, ScriptKind, ScriptStatus, StoryStatus};

/// Days a record counts as "new" on the summary cards.
pub const NEW_WINDOW_DAYS: i64 = 30;

/// Days feedback counts as "recent".
pub const RECENT_FEEDBACK_DAYS: i64 = 7;

/// An entity with its own list page.
pub trait Listable: Queryable + Sized {
    /// Listing name, also the key in [`dashboard`].
    const LISTING: &'static str;

    /// How the page's filters read this entity.
    fn schema() -> EntitySchema;

    /// What the page's summary cards count.
    fn stats() -> StatsSpec;

    /// Initial sort and page size.
    fn defaults() -> ListingDefaults {
        ListingDefaults::default()
    }

    /// Schema, stats and defaults together.
    fn listing_config() -> ListingConfig {
        ListingConfig {
            schema: Self::schema(),
            stats: Self::stats(),
            defaults: Self::defaults(),
        }
    }

    /// An empty listing for this entity on the system clock.
    fn listing() -> Listing<Self> {
        Listing::from_config(&Self::listing_config())
    }
}

impl Listable for User {
    const LISTING: &'static str = "users";

    fn schema() -> EntitySchema {
        EntitySchema::new(Self::LISTING)
            .search([User::NAME, User::EMAIL])
            .facet(Facet::Role, TagBinding::field(User::ROLE))
            .facet(Facet::Status, TagBinding::flag(User::IS_ACTIVE, "active", "inactive"))
            .created_at_field(User::CREATED_AT)
            .last_active_field(User::LAST_ACTIVE)
    }

    fn stats() -> StatsSpec {
        StatsSpec::new()
            .distribution(names::ROLE_DISTRIBUTION, User::ROLE, Role::tags())
            .flag(names::ACTIVE_USERS, User::IS_ACTIVE, true)
            .flag(names::INACTIVE_USERS, User::IS_ACTIVE, false)
            .recent(names::NEW_USERS, User::CREATED_AT, NEW_WINDOW_DAYS)
    }
}

impl Listable for Story {
    const LISTING: &'static str = "stories";

    fn schema() -> EntitySchema {
        EntitySchema::new(Self::LISTING)
            .search([Story::TITLE, Story::DESCRIPTION])
            .facet(Facet::Status, TagBinding::field(Story::STATUS))
            .facet(Facet::Category, TagBinding::field(Story::CATEGORY))
            .created_at_field(Story::CREATED_AT)
            .last_active_field(Story::UPDATED_AT)
    }

    fn stats() -> StatsSpec {
        StatsSpec::new()
            .distribution(names::BY_STATUS, Story::STATUS, StoryStatus::tags())
            .flag(names::FEATURED, Story::FEATURED, true)
            .recent(names::NEW_STORIES, Story::CREATED_AT, NEW_WINDOW_DAYS)
            .numeric(names::VIEWS, Story::VIEWS)
            .numeric(names::LIKES, Story::LIKES)
            .numeric(names::RATING, Story::RATING)
    }
}

impl Listable for Script {
    const LISTING: &'static str = "scripts";

    fn schema() -> EntitySchema {
        EntitySchema::new(Self::LISTING)
            .search([Script::TITLE, Script::AUTHOR])
            .facet(Facet::Type, TagBinding::field(Script::TYPE))
            .facet(Facet::Status, TagBinding::field(Script::STATUS))
            .facet(Facet::Category, TagBinding::field(Script::CATEGORY))
            .created_at_field(Script::CREATED_AT)
            .last_active_field(Script::LAST_EDITED_AT)
    }

    fn stats() -> StatsSpec {
        StatsSpec::new()
            .distribution(names::BY_TYPE, Script::TYPE, ScriptKind::tags())
            .distribution(names::BY_STATUS, Script::STATUS, ScriptStatus::tags())
            .recent(names::NEW_SCRIPTS, Script::CREATED_AT, NEW_WINDOW_DAYS)
            .numeric(names::WORDS, Script::WORD_COUNT)
    }
}

impl Listable for Category {
    const LISTING: &'static str = "categories";

    fn schema() -> EntitySchema {
        EntitySchema::new(Self::LISTING)
            .search([Category::NAME, Category::DESCRIPTION])
            .facet(Facet::Status, TagBinding::flag(Category::IS_ACTIVE, "active", "inactive"))
            .created_at_field(Category::CREATED_AT)
    }

    fn stats() -> StatsSpec {
        StatsSpec::new()
            .flag(names::ACTIVE_CATEGORIES, Category::IS_ACTIVE, true)
            .numeric(names::STORIES, Category::STORY_COUNT)
    }

    fn defaults() -> ListingDefaults {
        ListingDefaults {
            sort_by: Category::NAME.to_string(),
            sort_order: SortOrder::Asc,
            ..ListingDefaults::default()
        }
    }
}

impl Listable for Feedback {
    const LISTING: &'static str = "feedback";

    fn schema() -> EntitySchema {
        EntitySchema::new(Self::LISTING)
            .search([Feedback::SUBJECT, Feedback::MESSAGE, Feedback::EMAIL])
            .facet(Facet::Type, TagBinding::field(Feedback::TYPE))
            .facet(Facet::Status, TagBinding::field(Feedback::STATUS))
            .created_at_field(Feedback::CREATED_AT)
            .last_active_field(Feedback::RESPONDED_AT)
    }

    fn stats() -> StatsSpec {
        StatsSpec::new()
            .distribution(names::BY_TYPE, Feedback::TYPE, FeedbackKind::tags())
            .distribution(names::BY_STATUS, Feedback::STATUS, FeedbackStatus::tags())
            .recent(names::RECENT_FEEDBACK, Feedback::CREATED_AT, RECENT_FEEDBACK_DAYS)
            .numeric(names::RATING, Feedback::RATING)
    }

    fn defaults() -> ListingDefaults {
        ListingDefaults {
            limit: 20,
            ..ListingDefaults::default()
        }
    }
}

/// Every list page of the dashboard.
pub fn dashboard() -> DashboardConfig {
    let listings = [
        (User::LISTING, User::listing_config()),
        (Story::LISTING, Story::listing_config()),
        (Script::LISTING, Script::listing_config()),
        (Category::LISTING, Category::listing_config()),
        (Feedback::LISTING, Feedback::listing_config()),
    ]
    .into_iter()
    .map(|(name, config)| (name.to_string(), config))
    .collect();

    DashboardConfig { listings }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        let dashboard = dashboard();
        assert_eq!(dashboard.listings.len(), 5);
        dashboard.validate().unwrap();
    }

    #[test]
    fn presets_survive_yaml() {
        let dashboard = dashboard();
        let yaml = serde_yaml::to_string(&dashboard).unwrap();
        assert_eq!(DashboardConfig::from_yaml_str(&yaml).unwrap(), dashboard);
    }

    #[test]
    fn category_defaults_sort_by_name() {
        let state = Category::listing_config().default_state();
        assert_eq!(state.sort_by(), "name");
        assert_eq!(state.sort_order(), SortOrder::Asc);
        assert_eq!(Feedback::listing_config().default_state().limit(), 20);
    }

    #[test]
    fn schemas_use_query_names() {
        let users = User::schema();
        assert_eq!(users.search_fields(), ["name", "email"]);
        assert_eq!(users.last_active(), "lastActive");
        assert_eq!(
            Script::schema().binding(Facet::Type),
            Some(&TagBinding::field("type"))
        );
        assert_eq!(Script::schema().last_active(), "lastEditedAt");
    }
}
