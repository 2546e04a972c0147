//! Typed summary-card records.
//!
//! Each record is read out of a [`StatisticsSummary`] computed with the
//! entity's preset [`StatsSpec`](marquee_query::StatsSpec), over the whole
//! collection regardless of the page's filters.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use marquee_query::{summarize, StatisticsSummary};
use serde::Serialize;

use crate::entities::{Category, Feedback, Script, Story, User};
use crate::presets::Listable;
use crate::tags::{FeedbackStatus, StoryStatus};

/// Statistic names used by the presets.
pub mod names {
    /// Users per role.
    pub const ROLE_DISTRIBUTION: &str = "roleDistribution";
    /// Users with `isActive` set.
    pub const ACTIVE_USERS: &str = "activeUsers";
    /// Users with `isActive` cleared.
    pub const INACTIVE_USERS: &str = "inactiveUsers";
    /// Users created within the new window.
    pub const NEW_USERS: &str = "newUsers";

    /// Records per status.
    pub const BY_STATUS: &str = "byStatus";
    /// Records per type.
    pub const BY_TYPE: &str = "byType";
    /// Featured stories.
    pub const FEATURED: &str = "featured";
    /// Stories created within the new window.
    pub const NEW_STORIES: &str = "newStories";
    /// Story views.
    pub const VIEWS: &str = "views";
    /// Story likes.
    pub const LIKES: &str = "likes";
    /// Story or feedback rating.
    pub const RATING: &str = "rating";

    /// Scripts created within the new window.
    pub const NEW_SCRIPTS: &str = "newScripts";
    /// Script word counts.
    pub const WORDS: &str = "words";

    /// Categories with `isActive` set.
    pub const ACTIVE_CATEGORIES: &str = "activeCategories";
    /// Stories per category.
    pub const STORIES: &str = "stories";

    /// Feedback within the recent window.
    pub const RECENT_FEEDBACK: &str = "recentFeedback";
}

fn whole(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

/// Users page cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    /// All users.
    pub total_users: usize,
    /// Users with `isActive` set.
    pub active_users: usize,
    /// Users with `isActive` cleared.
    pub inactive_users: usize,
    /// Users created in the last 30 days.
    pub new_users: usize,
    /// Users per role, every role present.
    pub role_distribution: BTreeMap<String, usize>,
    /// Percentage of active users, 0 when there are none.
    pub active_rate: f64,
}

impl UserStatistics {
    /// Reads the cards out of a summary computed with the preset stats.
    pub fn from_summary(summary: &StatisticsSummary) -> Self {
        UserStatistics {
            total_users: summary.total,
            active_users: summary.count(names::ACTIVE_USERS),
            inactive_users: summary.count(names::INACTIVE_USERS),
            new_users: summary.count(names::NEW_USERS),
            role_distribution: summary
                .distribution(names::ROLE_DISTRIBUTION)
                .cloned()
                .unwrap_or_default(),
            active_rate: summary.rate(names::ACTIVE_USERS),
        }
    }

    /// Summarizes `users` at `now`.
    pub fn compute(users: &[User], now: DateTime<Utc>) -> Self {
        Self::from_summary(&summarize(users, &User::stats(), now))
    }
}

/// Stories page cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryStatistics {
    /// All stories.
    pub total_stories: usize,
    /// Published stories.
    pub published: usize,
    /// Draft stories.
    pub drafts: usize,
    /// Archived stories.
    pub archived: usize,
    /// Featured stories.
    pub featured: usize,
    /// Stories created in the last 30 days.
    pub new_stories: usize,
    /// Views across all stories.
    pub total_views: u64,
    /// Likes across all stories.
    pub total_likes: u64,
    /// Views per story.
    pub average_views: f64,
    /// Likes per story.
    pub average_likes: f64,
    /// Unrated stories count as 0.
    pub average_rating: f64,
}

impl StoryStatistics {
    /// Reads the cards out of a summary computed with the preset stats.
    pub fn from_summary(summary: &StatisticsSummary) -> Self {
        let status = |s: StoryStatus| summary.bucket(names::BY_STATUS, s.as_str());
        StoryStatistics {
            total_stories: summary.total,
            published: status(StoryStatus::Published),
            drafts: status(StoryStatus::Draft),
            archived: status(StoryStatus::Archived),
            featured: summary.count(names::FEATURED),
            new_stories: summary.count(names::NEW_STORIES),
            total_views: whole(summary.sum(names::VIEWS)),
            total_likes: whole(summary.sum(names::LIKES)),
            average_views: summary.mean(names::VIEWS),
            average_likes: summary.mean(names::LIKES),
            average_rating: summary.mean(names::RATING),
        }
    }

    /// Summarizes `stories` at `now`.
    pub fn compute(stories: &[Story], now: DateTime<Utc>) -> Self {
        Self::from_summary(&summarize(stories, &Story::stats(), now))
    }
}

/// Scripts page cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStatistics {
    /// All scripts.
    pub total_scripts: usize,
    /// Scripts per type.
    pub by_type: BTreeMap<String, usize>,
    /// Scripts per status.
    pub by_status: BTreeMap<String, usize>,
    /// Scripts created in the last 30 days.
    pub new_scripts: usize,
    /// Words across all scripts.
    pub total_words: u64,
    /// Words per script.
    pub average_words: f64,
}

impl ScriptStatistics {
    /// Reads the cards out of a summary computed with the preset stats.
    pub fn from_summary(summary: &StatisticsSummary) -> Self {
        ScriptStatistics {
            total_scripts: summary.total,
            by_type: summary.distribution(names::BY_TYPE).cloned().unwrap_or_default(),
            by_status: summary.distribution(names::BY_STATUS).cloned().unwrap_or_default(),
            new_scripts: summary.count(names::NEW_SCRIPTS),
            total_words: whole(summary.sum(names::WORDS)),
            average_words: summary.mean(names::WORDS),
        }
    }

    /// Summarizes `scripts` at `now`.
    pub fn compute(scripts: &[Script], now: DateTime<Utc>) -> Self {
        Self::from_summary(&summarize(scripts, &Script::stats(), now))
    }
}

/// Categories page cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatistics {
    /// All categories.
    pub total_categories: usize,
    /// Categories with `isActive` set.
    pub active_categories: usize,
    /// Stories across all categories.
    pub total_stories: u64,
    /// Stories per category.
    pub average_stories: f64,
}

impl CategoryStatistics {
    /// Reads the cards out of a summary computed with the preset stats.
    pub fn from_summary(summary: &StatisticsSummary) -> Self {
        CategoryStatistics {
            total_categories: summary.total,
            active_categories: summary.count(names::ACTIVE_CATEGORIES),
            total_stories: whole(summary.sum(names::STORIES)),
            average_stories: summary.mean(names::STORIES),
        }
    }

    /// Summarizes `categories`. No category card is time-relative.
    pub fn compute(categories: &[Category], now: DateTime<Utc>) -> Self {
        Self::from_summary(&summarize(categories, &Category::stats(), now))
    }
}

/// Feedback page cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStatistics {
    /// All feedback.
    pub total_feedback: usize,
    /// Open items.
    pub open: usize,
    /// Items in progress.
    pub in_progress: usize,
    /// Resolved items.
    pub resolved: usize,
    /// Closed items.
    pub closed: usize,
    /// Items per type.
    pub by_type: BTreeMap<String, usize>,
    /// Items from the last 7 days.
    pub recent: usize,
    /// Unrated feedback counts as 0.
    pub average_rating: f64,
    /// Percentage resolved or closed.
    pub resolution_rate: f64,
}

impl FeedbackStatistics {
    /// Reads the cards out of a summary computed with the preset stats.
    pub fn from_summary(summary: &StatisticsSummary) -> Self {
        let status = |s: FeedbackStatus| summary.bucket(names::BY_STATUS, s.as_str());
        let resolved = status(FeedbackStatus::Resolved);
        let closed = status(FeedbackStatus::Closed);
        FeedbackStatistics {
            total_feedback: summary.total,
            open: status(FeedbackStatus::Open),
            in_progress: status(FeedbackStatus::InProgress),
            resolved,
            closed,
            by_type: summary.distribution(names::BY_TYPE).cloned().unwrap_or_default(),
            recent: summary.count(names::RECENT_FEEDBACK),
            average_rating: summary.mean(names::RATING),
            resolution_rate: marquee_query::percentage(resolved + closed, summary.total),
        }
    }

    /// Summarizes `feedback` at `now`.
    pub fn compute(feedback: &[Feedback], now: DateTime<Utc>) -> Self {
        Self::from_summary(&summarize(feedback, &Feedback::stats(), now))
    }
}
