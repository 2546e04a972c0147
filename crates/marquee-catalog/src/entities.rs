//! Dashboard entities as the REST API returns them.

use chrono::{DateTime, Utc};
use marquee_macros::Queryable;
use serde::{Deserialize, Serialize};

use crate::tags::{FeedbackKind, FeedbackStatus, Role, ScriptKind, ScriptStatus, StoryStatus};

/// A platform account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[serde(rename_all = "camelCase")]
#[query(rename_all = "camelCase")]
pub struct User {
    #[query(String)]
    pub id: String,
    #[query(String)]
    pub name: String,
    #[query(String)]
    pub email: String,
    #[query(Tag)]
    pub role: Role,
    #[query(Bool)]
    pub is_active: bool,
    #[query(Timestamp)]
    pub created_at: DateTime<Utc>,
    #[query(Timestamp, optional)]
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// An episode or standalone story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[serde(rename_all = "camelCase")]
#[query(rename_all = "camelCase")]
pub struct Story {
    #[query(String)]
    pub id: String,
    #[query(String)]
    pub title: String,
    #[query(String)]
    #[serde(default)]
    pub description: String,
    #[query(String)]
    pub category: String,
    #[query(Tag)]
    pub status: StoryStatus,
    #[query(Bool)]
    #[serde(default)]
    pub featured: bool,
    #[query(Number)]
    #[serde(default)]
    pub views: u64,
    #[query(Number)]
    #[serde(default)]
    pub likes: u64,
    #[query(Number, optional)]
    #[serde(default)]
    pub rating: Option<f64>,
    #[query(Number, optional)]
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[query(Timestamp)]
    pub created_at: DateTime<Utc>,
    #[query(Timestamp, optional)]
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// A screenplay in the writers' room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[serde(rename_all = "camelCase")]
#[query(rename_all = "camelCase")]
pub struct Script {
    #[query(String)]
    pub id: String,
    #[query(String)]
    pub title: String,
    #[query(String)]
    pub author: String,
    #[query(Tag, rename = "type")]
    #[serde(rename = "type")]
    pub kind: ScriptKind,
    #[query(Tag)]
    pub status: ScriptStatus,
    #[query(String)]
    pub category: String,
    #[query(Number)]
    #[serde(default)]
    pub word_count: u32,
    #[query(Timestamp)]
    pub created_at: DateTime<Utc>,
    #[query(Timestamp, optional)]
    #[serde(default)]
    pub last_edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: String,
}

/// A story category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[serde(rename_all = "camelCase")]
#[query(rename_all = "camelCase")]
pub struct Category {
    #[query(String)]
    pub id: String,
    #[query(String)]
    pub name: String,
    #[query(String)]
    #[serde(default)]
    pub description: String,
    #[query(Bool)]
    pub is_active: bool,
    #[query(Number)]
    #[serde(default)]
    pub story_count: u32,
    #[query(Timestamp)]
    pub created_at: DateTime<Utc>,
}

/// A message from a viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[serde(rename_all = "camelCase")]
#[query(rename_all = "camelCase")]
pub struct Feedback {
    #[query(String)]
    pub id: String,
    #[query(String)]
    pub subject: String,
    #[query(String)]
    pub message: String,
    #[query(String)]
    pub email: String,
    #[query(Tag, rename = "type")]
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    #[query(Tag)]
    pub status: FeedbackStatus,
    #[query(Number, optional)]
    #[serde(default)]
    pub rating: Option<u8>,
    #[query(Timestamp)]
    pub created_at: DateTime<Utc>,
    #[query(Timestamp, optional)]
    #[serde(default)]
    pub responded_at: Option<DateTime<Utc>>,
}
