//! Per-entity-type field mapping.
//!
//! One [`EntitySchema`] per list page tells the engine which fields the
//! search box looks at, which field each facet filter reads, and where the
//! creation and last-activity timestamps live.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filter::Facet;

fn default_created_at() -> String {
    "createdAt".to_string()
}

fn default_last_active() -> String {
    "lastActive".to_string()
}

/// How a facet filter reads an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TagBinding {
    /// Exact equality against a string or tag field.
    Field {
        /// Field name.
        field: String,
    },
    /// A boolean field presented as two labels, e.g. status
    /// `active` / `inactive` over `isActive`.
    Flag {
        /// Boolean field name.
        field: String,
        /// Label meaning `true`.
        on: String,
        /// Label meaning `false`.
        off: String,
    },
}

impl TagBinding {
    /// Equality against `field`.
    pub fn field(field: impl Into<String>) -> Self {
        TagBinding::Field {
            field: field.into(),
        }
    }

    /// Boolean `field` labelled `on` / `off`.
    pub fn flag(field: impl Into<String>, on: impl Into<String>, off: impl Into<String>) -> Self {
        TagBinding::Flag {
            field: field.into(),
            on: on.into(),
            off: off.into(),
        }
    }

    /// The entity field this binding reads.
    pub fn field_name(&self) -> &str {
        match self {
            TagBinding::Field { field } | TagBinding::Flag { field, .. } => field,
        }
    }
}

/// Field mapping for one entity type.
///
/// ```
/// use marquee_query::{EntitySchema, Facet, TagBinding};
///
/// let users = EntitySchema::new("users")
///     .search(["name", "email"])
///     .facet(Facet::Role, TagBinding::field("role"))
///     .facet(Facet::Status, TagBinding::flag("isActive", "active", "inactive"));
///
/// assert_eq!(users.search_fields(), ["name", "email"]);
/// assert_eq!(users.created_at(), "createdAt");
/// assert!(users.binding(Facet::Category).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySchema {
    name: String,
    #[serde(default)]
    search_fields: Vec<String>,
    #[serde(default)]
    facets: BTreeMap<Facet, TagBinding>,
    #[serde(default = "default_created_at")]
    created_at: String,
    #[serde(default = "default_last_active")]
    last_active: String,
}

impl EntitySchema {
    /// Creates a schema with no search fields or facets and the default
    /// timestamp field names.
    pub fn new(name: impl Into<String>) -> Self {
        EntitySchema {
            name: name.into(),
            search_fields: Vec::new(),
            facets: BTreeMap::new(),
            created_at: default_created_at(),
            last_active: default_last_active(),
        }
    }

    /// Sets the fields searched by free text.
    pub fn search<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Binds a facet to an entity field.
    pub fn facet(mut self, facet: Facet, binding: TagBinding) -> Self {
        self.facets.insert(facet, binding);
        self
    }

    /// Sets the creation timestamp field.
    pub fn created_at_field(mut self, field: impl Into<String>) -> Self {
        self.created_at = field.into();
        self
    }

    /// Sets the last-activity timestamp field.
    pub fn last_active_field(mut self, field: impl Into<String>) -> Self {
        self.last_active = field.into();
        self
    }

    /// Listing name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields searched by free text.
    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    /// The binding for a facet, if the entity type has one.
    pub fn binding(&self, facet: Facet) -> Option<&TagBinding> {
        self.facets.get(&facet)
    }

    /// All facet bindings.
    pub fn bindings(&self) -> impl Iterator<Item = (Facet, &TagBinding)> {
        self.facets.iter().map(|(facet, binding)| (*facet, binding))
    }

    /// Creation timestamp field.
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Last-activity timestamp field.
    pub fn last_active(&self) -> &str {
        &self.last_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_mapping_with_defaults() {
        let yaml = r#"
name: stories
searchFields: [title, description]
facets:
  status: { kind: field, field: status }
  category: { kind: field, field: category }
"#;
        let schema: EntitySchema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(schema.name(), "stories");
        assert_eq!(schema.search_fields(), ["title", "description"]);
        assert_eq!(schema.binding(Facet::Status), Some(&TagBinding::field("status")));
        assert_eq!(schema.created_at(), "createdAt");
        assert_eq!(schema.last_active(), "lastActive");
        assert_eq!(schema.bindings().count(), 2);
    }

    #[test]
    fn flag_binding_from_json() {
        let json = r#"{
            "name": "users",
            "facets": {"status": {"kind": "flag", "field": "isActive", "on": "active", "off": "inactive"}},
            "lastActive": "lastLoginAt"
        }"#;
        let schema: EntitySchema = serde_json::from_str(json).unwrap();
        assert_eq!(
            schema.binding(Facet::Status),
            Some(&TagBinding::flag("isActive", "active", "inactive"))
        );
        assert_eq!(schema.last_active(), "lastLoginAt");
        assert!(schema.search_fields().is_empty());
    }

    #[test]
    fn builder_overrides_timestamp_fields() {
        let schema = EntitySchema::new("feedback")
            .created_at_field("submittedAt")
            .last_active_field("respondedAt");
        assert_eq!(schema.created_at(), "submittedAt");
        assert_eq!(schema.last_active(), "respondedAt");
        assert_eq!(TagBinding::flag("a", "b", "c").field_name(), "a");
    }
}
