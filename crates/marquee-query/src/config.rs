//! Dashboard configuration.
//!
//! A dashboard declares its listings in YAML or JSON: for each one the field
//! mapping, the summary statistics, and the default sort and page size.
//!
//! ```yaml
//! listings:
//!   users:
//!     schema:
//!       name: users
//!       searchFields: [name, email]
//!       facets:
//!         role: { kind: field, field: role }
//!         status: { kind: flag, field: isActive, on: active, off: inactive }
//!     stats:
//!       distributions:
//!         - { name: roleDistribution, field: role, values: [admin, user] }
//!       flags:
//!         - { name: activeUsers, field: isActive }
//!     defaults:
//!       sortBy: name
//!       sortOrder: asc
//!       limit: 25
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::filter::{FilterState, DEFAULT_LIMIT, DEFAULT_SORT_BY, DEFAULT_SORT_ORDER};
use crate::ordering::SortOrder;
use crate::schema::EntitySchema;
use crate::stats::{StatsSpec, MAX_RECENT_DAYS};

fn default_sort_by() -> String {
    DEFAULT_SORT_BY.to_string()
}

fn default_sort_order() -> SortOrder {
    DEFAULT_SORT_ORDER
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Initial sort and page size of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDefaults {
    /// Field the page sorts by initially.
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// Initial sort direction.
    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
    /// Rows per page.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for ListingDefaults {
    fn default() -> Self {
        ListingDefaults {
            sort_by: default_sort_by(),
            sort_order: default_sort_order(),
            limit: default_limit(),
        }
    }
}

/// One list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// How filters read the page's entities.
    pub schema: EntitySchema,
    /// What the summary cards count.
    #[serde(default)]
    pub stats: StatsSpec,
    /// Initial sort and page size.
    #[serde(default)]
    pub defaults: ListingDefaults,
}

impl ListingConfig {
    /// A listing with default sort and page size.
    pub fn new(schema: EntitySchema, stats: StatsSpec) -> Self {
        ListingConfig {
            schema,
            stats,
            defaults: ListingDefaults::default(),
        }
    }

    /// The state a fresh or reset filter store starts from.
    pub fn default_state(&self) -> FilterState {
        FilterState::default()
            .with_sorting(self.defaults.sort_by.clone(), self.defaults.sort_order)
            .with_limit(self.defaults.limit)
    }

    /// Checks the listing for inconsistencies a parser cannot catch.
    pub fn validate(&self) -> Result<()> {
        let name = self.schema.name();
        if self.defaults.limit == 0 {
            return Err(ConfigError::invalid(format!(
                "listing '{name}': page size must be at least 1"
            )));
        }

        let mut seen = BTreeSet::new();
        for stat in self.stats.names() {
            if !seen.insert(stat) {
                return Err(ConfigError::invalid(format!(
                    "listing '{name}': statistic '{stat}' is declared twice"
                )));
            }
        }

        if let Some(empty) = self.stats.distributions.iter().find(|d| d.values.is_empty()) {
            return Err(ConfigError::invalid(format!(
                "listing '{name}': distribution '{}' declares no values",
                empty.name
            )));
        }

        if let Some(bad) = self.stats.recent.iter().find(|r| r.days < 0) {
            return Err(ConfigError::invalid(format!(
                "listing '{name}': recent window '{}' is negative",
                bad.name
            )));
        }
        if let Some(bad) = self.stats.recent.iter().find(|r| r.days > MAX_RECENT_DAYS) {
            return Err(ConfigError::invalid(format!(
                "listing '{name}': recent window '{}' exceeds {MAX_RECENT_DAYS} days",
                bad.name
            )));
        }

        Ok(())
    }
}

/// Every listing of a dashboard, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Listings by name.
    #[serde(default)]
    pub listings: BTreeMap<String, ListingConfig>,
}

impl DashboardConfig {
    /// Parses and validates YAML.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: DashboardConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates JSON.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a `.yaml`, `.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match extension.as_str() {
            "yaml" | "yml" => DashboardConfig::from_yaml_str(&source)?,
            "json" => DashboardConfig::from_json_str(&source)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        debug!(path = %path.display(), listings = config.listings.len(), "dashboard config loaded");
        Ok(config)
    }

    /// A listing by name.
    pub fn listing(&self, name: &str) -> Option<&ListingConfig> {
        self.listings.get(name)
    }

    /// A listing by name, or [`ConfigError::UnknownListing`].
    pub fn require(&self, name: &str) -> Result<&ListingConfig> {
        self.listing(name)
            .ok_or_else(|| ConfigError::UnknownListing(name.to_string()))
    }

    /// Validates every listing.
    pub fn validate(&self) -> Result<()> {
        self.listings.values().try_for_each(ListingConfig::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Facet;
    use crate::schema::TagBinding;

    const YAML: &str = r#"
listings:
  users:
    schema:
      name: users
      searchFields: [name, email]
      facets:
        role: { kind: field, field: role }
        status: { kind: flag, field: isActive, on: active, off: inactive }
    stats:
      distributions:
        - { name: roleDistribution, field: role, values: [admin, user] }
      flags:
        - { name: activeUsers, field: isActive }
      recent:
        - { name: newUsers, field: createdAt, days: 30 }
    defaults:
      sortBy: name
      sortOrder: asc
      limit: 25
  categories:
    schema:
      name: categories
      searchFields: [name]
"#;

    #[test]
    fn parses_yaml() {
        let config = DashboardConfig::from_yaml_str(YAML).unwrap();
        let users = config.listing("users").unwrap();
        assert_eq!(
            users.schema.binding(Facet::Status),
            Some(&TagBinding::flag("isActive", "active", "inactive"))
        );
        assert!(users.stats.flags[0].value);
        assert_eq!(users.stats.recent[0].days, 30);

        let state = users.default_state();
        assert_eq!(state.sort_by(), "name");
        assert_eq!(state.sort_order(), SortOrder::Asc);
        assert_eq!(state.limit(), 25);
    }

    #[test]
    fn missing_defaults_fall_back() {
        let config = DashboardConfig::from_yaml_str(YAML).unwrap();
        let categories = config.listing("categories").unwrap();
        assert_eq!(categories.default_state(), FilterState::default());
        assert!(categories.stats.names().next().is_none());
    }

    #[test]
    fn json_round_trip() {
        let config = DashboardConfig::from_yaml_str(YAML).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(DashboardConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn rejects_zero_limit() {
        let yaml = "listings:\n  x:\n    schema: { name: x }\n    defaults: { limit: 0 }\n";
        let err = DashboardConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("page size"));
    }

    #[test]
    fn rejects_duplicate_statistic_names() {
        let listing = ListingConfig::new(
            EntitySchema::new("users"),
            StatsSpec::new()
                .flag("active", "isActive", true)
                .recent("active", "lastActive", 7),
        );
        let err = listing.validate().unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn rejects_empty_distribution() {
        let listing = ListingConfig::new(
            EntitySchema::new("users"),
            StatsSpec::new().distribution("byRole", "role", Vec::<String>::new()),
        );
        assert!(listing.validate().is_err());
    }

    #[test]
    fn rejects_oversized_recent_window() {
        let yaml = "listings:\n  x:\n    schema: { name: x }\n    stats:\n      recent:\n        - { name: old, field: createdAt, days: 100000000 }\n";
        let err = DashboardConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("exceeds"));

        let listing = ListingConfig::new(
            EntitySchema::new("users"),
            StatsSpec::new().recent("century", "createdAt", MAX_RECENT_DAYS),
        );
        assert!(listing.validate().is_ok());
    }

    #[test]
    fn unknown_listing() {
        let config = DashboardConfig::default();
        assert!(matches!(
            config.require("nope"),
            Err(ConfigError::UnknownListing(name)) if name == "nope"
        ));
    }

    #[test]
    fn malformed_sources() {
        assert!(matches!(
            DashboardConfig::from_yaml_str("listings: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json_str("{\"listings\": 3}"),
            Err(ConfigError::Json(_))
        ));
    }
}
