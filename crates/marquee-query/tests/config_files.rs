//! Loading dashboard configuration from disk.

use std::fs;

use marquee_query::{ConfigError, DashboardConfig, Facet, Listing, SortOrder, TagBinding, Value};
use tempfile::TempDir;

const YAML: &str = r#"
listings:
  stories:
    schema:
      name: stories
      searchFields: [title]
      facets:
        status: { kind: field, field: status }
    stats:
      distributions:
        - { name: byStatus, field: status, values: [draft, published] }
    defaults:
      sortBy: title
      sortOrder: asc
      limit: 2
"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_yaml_by_extension() {
    let dir = TempDir::new().unwrap();
    for name in ["dashboard.yaml", "dashboard.yml", "DASHBOARD.YML"] {
        let config = DashboardConfig::load(write(&dir, name, YAML)).unwrap();
        let stories = config.require("stories").unwrap();
        assert_eq!(stories.schema.binding(Facet::Status), Some(&TagBinding::field("status")));
        assert_eq!(stories.defaults.sort_order, SortOrder::Asc);
    }
}

#[test]
fn loads_json_by_extension() {
    let dir = TempDir::new().unwrap();
    let yaml_config = DashboardConfig::from_yaml_str(YAML).unwrap();
    let json = serde_json::to_string_pretty(&yaml_config).unwrap();
    let config = DashboardConfig::load(write(&dir, "dashboard.json", &json)).unwrap();
    assert_eq!(config, yaml_config);
}

#[test]
fn unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let err = DashboardConfig::load(write(&dir, "dashboard.toml", YAML)).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = DashboardConfig::load(&path).unwrap_err();
    match &err {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("expected Io error, got {other:?}"),
    }
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn invalid_file_is_rejected_after_parsing() {
    let dir = TempDir::new().unwrap();
    let broken = YAML.replace("limit: 2", "limit: 0");
    let err = DashboardConfig::load(write(&dir, "dashboard.yaml", &broken)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

struct Story {
    title: &'static str,
    status: &'static str,
}

impl marquee_query::Queryable for Story {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "title" => Value::String(self.title),
            "status" => Value::Tag(self.status),
            _ => Value::None,
        }
    }
}

#[test]
fn listing_from_loaded_config() {
    let dir = TempDir::new().unwrap();
    let config = DashboardConfig::load(write(&dir, "dashboard.yaml", YAML)).unwrap();

    let mut listing = Listing::from_config(config.require("stories").unwrap());
    listing.replace(vec![
        Story { title: "gamma", status: "draft" },
        Story { title: "Alpha", status: "published" },
        Story { title: "beta", status: "published" },
    ]);

    let page = listing.page();
    let titles: Vec<&str> = page.items.iter().map(|s| s.title).collect();
    assert_eq!(titles, ["Alpha", "beta"]);
    assert_eq!(page.total_pages, 2);

    listing.store_mut().set_status("draft");
    assert_eq!(listing.showing(), (1, 3));
    assert_eq!(listing.summary().bucket("byStatus", "published"), 2);
}
