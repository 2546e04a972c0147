//! Property-based tests for the listing engine using proptest.

use chrono::{DateTime, Duration, TimeZone, Utc};
use marquee_query::{
    query, summarize, EntitySchema, Facet, FilterState, LastActive, Number, Queryable, SortOrder,
    StatsSpec, TagBinding, Timestamp, Value,
};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

fn now_ms() -> i64 {
    now().timestamp_millis()
}

#[derive(Debug, Clone)]
struct Member {
    idx: usize,
    name: String,
    email: String,
    role: &'static str,
    active: bool,
    created_at: i64,
    last_active: Option<i64>,
    views: u32,
    rating: Option<f64>,
}

impl Queryable for Member {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "name" => Value::String(&self.name),
            "email" => Value::String(&self.email),
            "role" => Value::Tag(self.role),
            "isActive" => Value::Bool(self.active),
            "createdAt" => Value::Timestamp(Timestamp(self.created_at)),
            "lastActive" => self
                .last_active
                .map_or(Value::None, |ms| Value::Timestamp(Timestamp(ms))),
            "views" => Value::Number(Number::from(self.views)),
            "rating" => self.rating.map_or(Value::None, |r| Value::Number(Number::F64(r))),
            _ => Value::None,
        }
    }
}

fn schema() -> EntitySchema {
    EntitySchema::new("members")
        .search(["name", "email"])
        .facet(Facet::Role, TagBinding::field("role"))
        .facet(Facet::Status, TagBinding::flag("isActive", "active", "inactive"))
}

fn stats() -> StatsSpec {
    StatsSpec::new()
        .distribution("roles", "role", ["admin", "editor", "user"])
        .flag("active", "isActive", true)
        .recent("new", "createdAt", 30)
        .numeric("views", "views")
        .numeric("rating", "rating")
}

// Timestamps are drawn from a handful of days so ties are common
fn member_strategy() -> impl Strategy<Value = Member> {
    (
        "[a-zA-Z]{1,8}",
        "[a-z]{1,6}@(mail|studio)\\.(com|tv)",
        prop::sample::select(vec!["admin", "editor", "user"]),
        any::<bool>(),
        0i64..40,
        prop::option::of(0i64..40),
        0u32..5_000,
        prop::option::of(0.0f64..5.0),
    )
        .prop_map(|(name, email, role, active, age, seen, views, rating)| Member {
            idx: 0,
            name,
            email,
            role,
            active,
            created_at: now_ms() - age * DAY_MS,
            last_active: seen.map(|days| now_ms() - days * DAY_MS),
            views,
            rating,
        })
}

fn members_strategy() -> impl Strategy<Value = Vec<Member>> {
    prop::collection::vec(member_strategy(), 0..40).prop_map(|mut members| {
        for (idx, member) in members.iter_mut().enumerate() {
            member.idx = idx;
        }
        members
    })
}

fn last_active_strategy() -> impl Strategy<Value = LastActive> {
    prop::sample::select(vec![
        LastActive::All,
        LastActive::Today,
        LastActive::ThisWeek,
        LastActive::ThisMonth,
        LastActive::Never,
    ])
}

fn state_strategy() -> impl Strategy<Value = FilterState> {
    (
        prop::option::of("[a-z]{1,3}"),
        prop::option::of(prop::sample::select(vec!["admin", "editor", "user", "ghost"])),
        prop::option::of(prop::sample::select(vec!["active", "inactive"])),
        last_active_strategy(),
        prop::sample::select(vec!["name", "createdAt", "views", "lastActive", "missing"]),
        any::<bool>(),
    )
        .prop_map(|(search, role, status, last_active, sort_by, asc)| {
            let mut state = FilterState::default()
                .with_last_active(last_active)
                .with_sorting(sort_by, if asc { SortOrder::Asc } else { SortOrder::Desc });
            if let Some(search) = search {
                state = state.with_search(search);
            }
            if let Some(role) = role {
                state = state.with_role(role);
            }
            if let Some(status) = status {
                state = state.with_status(status);
            }
            state
        })
}

fn indices(rows: &[&Member]) -> Vec<usize> {
    rows.iter().map(|m| m.idx).collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// The default state keeps everything, newest first, ties in input order.
    #[test]
    fn default_state_returns_everything_sorted(members in members_strategy()) {
        let rows = query(&members, &FilterState::default(), &schema(), now());
        prop_assert_eq!(rows.len(), members.len());
        for pair in rows.windows(2) {
            prop_assert!(pair[0].created_at >= pair[1].created_at);
            if pair[0].created_at == pair[1].created_at {
                prop_assert!(pair[0].idx < pair[1].idx);
            }
        }
    }

    /// Re-running a query over its own result changes nothing.
    #[test]
    fn query_is_idempotent(members in members_strategy(), state in state_strategy()) {
        let first: Vec<Member> = query(&members, &state, &schema(), now())
            .into_iter()
            .cloned()
            .collect();
        let second = query(&first, &state, &schema(), now());
        let first_refs: Vec<&Member> = first.iter().collect();
        prop_assert_eq!(indices(&second), indices(&first_refs));
    }

    /// Results never grow and every result passes every active filter.
    #[test]
    fn results_satisfy_filters(members in members_strategy(), state in state_strategy()) {
        let rows = query(&members, &state, &schema(), now());
        prop_assert!(rows.len() <= members.len());

        let needle = state.search().to_lowercase();
        for member in &rows {
            if !needle.is_empty() {
                prop_assert!(
                    member.name.to_lowercase().contains(&needle)
                        || member.email.to_lowercase().contains(&needle)
                );
            }
            if let Some(role) = state.role().value() {
                prop_assert_eq!(member.role, role);
            }
            if let Some(status) = state.status().value() {
                prop_assert_eq!(member.active, status == "active");
            }
        }
    }

    /// Members without last activity pass only `all` and `never`.
    #[test]
    fn absent_last_activity(members in members_strategy(), window in last_active_strategy()) {
        let state = FilterState::default().with_last_active(window);
        let rows = query(&members, &state, &schema(), now());
        let kept: Vec<usize> = indices(&rows);

        for member in members.iter().filter(|m| m.last_active.is_none()) {
            let expected = matches!(window, LastActive::All | LastActive::Never);
            prop_assert_eq!(kept.contains(&member.idx), expected);
        }
        if window == LastActive::Never {
            prop_assert!(rows.iter().all(|m| m.last_active.is_none()));
        }
    }

    /// Equal sort keys keep input order in both directions.
    #[test]
    fn sort_is_stable(members in members_strategy(), asc in any::<bool>()) {
        let order = if asc { SortOrder::Asc } else { SortOrder::Desc };
        let state = FilterState::default().with_sorting("role", order);
        let rows = query(&members, &state, &schema(), now());
        for pair in rows.windows(2) {
            if pair[0].role == pair[1].role {
                prop_assert!(pair[0].idx < pair[1].idx);
            } else if asc {
                prop_assert!(pair[0].role < pair[1].role);
            } else {
                prop_assert!(pair[0].role > pair[1].role);
            }
        }
    }

    /// Date bounds are inclusive on both ends.
    #[test]
    fn date_bounds_are_inclusive(members in members_strategy(), from_days in 0i64..40, span in 0i64..10) {
        let from = now() - Duration::days(from_days);
        let to = from + Duration::days(span);
        let state = FilterState::default().with_date_range(Some(from), Some(to));
        let rows = query(&members, &state, &schema(), now());

        let expected: Vec<usize> = members
            .iter()
            .filter(|m| m.created_at >= from.timestamp_millis() && m.created_at <= to.timestamp_millis())
            .map(|m| m.idx)
            .collect();
        let mut kept = indices(&rows);
        kept.sort_unstable();
        prop_assert_eq!(kept, expected);
    }

    /// Statistics do not depend on collection order, float ratings included.
    #[test]
    fn summarize_is_permutation_invariant(
        (members, shuffled) in members_strategy()
            .prop_flat_map(|members| (Just(members.clone()), Just(members).prop_shuffle()))
    ) {
        let spec = stats();
        prop_assert_eq!(summarize(&members, &spec, now()), summarize(&shuffled, &spec, now()));
    }

    /// Counts stay within the total and buckets cover declared values only.
    #[test]
    fn summary_counts_are_bounded(members in members_strategy()) {
        let summary = summarize(&members, &stats(), now());
        prop_assert_eq!(summary.total, members.len());
        prop_assert!(summary.count("active") <= summary.total);
        prop_assert!(summary.count("new") <= summary.total);
        let bucketed: usize = summary.distribution("roles").map_or(0, |b| b.values().sum());
        prop_assert_eq!(bucketed, members.len());
        let views: u64 = members.iter().map(|m| u64::from(m.views)).sum();
        prop_assert_eq!(summary.sum("views"), views as f64);
    }
}

// ============================================================================
// Fixed cases
// ============================================================================

#[test]
fn summarize_empty_collection() {
    let members: Vec<Member> = Vec::new();
    let summary = summarize(&members, &stats(), now());
    assert_eq!(summary.total, 0);
    assert_eq!(summary.count("active"), 0);
    assert_eq!(summary.rate("active"), 0.0);
    assert_eq!(summary.share("roles", "admin"), 0.0);
    assert_eq!(summary.sum("views"), 0.0);
    assert_eq!(summary.mean("views"), 0.0);
    assert_eq!(summary.mean("rating"), 0.0);
}

#[test]
fn descending_titles_fold_case() {
    let members: Vec<Member> = ["Banana", "apple", "Cherry"]
        .iter()
        .enumerate()
        .map(|(idx, name)| Member {
            idx,
            name: name.to_string(),
            email: String::new(),
            role: "user",
            active: true,
            created_at: now_ms(),
            last_active: None,
            views: 0,
            rating: None,
        })
        .collect();
    let state = FilterState::default().with_sorting("name", SortOrder::Desc);
    let names: Vec<&str> = query(&members, &state, &schema(), now())
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, ["Cherry", "Banana", "apple"]);
}
