//! Traits connecting entity types to the engine.
//!
//! [`Queryable`] is usually derived with `#[derive(Queryable)]` from
//! `marquee-macros`; [`Tagged`] and [`AsTimestamp`] let the derive turn
//! domain enums and datetime types into [`Value`]s.

use chrono::{DateTime, TimeZone};

use crate::value::{Timestamp, Value};

/// A listable entity the engine can filter, sort and summarize.
///
/// # Manual Implementation
///
/// ```
/// use marquee_query::{Number, Queryable, Value};
///
/// struct Category {
///     name: String,
///     story_count: u32,
/// }
///
/// impl Queryable for Category {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             "storyCount" => Value::Number(Number::from(self.story_count)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Queryable {
    /// Returns the value of a field, or [`Value::None`] if the field is
    /// unknown or unset.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Accessor function suitable for [`Query::filter`](crate::Query::filter).
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

/// Categorical enums exposed to queries as string tags.
///
/// The tag is the value the REST payload and the UI use, so a role filter
/// set to `"admin"` matches `Role::Admin`.
///
/// ```
/// use marquee_query::Tagged;
///
/// enum Role {
///     Admin,
///     User,
/// }
///
/// impl Tagged for Role {
///     fn tag(&self) -> &str {
///         match self {
///             Role::Admin => "admin",
///             Role::User => "user",
///         }
///     }
/// }
/// ```
pub trait Tagged {
    /// The tag for this variant.
    fn tag(&self) -> &str;
}

impl Tagged for String {
    fn tag(&self) -> &str {
        self
    }
}

impl Tagged for &str {
    fn tag(&self) -> &str {
        self
    }
}

/// Types convertible to a [`Timestamp`].
pub trait AsTimestamp {
    /// Returns this instant as a timestamp.
    fn as_timestamp(&self) -> Timestamp;
}

impl<Tz: TimeZone> AsTimestamp for DateTime<Tz> {
    fn as_timestamp(&self) -> Timestamp {
        Timestamp(self.timestamp_millis())
    }
}

impl AsTimestamp for Timestamp {
    fn as_timestamp(&self) -> Timestamp {
        *self
    }
}

/// Milliseconds since the Unix epoch.
impl AsTimestamp for i64 {
    fn as_timestamp(&self) -> Timestamp {
        Timestamp(*self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::value::Number;

    struct Script {
        title: String,
        words: u32,
    }

    impl Queryable for Script {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "title" => Value::String(&self.title),
                "wordCount" => Value::Number(Number::from(self.words)),
                _ => Value::None,
            }
        }
    }

    #[test]
    fn accessor_delegates_to_field_value() {
        let script = Script {
            title: "Pilot".to_string(),
            words: 1200,
        };
        assert_eq!(Script::accessor(&script, "title"), Value::String("Pilot"));
        assert_eq!(
            Script::accessor(&script, "wordCount"),
            Value::Number(Number::U64(1200))
        );
        assert_eq!(Script::accessor(&script, "missing"), Value::None);
    }

    #[test]
    fn string_tags_are_themselves() {
        assert_eq!("published".tag(), "published");
        assert_eq!(String::from("draft").tag(), "draft");
    }

    #[test]
    fn datetimes_convert_to_millis() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(at.as_timestamp(), Timestamp(at.timestamp_millis()));
        assert_eq!(5_000i64.as_timestamp(), Timestamp(5_000));
    }
}
