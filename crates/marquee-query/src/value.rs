//! Runtime value types for field comparison.
//!
//! The [`Value`] enum is what an entity hands to the engine when asked for a
//! field. It borrows from the entity, so filtering and sorting never copy
//! strings out of the collection.

use std::cmp::Ordering;

use chrono::{DateTime, TimeZone, Utc};

/// Runtime value for comparison, borrowed from the source entity.
///
/// # Example
///
/// ```
/// use marquee_query::{Number, Value};
///
/// struct Story {
///     title: String,
///     views: u64,
/// }
///
/// fn accessor<'a>(story: &'a Story, field: &str) -> Value<'a> {
///     match field {
///         "title" => Value::String(&story.title),
///         "views" => Value::Number(Number::U64(story.views)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Free text (names, titles, emails).
    String(&'a str),
    /// Categorical tag drawn from a small closed set (role, status, type).
    Tag(&'a str),
    /// Numeric value.
    Number(Number),
    /// Instant in time.
    Timestamp(Timestamp),
    /// Boolean flag.
    Bool(bool),
    /// Field absent, null, or unknown to the entity.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns the text of a `String` or `Tag` value.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) | Value::Tag(s) => Some(*s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short name of the value kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Tag(_) => "tag",
            Value::Number(_) => "number",
            Value::Timestamp(_) => "timestamp",
            Value::Bool(_) => "bool",
            Value::None => "none",
        }
    }
}

/// Numeric value.
///
/// Integers keep their own variants so counters (views, likes) are compared
/// and summed exactly; mixed comparisons fall back to `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Returns the value as an exact integer, or `None` for floats.
    pub fn to_i128(self) -> Option<i128> {
        match self {
            Number::I64(n) => Some(i128::from(n)),
            Number::U64(n) => Some(i128::from(n)),
            Number::F64(_) => None,
        }
    }

    /// Compares two numbers, handling mixed types. `None` for NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self.to_i128(), other.to_i128()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident, $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64, i64: i8, i16, i32, i64, isize);
number_from!(U64, u64: u8, u16, u32, u64, usize);
number_from!(F64, f64: f32, f64);

/// Instant represented as milliseconds since the Unix epoch.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use marquee_query::Timestamp;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
/// let ts = Timestamp::from(at);
/// assert_eq!(ts.to_datetime(), Some(at));
/// assert!(Timestamp(1000) < Timestamp(2000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a timestamp from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Returns milliseconds since the Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Converts back to a UTC datetime. `None` if out of chrono's range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(at: DateTime<Tz>) -> Self {
        Timestamp(at.timestamp_millis())
    }
}
