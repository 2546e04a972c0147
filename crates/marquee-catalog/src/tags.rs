//! Closed sets of categorical values carried by dashboard entities.
//!
//! Each tag serializes to, and is queried as, the string the REST API uses.

use std::fmt;
use std::str::FromStr;

use marquee_query::Tagged;
use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! tags {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $($variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $tag)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The external tag.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }

            /// Every external tag, in declaration order.
            pub fn tags() -> impl Iterator<Item = &'static str> {
                Self::ALL.iter().map(|t| t.as_str())
            }
        }

        impl Tagged for $name {
            fn tag(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok($name::$variant),)+
                    other => Err(UnknownTag {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

tags! {
    /// Account role.
    Role as "role" {
        Admin => "admin",
        Moderator => "moderator",
        Editor => "editor",
        User => "user",
    }
}

tags! {
    /// Story (episode) lifecycle.
    StoryStatus as "story status" {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

tags! {
    /// What a script is written for.
    ScriptKind as "script type" {
        Movie => "movie",
        Series => "series",
        Short => "short",
    }
}

tags! {
    /// Script review lifecycle.
    ScriptStatus as "script status" {
        Draft => "draft",
        InReview => "inReview",
        Approved => "approved",
        Rejected => "rejected",
    }
}

tags! {
    /// Feedback category chosen by the submitter.
    FeedbackKind as "feedback type" {
        Bug => "bug",
        Feature => "feature",
        Complaint => "complaint",
        Praise => "praise",
        Other => "other",
    }
}

tags! {
    /// Moderation state of a feedback item.
    FeedbackStatus as "feedback status" {
        Open => "open",
        InProgress => "inProgress",
        Resolved => "resolved",
        Closed => "closed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_serde_names() {
        for role in Role::ALL {
            let json = serde_json::to_string(role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.tag()));
        }
        let status: ScriptStatus = serde_json::from_str("\"inReview\"").unwrap();
        assert_eq!(status, ScriptStatus::InReview);
    }

    #[test]
    fn parse_round_trip_and_errors() {
        assert_eq!("praise".parse::<FeedbackKind>(), Ok(FeedbackKind::Praise));
        let err = "superuser".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "unknown role 'superuser'");
    }

    #[test]
    fn tag_lists() {
        assert_eq!(
            StoryStatus::tags().collect::<Vec<_>>(),
            ["draft", "published", "archived"]
        );
        assert_eq!(FeedbackStatus::InProgress.to_string(), "inProgress");
    }
}
