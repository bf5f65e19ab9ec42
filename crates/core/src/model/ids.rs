use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an identifier from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

// Backend identifiers are opaque strings (UUIDs in practice), so every id wraps a `String`.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }
        }
    };
}

string_id!(
    /// Unique identifier for a Test
    TestId
);
string_id!(
    /// Unique identifier for a Question within a Test
    QuestionId
);
string_id!(
    /// Unique identifier for an Answer within a Question
    AnswerId
);
string_id!(
    /// Unique identifier for a user (student)
    UserId
);
string_id!(
    /// Unique identifier for a Course
    CourseId
);
string_id!(
    /// Unique identifier for a Subject inside a Course
    SubjectId
);
string_id!(
    /// Unique identifier for a graded Test Result
    ResultId
);

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = TestId::new("t-42");
        assert_eq!(id.to_string(), "t-42");
    }

    #[test]
    fn question_id_from_str_trims() {
        let id: QuestionId = "  q1 ".parse().unwrap();
        assert_eq!(id, QuestionId::new("q1"));
    }

    #[test]
    fn answer_id_from_str_rejects_blank() {
        let result = "   ".parse::<AnswerId>();
        assert!(result.is_err());
    }

    #[test]
    fn debug_names_the_kind() {
        assert_eq!(format!("{:?}", UserId::new("u1")), "UserId(u1)");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&CourseId::new("c-1")).unwrap();
        assert_eq!(json, "\"c-1\"");
    }
}
