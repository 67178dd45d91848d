//! Strongly-typed ID wrappers for students, employees and fee records
//!
//! Records are shown with a short prefixed form (`stu-1a2b3c4d`); lookups
//! accept either that short form or the full UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a full UUID string (prefix optional)
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                s.parse()
            }

            /// Check whether a user-typed identifier refers to this ID.
            ///
            /// Matches the full UUID, the displayed short form, or the short
            /// form without its prefix.
            pub fn matches(&self, identifier: &str) -> bool {
                let identifier = identifier.trim().to_lowercase();
                if identifier.is_empty() {
                    return false;
                }
                let full = self.0.to_string();
                let short = identifier
                    .strip_prefix($display_prefix)
                    .unwrap_or(&identifier);
                full == short || (short.len() >= 8 && full.starts_with(short))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(StudentId, "stu-");
define_id!(EmployeeId, "emp-");
define_id!(FeeId, "fee-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = StudentId::new();
        let display = id.to_string();
        assert!(display.starts_with("stu-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_matches_short_and_full_forms() {
        let id = FeeId::new();
        let full = id.as_uuid().to_string();

        assert!(id.matches(&full));
        assert!(id.matches(&id.to_string()));
        assert!(id.matches(&full[..8]));
        assert!(!id.matches("fee-"));
        assert!(!id.matches(""));
        assert!(!id.matches(&FeeId::new().to_string()));
    }

    #[test]
    fn test_parse_with_prefix() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: EmployeeId = format!("emp-{}", uuid_str).parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
        assert_eq!(EmployeeId::parse(uuid_str).unwrap(), id);
    }

    #[test]
    fn test_id_serialization() {
        let id = StudentId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: StudentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
