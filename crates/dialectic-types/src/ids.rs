// Identifier newtypes for propositions and relationships

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the string representation
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(concat!($what, " id cannot be empty").to_string());
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Stable, opaque identifier of a proposition within one request
    PropositionId,
    "Proposition"
);

string_id!(
    /// Stable, opaque identifier of a relationship within one request
    RelationshipId,
    "Relationship"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_rejects_blank() {
        assert_eq!("  p1 ".parse::<PropositionId>().unwrap().as_str(), "p1");
        assert!("   ".parse::<RelationshipId>().is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = PropositionId::new("claim-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"claim-7\"");
    }
}
