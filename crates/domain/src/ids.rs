use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! define_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Build an id from raw input, trimming whitespace and rejecting blanks.
            pub fn new(value: impl AsRef<str>) -> Result<Self, DomainError> {
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(concat!($label, " is required")));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<&str> for $name {
            type Error = DomainError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

// Campaign scope
define_id!(CampaignId, "campaign id");
define_id!(SessionId, "session id");

// Projection entities
define_id!(CharacterId, "character id");
define_id!(AdversaryId, "adversary id");
define_id!(CountdownId, "countdown id");

// Loadout
define_id!(CardId, "card id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_trimmed() {
        let id = CharacterId::new("  char-1 ").unwrap();
        assert_eq!(id.as_str(), "char-1");
        assert_eq!(id.to_string(), "char-1");
    }

    #[test]
    fn blank_ids_are_rejected() {
        let err = CampaignId::new("   ").unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
        assert!(err.to_string().contains("campaign id"));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = CountdownId::new("clock").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"clock\"");
    }
}
