//! # Autonomic Identifiers
//!
//! [`Aid`] names a KERI controller: the issuee of a credential, or the
//! registry a credential is anchored in. It is a distinct type from
//! [`Said`](crate::Said) so the two can never be swapped at a call site.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An autonomic identifier (AID) of a KERI controller.
///
/// # Validation
///
/// - Must contain at least one non-whitespace character.
/// - Must not contain control characters.
///
/// Prefix formats are not checked here; resolution of the identifier is the
/// credential store's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Aid(String);

impl Aid {
    /// Create an AID from a string, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyAid`] or [`ValidationError::InvalidAid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::EmptyAid);
        }
        if s.chars().any(char::is_control) {
            return Err(ValidationError::InvalidAid(s));
        }
        Ok(Self(s))
    }

    /// Access the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Aid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Aid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Aid {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
