//! Validated project key type.

use super::ProjectDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_KEY_LENGTH: usize = 2;
const MAX_KEY_LENGTH: usize = 5;

/// Short, unique, upper-case project key such as `TP` or `CORE`.
///
/// The key prefixes every task key issued inside the project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectKey(String);

impl ProjectKey {
    /// Creates a validated project key.
    ///
    /// The input is trimmed and upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidProjectKey`] unless the
    /// normalized value has 2-5 ASCII alphanumeric characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ProjectDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_uppercase();
        let length = normalized.chars().count();
        let is_valid = (MIN_KEY_LENGTH..=MAX_KEY_LENGTH).contains(&length)
            && normalized.chars().all(|c| c.is_ascii_alphanumeric());

        if !is_valid {
            return Err(ProjectDomainError::InvalidProjectKey(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProjectKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
