//! Project keys: a machine identifier joined to a canonical path key.
//!
//! A [`ProjectKey`] renders as `<machine-id>:<canonical-key>`. Canonical keys
//! never contain `:`, so a project key always splits back at its last `:`
//! even when the machine identifier itself contains one.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::KeyError;
use crate::normalize::{CanonicalKey, PathNormalizer};

/// Delimiter between the machine identifier and the canonical key.
pub const PROJECT_KEY_DELIMITER: char = ':';

/// Identifies one project directory on one machine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectKey {
    machine_id: String,
    key: CanonicalKey,
}

impl ProjectKey {
    /// Joins `machine_id` and `key`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidMachineId`] if `machine_id` is blank.
    pub fn new(machine_id: &str, key: CanonicalKey) -> Result<Self, KeyError> {
        let machine_id = machine_id.trim();
        if machine_id.is_empty() {
            return Err(KeyError::InvalidMachineId);
        }
        Ok(Self {
            machine_id: machine_id.to_string(),
            key,
        })
    }

    #[must_use]
    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    #[must_use]
    pub fn canonical_key(&self) -> &CanonicalKey {
        &self.key
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.machine_id, PROJECT_KEY_DELIMITER, self.key)
    }
}

impl FromStr for ProjectKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || KeyError::InvalidProjectKey(s.to_string());

        let (machine_id, key) = s.rsplit_once(PROJECT_KEY_DELIMITER).ok_or_else(invalid)?;
        let key = CanonicalKey::parse(key).ok_or_else(invalid)?;
        if machine_id.trim().is_empty() || machine_id.trim() != machine_id {
            return Err(invalid());
        }

        Self::new(machine_id, key)
    }
}

impl Serialize for ProjectKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Builds [`ProjectKey`]s for a single machine.
#[derive(Debug, Clone)]
pub struct ProjectKeyBuilder {
    machine_id: String,
    normalizer: PathNormalizer,
}

impl ProjectKeyBuilder {
    /// Creates a builder for `machine_id`, normalizing paths with `normalizer`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidMachineId`] if `machine_id` is blank.
    pub fn new(machine_id: &str, normalizer: PathNormalizer) -> Result<Self, KeyError> {
        let machine_id = machine_id.trim();
        if machine_id.is_empty() {
            return Err(KeyError::InvalidMachineId);
        }
        Ok(Self {
            machine_id: machine_id.to_string(),
            normalizer,
        })
    }

    #[must_use]
    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    #[must_use]
    pub fn normalizer(&self) -> &PathNormalizer {
        &self.normalizer
    }

    /// Joins this builder's machine identifier with an existing key.
    #[must_use]
    pub fn build(&self, key: CanonicalKey) -> ProjectKey {
        ProjectKey {
            machine_id: self.machine_id.clone(),
            key,
        }
    }

    /// Normalizes `raw_path` and builds its project key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidPath`] if the path cannot be normalized.
    pub fn key_for_path(&self, raw_path: &str) -> Result<ProjectKey, KeyError> {
        self.normalizer.normalize(raw_path).map(|key| self.build(key))
    }
}
