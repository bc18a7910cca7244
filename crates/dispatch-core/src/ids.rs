//! Newtype wrappers for identifiers to ensure type safety.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a sample and its execution record.
///
/// An execution is keyed by the id of the sample that created it, so one
/// sample id maps to at most one execution for the controller's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SampleId(String);

impl SampleId {
    /// Create a new SampleId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random SampleId.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SampleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SampleId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Base URL of a worker endpoint. Registry entries are keyed by this.
///
/// The trailing slash is stripped on construction so that route paths can be
/// appended with a plain `format!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WorkerAddr(String);

impl<'de> Deserialize<'de> for WorkerAddr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Route through `new` so deserialized addresses are normalized the
        // same way constructed ones are.
        Ok(Self::new(String::deserialize(deserializer)?))
    }
}

impl WorkerAddr {
    /// Create a new WorkerAddr from a base URL.
    pub fn new(addr: impl Into<String>) -> Self {
        let addr = addr.into();
        Self(addr.trim_end_matches('/').to_owned())
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for WorkerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WorkerAddr {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for WorkerAddr {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
