use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a cleanup pass does when one of its callbacks fails.
///
/// Either way the pending list is empty once the pass returns, so the next
/// registration always starts a fresh session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Attempt every remaining callback, then report all failures together.
    #[default]
    #[serde(rename = "continue", alias = "continue-and-aggregate")]
    ContinueAndAggregate,
    /// Stop at the first failure. Callbacks that had not run yet are dropped
    /// unrun and counted as skipped.
    #[serde(rename = "fail-fast")]
    FailFast,
}

impl FailurePolicy {
    /// Canonical configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::ContinueAndAggregate => "continue",
            FailurePolicy::FailFast => "fail-fast",
        }
    }

    pub fn is_fail_fast(&self) -> bool {
        matches!(self, FailurePolicy::FailFast)
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "continue" | "continue-and-aggregate" | "aggregate" => {
                Ok(FailurePolicy::ContinueAndAggregate)
            }
            "fail-fast" | "failfast" | "abort" => Ok(FailurePolicy::FailFast),
            _ => Err(Error::invalid_policy(s)),
        }
    }
}
