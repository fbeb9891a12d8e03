use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// what to do when overlap resolution leaves two intervals of one source overlapping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// surface the residual overlap as a [crate::model::ConflationError::ResolverInvariantViolation]
    #[default]
    Fail,
    /// log the residual overlap and keep the cover as-is
    Warn,
}

impl Display for OverlapPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlapPolicy::Fail => write!(f, "fail"),
            OverlapPolicy::Warn => write!(f, "warn"),
        }
    }
}
