use std::time::Duration;

use thiserror::Error;

use crate::model::matches::SourceId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchStreamError {
    #[error("match source '{source_id}' failed: {message}")]
    SourceError { source_id: SourceId, message: String },
    #[error("match source '{source_id}' is not sorted: reference '{found}' follows '{previous}'")]
    OrderViolation {
        source_id: SourceId,
        previous: String,
        found: String,
    },
    #[error("match source '{source_id}' produced nothing within {timeout:?}")]
    SourceTimeout {
        source_id: SourceId,
        timeout: Duration,
    },
    #[error("match aggregator stopped before all sources were consumed")]
    Shutdown,
}
