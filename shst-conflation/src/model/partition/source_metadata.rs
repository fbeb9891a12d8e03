use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::matches::CandidateInterval;

/// what one source contributes to a partition it covers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SourceMetadata {
    pub feature_id: String,
    pub hierarchy_rank: i64,
    pub is_primary: bool,
    /// range of the covering interval, which may extend beyond the partition.
    pub start_dist: f64,
    pub end_dist: f64,
    pub properties: Map<String, Value>,
}

impl From<&CandidateInterval> for SourceMetadata {
    fn from(value: &CandidateInterval) -> Self {
        SourceMetadata {
            feature_id: value.feature_id.clone(),
            hierarchy_rank: value.hierarchy_rank,
            is_primary: value.is_primary,
            start_dist: value.start_dist,
            end_dist: value.end_dist,
            properties: value.properties.clone(),
        }
    }
}
