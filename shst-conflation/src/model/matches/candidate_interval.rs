use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{LinearOffsets, MatchedSegment, SourceId};
use crate::{config::constants::OFFSET_EPSILON_KM, model::ConflationError};

/// a proposed alignment of one source feature onto a reference line, as a distance
/// range in km. lower `hierarchy_rank` takes precedence when intervals of the same
/// source overlap.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CandidateInterval {
    pub source: SourceId,
    pub feature_id: String,
    pub hierarchy_rank: i64,
    pub is_primary: bool,
    pub poff: f64,
    pub noff: f64,
    pub start_dist: f64,
    pub end_dist: f64,
    pub properties: Map<String, Value>,
}

impl CandidateInterval {
    pub fn from_offsets(segment: &MatchedSegment, offsets: LinearOffsets) -> CandidateInterval {
        CandidateInterval {
            source: segment.source.clone(),
            feature_id: segment.feature_id.clone(),
            hierarchy_rank: segment.hierarchy_rank,
            is_primary: segment.is_primary,
            poff: offsets.poff,
            noff: offsets.noff,
            start_dist: offsets.start_dist,
            end_dist: offsets.end_dist,
            properties: segment.properties.clone(),
        }
    }

    pub fn length(&self) -> f64 {
        self.end_dist - self.start_dist
    }

    /// a copy of this interval spanning `[start_dist, end_dist]`.
    pub fn with_range(&self, start_dist: f64, end_dist: f64, reference_length_km: f64) -> Self {
        let offsets = LinearOffsets::new(start_dist, end_dist, reference_length_km);
        CandidateInterval {
            poff: offsets.poff,
            noff: offsets.noff,
            start_dist,
            end_dist,
            ..self.clone()
        }
    }

    /// true if `[start, end]` lies within this interval.
    pub fn covers(&self, start: f64, end: f64) -> bool {
        self.start_dist <= start + OFFSET_EPSILON_KM && end <= self.end_dist + OFFSET_EPSILON_KM
    }

    /// checks `0 <= start_dist < end_dist <= length`.
    pub fn validate(
        &self,
        reference_id: &str,
        reference_length_km: f64,
    ) -> Result<(), ConflationError> {
        let fail = |message: String| ConflationError::InvalidCandidateInterval {
            reference_id: reference_id.to_string(),
            feature_id: self.feature_id.clone(),
            message,
        };
        if !(self.start_dist.is_finite() && self.end_dist.is_finite()) {
            return Err(fail(format!(
                "non-finite range [{}, {}]",
                self.start_dist, self.end_dist
            )));
        }
        if self.start_dist < -OFFSET_EPSILON_KM {
            return Err(fail(format!("negative start {}", self.start_dist)));
        }
        if self.end_dist > reference_length_km + OFFSET_EPSILON_KM {
            return Err(fail(format!(
                "end {} is beyond reference length {reference_length_km}",
                self.end_dist
            )));
        }
        if self.start_dist >= self.end_dist {
            return Err(fail(format!(
                "empty range [{}, {}]",
                self.start_dist, self.end_dist
            )));
        }
        Ok(())
    }
}
