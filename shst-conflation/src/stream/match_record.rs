use serde::{Deserialize, Serialize};

use crate::model::{
    matches::{MatchKey, MatchedSegment},
    ConflationError,
};

/// one matched segment as read from a source's staging store, under its key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub key: MatchKey,
    pub segment: MatchedSegment,
}

impl MatchRecord {
    pub fn new(key: MatchKey, segment: MatchedSegment) -> MatchRecord {
        MatchRecord { key, segment }
    }

    /// pairs a raw `{reference_id}##{segment_index}##{data_source_id}` key with its
    /// segment, rejecting keys that name a different reference line.
    pub fn from_keyed(key: &str, segment: MatchedSegment) -> Result<MatchRecord, ConflationError> {
        let key: MatchKey = key.parse()?;
        if key.reference_id != segment.reference_id {
            return Err(ConflationError::UpstreamDataDefect(format!(
                "match key '{key}' does not belong to reference '{}'",
                segment.reference_id
            )));
        }
        Ok(MatchRecord { key, segment })
    }

    pub fn reference_id(&self) -> &str {
        &self.key.reference_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::matches::SourceId;
    use geo::line_string;
    use serde_json::Map;

    fn segment(reference_id: &str) -> MatchedSegment {
        MatchedSegment {
            source: SourceId::from("npmrds"),
            feature_id: String::from("tmc1"),
            reference_id: reference_id.to_string(),
            hierarchy_rank: 2,
            is_primary: true,
            geometry: line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0)],
            from_intersection_id: None,
            to_intersection_id: None,
            properties: Map::new(),
        }
    }

    #[test]
    fn test_from_keyed() {
        let record = MatchRecord::from_keyed("r1##0##npmrds", segment("r1")).unwrap();
        assert_eq!(record.reference_id(), "r1");
        assert_eq!(record.key.segment_index, 0);
    }

    #[test]
    fn test_key_for_other_reference() {
        assert!(MatchRecord::from_keyed("r2##0##npmrds", segment("r1")).is_err());
    }
}
