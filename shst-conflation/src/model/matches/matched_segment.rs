use geo::LineString;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::SourceId;
use crate::model::ConflationError;

/// one section of a target map feature aligned onto a single reference line by the
/// external matcher. its geometry runs in the reference line's direction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchedSegment {
    pub source: SourceId,
    pub feature_id: String,
    pub reference_id: String,
    #[serde(default)]
    pub hierarchy_rank: i64,
    #[serde(default = "default_is_primary")]
    pub is_primary: bool,
    pub geometry: LineString<f64>,
    #[serde(default)]
    pub from_intersection_id: Option<String>,
    #[serde(default)]
    pub to_intersection_id: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

fn default_is_primary() -> bool {
    true
}

impl MatchedSegment {
    /// rejects records missing their identifying properties or carrying a geometry
    /// with fewer than two distinct coordinates.
    pub fn validate(&self) -> Result<(), ConflationError> {
        if self.source.as_str().is_empty() {
            return Err(ConflationError::UpstreamDataDefect(format!(
                "matched segment of feature '{}' has no source",
                self.feature_id
            )));
        }
        if self.feature_id.is_empty() {
            return Err(ConflationError::UpstreamDataDefect(format!(
                "matched segment from '{}' on reference '{}' has no feature id",
                self.source, self.reference_id
            )));
        }
        if self.reference_id.is_empty() {
            return Err(ConflationError::UpstreamDataDefect(format!(
                "matched segment of feature '{}' from '{}' has no reference id",
                self.feature_id, self.source
            )));
        }
        let distinct = self.geometry.0.iter().dedup().count();
        if distinct < 2 {
            return Err(ConflationError::UpstreamDataDefect(format!(
                "matched segment of feature '{}' from '{}' has a degenerate geometry",
                self.feature_id, self.source
            )));
        }
        if self.geometry.0.iter().any(|c| !(c.x.is_finite() && c.y.is_finite())) {
            return Err(ConflationError::UpstreamDataDefect(format!(
                "matched segment of feature '{}' from '{}' has non-finite coordinates",
                self.feature_id, self.source
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    fn segment(geometry: LineString<f64>) -> MatchedSegment {
        MatchedSegment {
            source: SourceId::from("hpms"),
            feature_id: String::from("f1"),
            reference_id: String::from("r1"),
            hierarchy_rank: 0,
            is_primary: true,
            geometry,
            from_intersection_id: None,
            to_intersection_id: None,
            properties: Map::new(),
        }
    }

    #[test]
    fn test_valid_segment() {
        let s = segment(line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0)]);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_degenerate_geometry_rejected() {
        let s = segment(line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 0.0)]);
        assert!(matches!(
            s.validate(),
            Err(ConflationError::UpstreamDataDefect(_))
        ));
    }

    #[test]
    fn test_missing_feature_id_rejected() {
        let mut s = segment(line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0)]);
        s.feature_id = String::new();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "source": "hpms",
            "feature_id": "f9",
            "reference_id": "r1",
            "geometry": [{"x": 0.0, "y": 0.0}, {"x": 0.001, "y": 0.0}]
        }"#;
        let s: MatchedSegment = serde_json::from_str(json).unwrap();
        assert!(s.is_primary);
        assert_eq!(s.hierarchy_rank, 0);
        assert_eq!(s.from_intersection_id, None);
    }
}
