use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::matches::{MatchedSegment, SourceId};

/// every source's matched segments for a single reference line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AggregatedReferenceMatches {
    pub reference_id: String,
    pub matches: BTreeMap<SourceId, Vec<MatchedSegment>>,
}

impl AggregatedReferenceMatches {
    pub fn new(reference_id: String) -> Self {
        Self {
            reference_id,
            matches: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, source: SourceId, segment: MatchedSegment) {
        self.matches.entry(source).or_default().push(segment);
    }

    pub fn segments(&self, source: &SourceId) -> &[MatchedSegment] {
        self.matches.get(source).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn sources(&self) -> impl Iterator<Item = &SourceId> {
        self.matches.keys()
    }

    pub fn len(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;
    use serde_json::Map;

    fn segment(source: &str, feature_id: &str) -> MatchedSegment {
        MatchedSegment {
            source: SourceId::from(source),
            feature_id: feature_id.to_string(),
            reference_id: String::from("r1"),
            hierarchy_rank: 0,
            is_primary: true,
            geometry: line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0)],
            from_intersection_id: None,
            to_intersection_id: None,
            properties: Map::new(),
        }
    }

    #[test]
    fn test_push_groups_by_source() {
        let mut group = AggregatedReferenceMatches::new(String::from("r1"));
        assert!(group.is_empty());
        assert!(group.segments(&SourceId::from("ris")).is_empty());

        group.push(SourceId::from("ris"), segment("ris", "a"));
        group.push(SourceId::from("hpms"), segment("hpms", "b"));
        group.push(SourceId::from("ris"), segment("ris", "c"));
        assert!(!group.is_empty());
        assert_eq!(group.len(), 3);
        assert_eq!(group.segments(&SourceId::from("ris")).len(), 2);
        let sources = group.sources().map(|s| s.as_str()).collect::<Vec<_>>();
        assert_eq!(sources, vec!["hpms", "ris"]);
    }
}
