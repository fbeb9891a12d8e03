use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{OsmNodeId, OsmWayId, RoadClass};

/// a run of one OSM way that composes part of a reference line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WaySection {
    pub way_id: OsmWayId,
    pub node_ids: Vec<OsmNodeId>,
    pub road_class: RoadClass,
    #[serde(default)]
    pub one_way: bool,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// the subset of a way section copied onto each partition it covers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WaySectionMetadata {
    pub way_id: OsmWayId,
    pub road_class: RoadClass,
    pub one_way: bool,
    pub properties: Map<String, Value>,
}

impl WaySection {
    pub fn hierarchy_rank(&self) -> i64 {
        self.road_class.rank()
    }

    pub fn first_node(&self) -> Option<OsmNodeId> {
        self.node_ids.first().copied()
    }

    pub fn last_node(&self) -> Option<OsmNodeId> {
        self.node_ids.last().copied()
    }
}

impl From<&WaySection> for WaySectionMetadata {
    fn from(value: &WaySection) -> Self {
        Self {
            way_id: value.way_id,
            road_class: value.road_class,
            one_way: value.one_way,
            properties: value.properties.clone(),
        }
    }
}

/// concatenates the node ids of consecutive way sections, collapsing the node shared
/// at each boundary (and any other adjacent repeats).
pub fn node_id_sequence(sections: &[WaySection]) -> Vec<OsmNodeId> {
    sections
        .iter()
        .flat_map(|s| s.node_ids.iter().copied())
        .dedup()
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(way: i64, nodes: &[i64]) -> WaySection {
        WaySection {
            way_id: OsmWayId(way),
            node_ids: nodes.iter().map(|n| OsmNodeId(*n)).collect(),
            road_class: RoadClass::Residential,
            one_way: false,
            properties: Map::new(),
        }
    }

    #[test]
    fn test_shared_boundaries_collapsed() {
        let sections = vec![section(10, &[1, 2, 3]), section(11, &[3, 4])];
        let expected: Vec<OsmNodeId> = [1, 2, 3, 4].into_iter().map(OsmNodeId).collect();
        assert_eq!(node_id_sequence(&sections), expected);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{ "way_id": 7, "node_ids": [1, 2], "road_class": "Primary" }"#;
        let s: WaySection = serde_json::from_str(json).unwrap();
        assert_eq!(s.way_id, OsmWayId(7));
        assert!(!s.one_way);
        assert!(s.properties.is_empty());
        assert_eq!(s.hierarchy_rank(), 2);
        assert_eq!(s.last_node(), Some(OsmNodeId(2)));
    }
}
