use itertools::Itertools;

use crate::{
    config::constants::OFFSET_EPSILON_KM,
    model::{partition::Partition, reference::ReferenceLine, ConflationError},
};

/// checks that partitions tile the reference line and together reproduce its node
/// sequence: consecutive partitions share their boundary vertex, and the partitions'
/// OSM nodes, with shared boundaries collapsed, equal the reference line's nodes.
pub fn validate_partitions(
    reference: &ReferenceLine,
    partitions: &[Partition],
) -> Result<(), ConflationError> {
    let fail = |message: String| ConflationError::GeometryInconsistency {
        reference_id: reference.id().to_string(),
        message,
    };
    let (first, last) = match (partitions.first(), partitions.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(()),
    };
    if first.start_dist.abs() > OFFSET_EPSILON_KM
        || (last.end_dist - reference.length_km()).abs() > OFFSET_EPSILON_KM
    {
        return Err(fail(format!(
            "partitions span [{}, {}] of a {} km line",
            first.start_dist,
            last.end_dist,
            reference.length_km()
        )));
    }
    for (a, b) in partitions.iter().tuple_windows() {
        if (a.end_dist - b.start_dist).abs() > OFFSET_EPSILON_KM {
            return Err(fail(format!(
                "partition {} ends at {} but partition {} starts at {}",
                a.segment_index, a.end_dist, b.segment_index, b.start_dist
            )));
        }
        if a.node_ids.last() != b.node_ids.first() {
            return Err(fail(format!(
                "partitions {} and {} do not share a boundary node",
                a.segment_index, b.segment_index
            )));
        }
    }

    let nodes = partitions
        .iter()
        .flat_map(|p| p.node_ids.iter())
        .flatten()
        .copied()
        .dedup()
        .collect_vec();
    if nodes != reference.node_ids() {
        return Err(fail(format!(
            "partition nodes [{}] do not match reference nodes [{}]",
            nodes.iter().join(", "),
            reference.node_ids().iter().join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::reference::{OsmNodeId, OsmWayId, RoadClass, WaySection};
    use geo::{line_string, LineString};
    use serde_json::Map;
    use std::collections::BTreeMap;

    fn reference() -> ReferenceLine {
        ReferenceLine::new(
            String::from("ref"),
            String::from("i1"),
            String::from("i2"),
            line_string![(x: 0.0, y: 0.0), (x: 0.01, y: 0.0)],
            vec![WaySection {
                way_id: OsmWayId(5),
                node_ids: vec![OsmNodeId(1), OsmNodeId(2)],
                road_class: RoadClass::Primary,
                one_way: false,
                properties: Map::new(),
            }],
        )
        .unwrap()
    }

    fn partition(idx: usize, start: f64, end: f64, nodes: Vec<Option<OsmNodeId>>) -> Partition {
        Partition {
            reference_id: String::from("ref"),
            from_intersection_id: String::from("i1"),
            to_intersection_id: String::from("i2"),
            segment_index: idx,
            total_segments: 2,
            start_dist: start,
            end_dist: end,
            node_ids: nodes,
            geometry: LineString::new(vec![]),
            way_section: None,
            sources: BTreeMap::new(),
        }
    }

    #[test]
    fn test_gap_detected() {
        let reference = reference();
        let length = reference.length_km();
        let partitions = vec![
            partition(0, 0.0, 0.3, vec![Some(OsmNodeId(1)), None]),
            partition(1, 0.4, length, vec![None, Some(OsmNodeId(2))]),
        ];
        assert!(validate_partitions(&reference, &partitions).is_err());
    }

    #[test]
    fn test_missing_node_detected() {
        let reference = reference();
        let length = reference.length_km();
        let partitions = vec![
            partition(0, 0.0, 0.3, vec![Some(OsmNodeId(1)), None]),
            partition(1, 0.3, length, vec![None, None]),
        ];
        assert!(matches!(
            validate_partitions(&reference, &partitions),
            Err(ConflationError::GeometryInconsistency { .. })
        ));
    }

    #[test]
    fn test_valid_tiling() {
        let reference = reference();
        let length = reference.length_km();
        let partitions = vec![
            partition(0, 0.0, 0.3, vec![Some(OsmNodeId(1)), None]),
            partition(1, 0.3, length, vec![None, Some(OsmNodeId(2))]),
        ];
        assert!(validate_partitions(&reference, &partitions).is_ok());
    }
}
