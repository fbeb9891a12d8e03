use std::collections::BTreeMap;

use geo::LineString;
use itertools::Itertools;

use super::{split_points, validate_partitions};
use crate::{
    config::constants::OFFSET_EPSILON_KM,
    model::{
        matches::{CandidateInterval, SourceId},
        partition::{Partition, SourceMetadata},
        reference::{OsmWayId, ReferenceLine, ReferenceVertex, WaySectionMetadata},
        ConflationError,
    },
    util::geo_utils,
};

/// splits a reference line at every boundary of every source's resolved cover and
/// stamps each resulting partition with the sources covering it.
///
/// intervals of the reserved OSM source identify the way section beneath each
/// partition; all other sources are recorded by source id. the partitions are
/// validated against the reference line's node sequence before being returned.
///
/// # Arguments
///
/// * `reference` - the line to partition
/// * `covers`    - non-overlapping resolved intervals, per source
///
/// # Returns
///
/// partitions ordered along the line, or an empty list when no source has any interval.
pub fn partition_reference(
    reference: &ReferenceLine,
    covers: &BTreeMap<SourceId, Vec<CandidateInterval>>,
) -> Result<Vec<Partition>, ConflationError> {
    if covers.values().all(|cover| cover.is_empty()) {
        return Ok(vec![]);
    }
    let length = reference.length_km();
    let points = split_points(length, covers.values().flatten());
    let (vertices, point_indices) =
        insert_split_vertices(reference.id(), reference.vertices().vertices(), &points, length)?;

    let total_segments = points.len() - 1;
    let mut partitions = points
        .iter()
        .tuple_windows()
        .zip(point_indices.iter().tuple_windows())
        .enumerate()
        .map(|(segment_index, ((start, end), (from, to)))| {
            let span = &vertices[*from..=*to];
            Partition {
                reference_id: reference.id().to_string(),
                from_intersection_id: reference.from_intersection_id().to_string(),
                to_intersection_id: reference.to_intersection_id().to_string(),
                segment_index,
                total_segments,
                start_dist: *start,
                end_dist: *end,
                node_ids: span.iter().map(|v| v.node_id).collect_vec(),
                geometry: LineString::new(span.iter().map(|v| v.coord).collect_vec()),
                way_section: None,
                sources: BTreeMap::new(),
            }
        })
        .collect_vec();

    for (source, cover) in covers.iter() {
        let mut claims: Vec<Option<&str>> = vec![None; partitions.len()];
        for interval in cover.iter() {
            for (idx, partition) in partitions.iter_mut().enumerate() {
                if !interval.covers(partition.start_dist, partition.end_dist) {
                    continue;
                }
                if let Some(existing) = claims[idx] {
                    return Err(ConflationError::PartitionConflict {
                        reference_id: reference.id().to_string(),
                        source_id: source.clone(),
                        segment_index: idx,
                        existing: existing.to_string(),
                        conflicting: interval.feature_id.clone(),
                    });
                }
                claims[idx] = Some(interval.feature_id.as_str());
                if source.is_osm() {
                    partition.way_section = Some(way_section_metadata(reference, interval)?);
                } else {
                    partition
                        .sources
                        .insert(source.clone(), SourceMetadata::from(interval));
                }
            }
        }
    }

    validate_partitions(reference, &partitions)?;
    log::debug!(
        "reference '{}' split into {} partitions",
        reference.id(),
        partitions.len()
    );
    Ok(partitions)
}

/// merges the split points into the vertex sequence, reusing any vertex already at a
/// split point and otherwise inserting a synthetic vertex between its neighbors.
///
/// # Returns
///
/// the augmented vertices and, for each split point, the index of its vertex.
fn insert_split_vertices(
    reference_id: &str,
    vertices: &[ReferenceVertex],
    points: &[f64],
    length: f64,
) -> Result<(Vec<ReferenceVertex>, Vec<usize>), ConflationError> {
    let mut augmented: Vec<ReferenceVertex> = Vec::with_capacity(vertices.len() + points.len());
    let mut point_indices = Vec::with_capacity(points.len());
    let mut remaining = vertices.iter().peekable();
    for &point in points.iter() {
        while let Some(v) = remaining.next_if(|v| v.poff < point - OFFSET_EPSILON_KM) {
            augmented.push(*v);
        }
        match remaining.next_if(|v| (v.poff - point).abs() <= OFFSET_EPSILON_KM) {
            Some(existing) => augmented.push(*existing),
            None => {
                let coord = match (augmented.last(), remaining.peek()) {
                    (Some(prev), Some(next)) if next.poff > prev.poff => geo_utils::lerp_coord(
                        prev.coord,
                        next.coord,
                        (point - prev.poff) / (next.poff - prev.poff),
                    ),
                    (Some(prev), _) => prev.coord,
                    (None, Some(next)) => next.coord,
                    (None, None) => {
                        return Err(ConflationError::GeometryInconsistency {
                            reference_id: reference_id.to_string(),
                            message: String::from("cannot split a reference line without vertices"),
                        })
                    }
                };
                augmented.push(ReferenceVertex::synthetic(coord, point, length));
            }
        }
        point_indices.push(augmented.len() - 1);
    }
    augmented.extend(remaining.copied());
    Ok((augmented, point_indices))
}

fn way_section_metadata(
    reference: &ReferenceLine,
    interval: &CandidateInterval,
) -> Result<WaySectionMetadata, ConflationError> {
    let way_id = interval
        .feature_id
        .parse::<i64>()
        .map(OsmWayId)
        .map_err(|e| {
            ConflationError::InternalError(format!(
                "OSM interval on reference '{}' has invalid way id '{}': {e}",
                reference.id(),
                interval.feature_id
            ))
        })?;
    reference
        .way_section(way_id)
        .map(WaySectionMetadata::from)
        .ok_or_else(|| {
            ConflationError::InternalError(format!(
                "reference '{}' has no way section {way_id}",
                reference.id()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::reference::{OsmNodeId, RoadClass, WaySection};
    use geo::line_string;
    use serde_json::Map;

    fn section(way: i64, nodes: &[i64]) -> WaySection {
        WaySection {
            way_id: OsmWayId(way),
            node_ids: nodes.iter().map(|n| OsmNodeId(*n)).collect(),
            road_class: RoadClass::Tertiary,
            one_way: false,
            properties: Map::new(),
        }
    }

    fn reference() -> ReferenceLine {
        ReferenceLine::new(
            String::from("ref"),
            String::from("i1"),
            String::from("i2"),
            line_string![
                (x: 0.0, y: 0.0),
                (x: 0.01, y: 0.0),
                (x: 0.02, y: 0.0),
            ],
            vec![section(100, &[1, 2]), section(101, &[2, 3])],
        )
        .unwrap()
    }

    fn interval(feature_id: &str, start: f64, end: f64, length: f64) -> CandidateInterval {
        CandidateInterval {
            source: SourceId::from("hpms"),
            feature_id: feature_id.to_string(),
            hierarchy_rank: 0,
            is_primary: true,
            poff: start,
            noff: length - end,
            start_dist: start,
            end_dist: end,
            properties: Map::new(),
        }
    }

    fn covers(
        reference: &ReferenceLine,
        hpms: Vec<CandidateInterval>,
    ) -> BTreeMap<SourceId, Vec<CandidateInterval>> {
        BTreeMap::from([
            (SourceId::osm(), reference.way_section_intervals().unwrap()),
            (SourceId::from("hpms"), hpms),
        ])
    }

    #[test]
    fn test_partition_with_synthetic_vertices() {
        let reference = reference();
        let length = reference.length_km();
        let u = reference.vertices().vertices()[1].poff;
        let covers = covers(&reference, vec![interval("h1", u / 2.0, 1.5 * u, length)]);
        let partitions = partition_reference(&reference, &covers).unwrap();

        assert_eq!(partitions.len(), 4);
        assert!(partitions.iter().all(|p| p.total_segments == 4));
        assert_eq!(partitions[0].start_dist, 0.0);
        assert_eq!(partitions[3].end_dist, length);
        assert_eq!(partitions[0].node_ids, vec![Some(OsmNodeId(1)), None]);
        assert_eq!(partitions[0].first_node(), Some(OsmNodeId(1)));
        assert_eq!(partitions[0].last_node(), None);
        assert_eq!(partitions[1].last_node(), Some(OsmNodeId(2)));
        assert_eq!(partitions[1].node_ids, vec![None, Some(OsmNodeId(2))]);
        assert_eq!(partitions[3].node_ids, vec![None, Some(OsmNodeId(3))]);
        assert!((partitions[0].geometry.0[1].x - 0.005).abs() < 1e-9);

        let hpms = SourceId::from("hpms");
        let covered = partitions
            .iter()
            .map(|p| p.source(&hpms).map(|m| m.feature_id.as_str()))
            .collect_vec();
        assert_eq!(covered, vec![None, Some("h1"), Some("h1"), None]);

        let ways = partitions
            .iter()
            .map(|p| p.way_section.as_ref().map(|w| w.way_id.0))
            .collect_vec();
        assert_eq!(ways, vec![Some(100), Some(100), Some(101), Some(101)]);
    }

    #[test]
    fn test_split_vertices_reuse_existing() {
        let reference = reference();
        let length = reference.length_km();
        let vertices = reference.vertices().vertices();
        let u = vertices[1].poff;
        let points = [0.0, u / 2.0, u, length];
        let (augmented, indices) =
            insert_split_vertices(reference.id(), vertices, &points, length).unwrap();
        assert_eq!(augmented.len(), 4);
        assert_eq!(indices, vec![0, 1, 2, 3]);
        let synthetic = augmented.iter().map(|v| v.is_synthetic()).collect_vec();
        assert_eq!(synthetic, vec![false, true, false, false]);
        assert!((augmented[1].noff - (length - u / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_boundary_on_existing_vertex() {
        let reference = reference();
        let length = reference.length_km();
        let u = reference.vertices().vertices()[1].poff;
        let covers = covers(&reference, vec![interval("h1", 0.0, u, length)]);
        let partitions = partition_reference(&reference, &covers).unwrap();
        assert_eq!(partitions.len(), 2);
        assert!(partitions.iter().flat_map(|p| p.node_ids.iter()).all(|n| n.is_some()));
        assert_eq!(partitions[1].segment_index, 1);
        assert!(partitions[1].sources.is_empty());
    }

    #[test]
    fn test_overlapping_claims_conflict() {
        let reference = reference();
        let length = reference.length_km();
        let covers = covers(
            &reference,
            vec![
                interval("h1", 0.0, length * 0.6, length),
                interval("h2", length * 0.4, length, length),
            ],
        );
        assert!(matches!(
            partition_reference(&reference, &covers),
            Err(ConflationError::PartitionConflict { .. })
        ));
    }

    #[test]
    fn test_no_intervals_no_partitions() {
        let reference = reference();
        let covers = BTreeMap::from([(SourceId::from("hpms"), vec![])]);
        assert!(partition_reference(&reference, &covers).unwrap().is_empty());
    }
}
