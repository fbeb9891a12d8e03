use std::collections::BTreeMap;

use crate::{
    algorithm::{partition_reference, project_matched_segment, resolve_overlaps, snap_offsets},
    config::ConflationConfiguration,
    model::{
        matches::{CandidateInterval, MatchedSegment, SourceId},
        partition::Partition,
        reference::ReferenceLine,
        ConflationError,
    },
    stream::AggregatedReferenceMatches,
};

/// the outcome of conflating every source's matches onto one reference line.
#[derive(Debug, Clone)]
pub struct ReferenceConflation {
    pub reference_id: String,
    pub partitions: Vec<Partition>,
    /// malformed matched segments that were ignored.
    pub segments_skipped: usize,
    /// matched segments whose projected interval was too short or degenerate.
    pub intervals_dropped: usize,
}

/// conflates one reference line: each source's matched segments are projected and
/// snapped onto the line, resolved into a non-overlapping cover per source, and the
/// line is partitioned at every cover boundary along with its own way sections.
///
/// # Errors
///
/// any error that invalidates the reference line as a whole. malformed segments
/// are skipped and counted instead.
pub fn conflate_reference(
    reference: &ReferenceLine,
    group: &AggregatedReferenceMatches,
    config: &ConflationConfiguration,
) -> Result<ReferenceConflation, ConflationError> {
    let tolerance = config.tolerance();
    let length = reference.length_km();
    let mut segments_skipped = 0;
    let mut intervals_dropped = 0;
    let mut covers: BTreeMap<SourceId, Vec<CandidateInterval>> = BTreeMap::new();

    for (source, segments) in group.matches.iter() {
        if source.is_osm() {
            log::warn!(
                "reference '{}': ignoring {} matches from reserved source '{source}'",
                reference.id(),
                segments.len()
            );
            segments_skipped += segments.len();
            continue;
        }
        let mut candidates = Vec::with_capacity(segments.len());
        for segment in segments.iter() {
            if config.primary_matches_only && !segment.is_primary {
                continue;
            }
            if let Err(e) = check_segment(reference, segment) {
                log::warn!("{e}");
                segments_skipped += 1;
                continue;
            }
            let raw = match project_matched_segment(reference, segment, &tolerance)? {
                Some(raw) => raw,
                None => {
                    intervals_dropped += 1;
                    continue;
                }
            };
            let snapped =
                match snap_offsets(&raw, reference.vertices().vertices(), length, &tolerance) {
                    Some(snapped) => snapped,
                    None => {
                        intervals_dropped += 1;
                        continue;
                    }
                };
            let candidate = CandidateInterval::from_offsets(segment, snapped);
            match candidate.validate(reference.id(), length) {
                Ok(()) => candidates.push(candidate),
                Err(e) => {
                    log::warn!("{e}");
                    intervals_dropped += 1;
                }
            }
        }
        let cover = resolve_overlaps(
            reference.id(),
            source,
            candidates,
            length,
            tolerance.split_buffer_km,
            tolerance.split_buffer_km,
            config.overlap_policy,
        )?;
        covers.insert(source.clone(), cover);
    }

    // way sections are authoritative: every one is kept regardless of length
    let way_cover = resolve_overlaps(
        reference.id(),
        &SourceId::osm(),
        reference.way_section_intervals()?,
        length,
        0.0,
        tolerance.split_buffer_km,
        config.overlap_policy,
    )?;
    covers.insert(SourceId::osm(), way_cover);

    let partitions = partition_reference(reference, &covers)?;
    Ok(ReferenceConflation {
        reference_id: reference.id().to_string(),
        partitions,
        segments_skipped,
        intervals_dropped,
    })
}

fn check_segment(reference: &ReferenceLine, segment: &MatchedSegment) -> Result<(), ConflationError> {
    segment.validate()?;
    if segment.reference_id != reference.id() {
        return Err(ConflationError::UpstreamDataDefect(format!(
            "feature '{}' of '{}' is matched to reference '{}' but grouped with '{}'",
            segment.feature_id,
            segment.source,
            segment.reference_id,
            reference.id()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::reference::{OsmNodeId, OsmWayId, RoadClass, WaySection};
    use geo::{line_string, LineString};
    use serde_json::{json, Map};

    fn reference() -> ReferenceLine {
        let section = |way: i64, nodes: &[i64], road_class: RoadClass| WaySection {
            way_id: OsmWayId(way),
            node_ids: nodes.iter().map(|n| OsmNodeId(*n)).collect(),
            road_class,
            one_way: false,
            properties: Map::new(),
        };
        ReferenceLine::new(
            String::from("ref"),
            String::from("i1"),
            String::from("i2"),
            line_string![
                (x: 0.0, y: 0.0),
                (x: 0.01, y: 0.0),
                (x: 0.02, y: 0.0),
                (x: 0.03, y: 0.0),
            ],
            vec![
                section(100, &[1, 2, 3], RoadClass::Secondary),
                section(101, &[3, 4], RoadClass::Residential),
            ],
        )
        .unwrap()
    }

    fn segment(source: &str, feature_id: &str, rank: i64, geometry: LineString<f64>) -> MatchedSegment {
        let mut properties = Map::new();
        properties.insert(String::from("aadt"), json!(1200));
        MatchedSegment {
            source: SourceId::from(source),
            feature_id: feature_id.to_string(),
            reference_id: String::from("ref"),
            hierarchy_rank: rank,
            is_primary: true,
            geometry,
            from_intersection_id: None,
            to_intersection_id: None,
            properties,
        }
    }

    #[test]
    fn test_conflate_two_sources() {
        let reference = reference();
        let mut group = AggregatedReferenceMatches::new(String::from("ref"));
        let hpms = SourceId::from("hpms");
        let npmrds = SourceId::from("npmrds");
        group.push(
            hpms.clone(),
            segment("hpms", "h1", 0, line_string![(x: 0.0, y: 0.0), (x: 0.015, y: 0.0)]),
        );
        group.push(
            hpms.clone(),
            segment("hpms", "h2", 1, line_string![(x: 0.0, y: 0.0), (x: 0.03, y: 0.0)]),
        );
        group.push(
            npmrds.clone(),
            segment("npmrds", "n1", 0, line_string![(x: 0.01, y: 0.0), (x: 0.03, y: 0.0)]),
        );

        let result =
            conflate_reference(&reference, &group, &ConflationConfiguration::default()).unwrap();
        let parts = &result.partitions;
        // split at 0.015 (hpms), 0.01 (npmrds) and 0.02 (way section boundary)
        assert_eq!(parts.len(), 4);
        let hpms_ids = parts
            .iter()
            .map(|p| p.source(&hpms).map(|m| m.feature_id.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(hpms_ids, vec![Some("h1"), Some("h1"), Some("h2"), Some("h2")]);
        let npmrds_ids = parts
            .iter()
            .map(|p| p.source(&npmrds).map(|m| m.feature_id.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(npmrds_ids, vec![None, Some("n1"), Some("n1"), Some("n1")]);
        assert_eq!(
            parts[0].source(&hpms).and_then(|m| m.properties.get("aadt")),
            Some(&json!(1200))
        );
        let ways = parts
            .iter()
            .map(|p| p.way_section.as_ref().map(|w| w.way_id.0))
            .collect::<Vec<_>>();
        assert_eq!(ways, vec![Some(100), Some(100), Some(100), Some(101)]);
        assert_eq!(parts[1].node_ids, vec![Some(OsmNodeId(2)), None]);
    }

    #[test]
    fn test_malformed_and_secondary_segments_ignored() {
        let _ = env_logger::builder().is_test(true).try_init();
        let reference = reference();
        let mut group = AggregatedReferenceMatches::new(String::from("ref"));
        let mut secondary = segment("hpms", "h1", 0, line_string![(x: 0.0, y: 0.0), (x: 0.01, y: 0.0)]);
        secondary.is_primary = false;
        group.push(SourceId::from("hpms"), secondary);
        group.push(
            SourceId::from("hpms"),
            segment("hpms", "", 0, line_string![(x: 0.0, y: 0.0), (x: 0.01, y: 0.0)]),
        );
        let result =
            conflate_reference(&reference, &group, &ConflationConfiguration::default()).unwrap();
        assert_eq!(result.segments_skipped, 1);
        assert_eq!(result.partitions.len(), 2);
        assert!(result.partitions.iter().all(|p| p.sources.is_empty()));
    }

    #[test]
    fn test_no_matches_partitions_by_way_section() {
        let reference = reference();
        let group = AggregatedReferenceMatches::new(String::from("ref"));
        let result =
            conflate_reference(&reference, &group, &ConflationConfiguration::default()).unwrap();
        assert_eq!(result.partitions.len(), 2);
        assert_eq!(result.partitions[1].end_dist, reference.length_km());
    }
}
