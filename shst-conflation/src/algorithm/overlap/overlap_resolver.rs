use std::{cmp::Ordering, collections::VecDeque};

use itertools::Itertools;

use super::SpatialRelationship;
use crate::{
    config::{constants::OFFSET_EPSILON_KM, OverlapPolicy},
    model::{
        matches::{CandidateInterval, SourceId},
        ConflationError,
    },
};

/// reduces the candidate intervals of one source on one reference line to a
/// non-overlapping cover ordered by start distance.
///
/// candidates are taken in priority order (hierarchy rank ascending, then longest
/// first). each is trimmed against every interval already accepted; a candidate
/// that spans an accepted interval is cut in two and the trailing fragment is queued
/// ahead of the remaining candidates. what survives is accepted if it is at least
/// `threshold` long.
///
/// # Arguments
///
/// * `reference_id`     - reference line the intervals lie on
/// * `source`           - source shared by every candidate
/// * `candidates`       - intervals to resolve
/// * `reference_length` - length of the reference line in km
/// * `threshold`        - minimum length of an accepted interval
/// * `split_buffer_km`  - trailing fragments no longer than half of this are discarded
/// * `policy`           - how a residual overlap after the sweep is reported
pub fn resolve_overlaps(
    reference_id: &str,
    source: &SourceId,
    candidates: Vec<CandidateInterval>,
    reference_length: f64,
    threshold: f64,
    split_buffer_km: f64,
    policy: OverlapPolicy,
) -> Result<Vec<CandidateInterval>, ConflationError> {
    let mut arena: Vec<CandidateInterval> = candidates
        .into_iter()
        .sorted_by(priority_order)
        .collect_vec();
    let mut queue: VecDeque<usize> = (0..arena.len()).collect();
    let mut accepted: Vec<usize> = Vec::with_capacity(arena.len());

    while let Some(lower_idx) = queue.pop_front() {
        for &higher_idx in accepted.iter() {
            let lower_length = arena[lower_idx].length();
            if lower_length <= 0.0 || lower_length < threshold {
                break;
            }
            let lower = (arena[lower_idx].start_dist, arena[lower_idx].end_dist);
            let higher = (arena[higher_idx].start_dist, arena[higher_idx].end_dist);
            let trimmed = match SpatialRelationship::classify(lower, higher) {
                SpatialRelationship::NoOverlap => continue,
                SpatialRelationship::CoveredByHigher => (lower.0, lower.0),
                SpatialRelationship::TrailingOverlap => (higher.1, lower.1),
                SpatialRelationship::LeadingOverlap => (lower.0, higher.0),
                SpatialRelationship::CoversHigher => {
                    if lower.1 - higher.1 > split_buffer_km / 2.0 {
                        let fragment =
                            arena[lower_idx].with_range(higher.1, lower.1, reference_length);
                        arena.push(fragment);
                        queue.push_front(arena.len() - 1);
                    }
                    (lower.0, higher.0)
                }
            };
            arena[lower_idx] = arena[lower_idx].with_range(trimmed.0, trimmed.1, reference_length);
        }

        let length = arena[lower_idx].length();
        if length > 0.0 && length >= threshold {
            accepted.push(lower_idx);
        }
    }

    let cover = accepted
        .into_iter()
        .map(|idx| arena[idx].clone())
        .sorted_by(|a, b| a.start_dist.total_cmp(&b.start_dist))
        .collect_vec();

    match (verify_no_overlaps(reference_id, source, &cover), policy) {
        (Ok(()), _) => Ok(cover),
        (Err(e), OverlapPolicy::Fail) => Err(e),
        (Err(e), OverlapPolicy::Warn) => {
            log::warn!("{e}");
            Ok(cover)
        }
    }
}

/// checks that a cover ordered by start distance has no overlapping neighbors.
pub fn verify_no_overlaps(
    reference_id: &str,
    source: &SourceId,
    cover: &[CandidateInterval],
) -> Result<(), ConflationError> {
    match cover
        .iter()
        .tuple_windows()
        .find(|(a, b)| a.end_dist > b.start_dist + OFFSET_EPSILON_KM)
    {
        None => Ok(()),
        Some((a, b)) => Err(ConflationError::ResolverInvariantViolation {
            reference_id: reference_id.to_string(),
            source_id: source.clone(),
            message: format!(
                "'{}' [{}, {}] overlaps '{}' [{}, {}]",
                a.feature_id, a.start_dist, a.end_dist, b.feature_id, b.start_dist, b.end_dist
            ),
        }),
    }
}

fn priority_order(a: &CandidateInterval, b: &CandidateInterval) -> Ordering {
    a.hierarchy_rank
        .cmp(&b.hierarchy_rank)
        .then_with(|| b.length().total_cmp(&a.length()))
}
