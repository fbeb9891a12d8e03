use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::{config::constants::OFFSET_EPSILON_KM, model::matches::CandidateInterval};

/// the sorted union of `{0, length}` and every interval boundary, clamped to the
/// reference line. boundaries closer than floating tolerance are merged.
pub fn split_points<'a>(
    length: f64,
    intervals: impl IntoIterator<Item = &'a CandidateInterval>,
) -> Vec<f64> {
    let mut points = intervals
        .into_iter()
        .flat_map(|i| [i.start_dist, i.end_dist])
        .chain([0.0, length])
        .map(|d| OrderedFloat(d.clamp(0.0, length)))
        .sorted()
        .map(|d| d.0)
        .collect_vec();
    points.dedup_by(|a, b| (*a - *b).abs() <= OFFSET_EPSILON_KM);
    if let Some(last) = points.last_mut() {
        *last = length;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::matches::SourceId;
    use serde_json::Map;

    fn interval(start: f64, end: f64) -> CandidateInterval {
        CandidateInterval {
            source: SourceId::from("hpms"),
            feature_id: String::from("f"),
            hierarchy_rank: 0,
            is_primary: true,
            poff: start,
            noff: 10.0 - end,
            start_dist: start,
            end_dist: end,
            properties: Map::new(),
        }
    }

    #[test]
    fn test_union_of_boundaries() {
        let intervals = [interval(2.0, 8.0), interval(0.0, 2.0), interval(5.0, 10.0)];
        assert_eq!(
            split_points(10.0, intervals.iter()),
            vec![0.0, 2.0, 5.0, 8.0, 10.0]
        );
    }

    #[test]
    fn test_near_duplicates_merged_and_clamped() {
        let intervals = [interval(2.0, 10.0 - 1e-12), interval(2.0 + 1e-12, 10.5)];
        assert_eq!(split_points(10.0, intervals.iter()), vec![0.0, 2.0, 10.0]);
    }
}
