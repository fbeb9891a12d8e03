use super::NetworkEdge;
use crate::model::matches::MatchedSegment;

/// edges for a set of matched segments, identified by their index in `segments`.
///
/// segments are joined by their intersection ids when every segment has both.
/// otherwise their endpoints are joined where coordinates coincide after rounding
/// to `precision` decimal places.
///
/// a segment carrying only one id has no node for its other end, and missing ids
/// must not all collapse into one shared node, so a single missing id switches the
/// whole set to coordinates.
pub fn derive_edges(segments: &[MatchedSegment], precision: u32) -> Vec<NetworkEdge<usize, String>> {
    let by_intersection = segments
        .iter()
        .map(|s| match (&s.from_intersection_id, &s.to_intersection_id) {
            (Some(from), Some(to)) => Some((from.clone(), to.clone())),
            _ => None,
        })
        .collect::<Option<Vec<_>>>();

    match by_intersection {
        Some(nodes) => nodes
            .into_iter()
            .enumerate()
            .map(|(idx, (from, to))| NetworkEdge::new(idx, from, to))
            .collect(),
        None => segments
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| {
                let from = s.geometry.0.first()?;
                let to = s.geometry.0.last()?;
                Some(NetworkEdge::new(
                    idx,
                    coordinate_key(from.x, from.y, precision),
                    coordinate_key(to.x, to.y, precision),
                ))
            })
            .collect(),
    }
}

/// node key `"{lon}|{lat}"` of a coordinate rounded to `precision` decimal places.
pub fn coordinate_key(lon: f64, lat: f64, precision: u32) -> String {
    let factor = 10f64.powi(precision as i32);
    // adding 0.0 turns -0.0 into 0.0
    let round = |v: f64| (v * factor).round() / factor + 0.0;
    format!("{}|{}", round(lon), round(lat))
}
