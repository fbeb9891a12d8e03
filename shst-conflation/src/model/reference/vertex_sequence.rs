use geo::LineString;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{OsmNodeId, ReferenceVertex};
use crate::{config::constants::OFFSET_EPSILON_KM, model::ConflationError, util::geo_utils};

/// the ordered vertices of a reference line, each located by its offsets along the line.
///
/// # Invariants
///
/// POFF is non-decreasing, the first vertex has POFF 0 and the last has POFF equal to
/// the reference line's length.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VertexSequence(Vec<ReferenceVertex>);

impl VertexSequence {
    /// pairs each geometry vertex with its OSM node, skipping adjacent duplicate
    /// coordinates, and accumulates great-circle offsets along the geometry.
    pub fn new(
        reference_id: &str,
        geometry: &LineString<f64>,
        node_ids: &[OsmNodeId],
        length_km: f64,
    ) -> Result<VertexSequence, ConflationError> {
        let coords = geometry.0.iter().copied().dedup().collect_vec();
        if coords.len() != node_ids.len() {
            return Err(ConflationError::GeometryInconsistency {
                reference_id: reference_id.to_string(),
                message: format!(
                    "number of OSM nodes ({}) != number of geometry vertices ({})",
                    node_ids.len(),
                    coords.len()
                ),
            });
        }
        if coords.len() < 2 {
            return Err(ConflationError::GeometryInconsistency {
                reference_id: reference_id.to_string(),
                message: format!("geometry has {} distinct vertices", coords.len()),
            });
        }

        let last_idx = coords.len() - 1;
        let mut vertices: Vec<ReferenceVertex> = Vec::with_capacity(coords.len());
        for (idx, (coord, node_id)) in coords.iter().zip(node_ids.iter()).enumerate() {
            let poff = match vertices.last() {
                None => 0.0,
                Some(_) if idx == last_idx => length_km,
                Some(prev) => {
                    (prev.poff + geo_utils::haversine_km(prev.coord, *coord)).min(length_km)
                }
            };
            vertices.push(ReferenceVertex::new(*coord, poff, length_km, *node_id));
        }

        Ok(VertexSequence(vertices))
    }

    pub fn vertices(&self) -> &[ReferenceVertex] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// index of the vertex located at `offset` (within floating tolerance), if any.
    pub fn position_at(&self, offset: f64) -> Option<usize> {
        self.0
            .iter()
            .position(|v| (v.poff - offset).abs() <= OFFSET_EPSILON_KM)
    }

    pub fn node_ids(&self) -> Vec<Option<OsmNodeId>> {
        self.0.iter().map(|v| v.node_id).collect_vec()
    }

    /// checks the offset invariants of this sequence for a line of the given length.
    pub fn validate(&self, reference_id: &str, length_km: f64) -> Result<(), ConflationError> {
        let fail = |message: String| ConflationError::GeometryInconsistency {
            reference_id: reference_id.to_string(),
            message,
        };
        let first = self.0.first().ok_or_else(|| fail(String::from("no vertices")))?;
        let last = self.0.last().ok_or_else(|| fail(String::from("no vertices")))?;
        if first.poff.abs() > OFFSET_EPSILON_KM {
            return Err(fail(format!("first vertex has POFF {}", first.poff)));
        }
        if (last.poff - length_km).abs() > OFFSET_EPSILON_KM {
            return Err(fail(format!(
                "last vertex has POFF {} but line length is {length_km}",
                last.poff
            )));
        }
        if let Some((a, b)) = self.0.iter().tuple_windows().find(|(a, b)| b.poff < a.poff) {
            return Err(fail(format!(
                "POFF decreases from {} to {} along the vertex sequence",
                a.poff, b.poff
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    fn node_ids(ids: &[i64]) -> Vec<OsmNodeId> {
        ids.iter().map(|id| OsmNodeId(*id)).collect()
    }

    #[test]
    fn test_offsets_accumulate() {
        let geometry = line_string![
            (x: 0.0, y: 0.0),
            (x: 0.01, y: 0.0),
            (x: 0.01, y: 0.01),
        ];
        let length = geo_utils::line_length_km(&geometry);
        let seq = VertexSequence::new("ref", &geometry, &node_ids(&[1, 2, 3]), length).unwrap();
        assert_eq!(seq.len(), 3);
        assert!(!seq.is_empty());
        let v = seq.vertices();
        assert_eq!(v[0].poff, 0.0);
        assert_eq!(v[0].noff, length);
        assert!((v[1].poff - length / 2.0).abs() < 1e-6);
        assert!((v[1].poff + v[1].noff - length).abs() < 1e-12);
        assert_eq!(v[2].poff, length);
        assert_eq!(v[2].noff, 0.0);
        assert!(seq.validate("ref", length).is_ok());
        assert_eq!(seq.position_at(length), Some(2));
    }

    #[test]
    fn test_adjacent_duplicates_skipped() {
        let geometry = line_string![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 0.0),
            (x: 0.01, y: 0.0),
        ];
        let length = geo_utils::line_length_km(&geometry);
        let seq = VertexSequence::new("ref", &geometry, &node_ids(&[1, 2]), length).unwrap();
        assert_eq!(seq.node_ids(), vec![Some(OsmNodeId(1)), Some(OsmNodeId(2))]);
    }

    #[test]
    fn test_node_count_mismatch() {
        let geometry = line_string![(x: 0.0, y: 0.0), (x: 0.01, y: 0.0)];
        let result = VertexSequence::new("ref", &geometry, &node_ids(&[1, 2, 3]), 1.0);
        assert!(matches!(
            result,
            Err(ConflationError::GeometryInconsistency { .. })
        ));
    }
}
