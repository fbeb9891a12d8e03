use geo::LineString;
use serde::Serialize;

use super::{node_id_sequence, OsmNodeId, OsmWayId, VertexSequence, WaySection};
use crate::{
    model::{
        matches::{CandidateInterval, LinearOffsets, SourceId},
        ConflationError,
    },
    util::geo_utils,
};

/// a SharedStreets reference line: the canonical base map polyline that target maps
/// are conflated onto. built once per unit of work and never mutated.
#[derive(Serialize, Debug, Clone)]
pub struct ReferenceLine {
    id: String,
    from_intersection_id: String,
    to_intersection_id: String,
    geometry: LineString<f64>,
    length_km: f64,
    way_sections: Vec<WaySection>,
    node_ids: Vec<OsmNodeId>,
    vertices: VertexSequence,
}

impl ReferenceLine {
    /// builds a reference line from its geometry and the OSM way sections composing it.
    ///
    /// # Errors
    ///
    /// GeometryInconsistency if the geometry's distinct vertices cannot be paired one
    /// to one with the way sections' node ids.
    pub fn new(
        id: String,
        from_intersection_id: String,
        to_intersection_id: String,
        geometry: LineString<f64>,
        way_sections: Vec<WaySection>,
    ) -> Result<ReferenceLine, ConflationError> {
        let length_km = geo_utils::line_length_km(&geometry);
        if !(length_km.is_finite() && length_km > 0.0) {
            return Err(ConflationError::GeometryInconsistency {
                reference_id: id,
                message: format!("reference line has invalid length {length_km}"),
            });
        }
        let node_ids = node_id_sequence(&way_sections);
        let vertices = VertexSequence::new(&id, &geometry, &node_ids, length_km)?;
        vertices.validate(&id, length_km)?;
        Ok(ReferenceLine {
            id,
            from_intersection_id,
            to_intersection_id,
            geometry,
            length_km,
            way_sections,
            node_ids,
            vertices,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn from_intersection_id(&self) -> &str {
        &self.from_intersection_id
    }

    pub fn to_intersection_id(&self) -> &str {
        &self.to_intersection_id
    }

    pub fn geometry(&self) -> &LineString<f64> {
        &self.geometry
    }

    pub fn length_km(&self) -> f64 {
        self.length_km
    }

    pub fn way_sections(&self) -> &[WaySection] {
        &self.way_sections
    }

    pub fn way_section(&self, way_id: OsmWayId) -> Option<&WaySection> {
        self.way_sections.iter().find(|s| s.way_id == way_id)
    }

    pub fn node_ids(&self) -> &[OsmNodeId] {
        &self.node_ids
    }

    pub fn vertices(&self) -> &VertexSequence {
        &self.vertices
    }

    /// expresses each way section as an interval of the reserved OSM source, spanning
    /// from its first node's offset to its last node's offset. sections are located in
    /// order along the vertex sequence so loops revisiting a node resolve correctly.
    pub fn way_section_intervals(&self) -> Result<Vec<CandidateInterval>, ConflationError> {
        let vertices = self.vertices.vertices();
        let mut search_from = 0;
        let mut intervals = Vec::with_capacity(self.way_sections.len());
        for section in self.way_sections.iter() {
            let (first, last) = match (section.first_node(), section.last_node()) {
                (Some(first), Some(last)) => (first, last),
                _ => {
                    return Err(ConflationError::GeometryInconsistency {
                        reference_id: self.id.clone(),
                        message: format!("way section {} has no nodes", section.way_id),
                    })
                }
            };
            let start_idx = vertices[search_from..]
                .iter()
                .position(|v| v.node_id == Some(first))
                .map(|i| i + search_from);
            let end_idx = start_idx.and_then(|s| {
                vertices[s + 1..]
                    .iter()
                    .position(|v| v.node_id == Some(last))
                    .map(|i| i + s + 1)
            });
            let (start_idx, end_idx) = match (start_idx, end_idx) {
                (Some(s), Some(e)) => (s, e),
                _ => {
                    return Err(ConflationError::GeometryInconsistency {
                        reference_id: self.id.clone(),
                        message: format!(
                            "nodes {first} -> {last} of way section {} not found in order",
                            section.way_id
                        ),
                    })
                }
            };
            let offsets = LinearOffsets::new(
                vertices[start_idx].poff,
                vertices[end_idx].poff,
                self.length_km,
            );
            intervals.push(CandidateInterval {
                source: SourceId::osm(),
                feature_id: section.way_id.to_string(),
                hierarchy_rank: section.hierarchy_rank(),
                is_primary: true,
                poff: offsets.poff,
                noff: offsets.noff,
                start_dist: offsets.start_dist,
                end_dist: offsets.end_dist,
                properties: section.properties.clone(),
            });
            search_from = end_idx;
        }
        Ok(intervals)
    }
}
