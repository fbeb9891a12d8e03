use geo::Coord;
use serde::{Deserialize, Serialize};

use super::OsmNodeId;

/// a vertex of a reference line located by its positive offset (distance from the
/// line's start) and negative offset (distance to the line's end), both in km.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ReferenceVertex {
    pub coord: Coord<f64>,
    pub poff: f64,
    pub noff: f64,
    /// the OSM node at this vertex, or None for a synthetic split point.
    pub node_id: Option<OsmNodeId>,
}

impl ReferenceVertex {
    pub fn new(coord: Coord<f64>, poff: f64, length_km: f64, node_id: OsmNodeId) -> Self {
        Self {
            coord,
            poff,
            noff: length_km - poff,
            node_id: Some(node_id),
        }
    }

    /// creates a vertex that does not exist in the source network, inserted where
    /// an interval boundary falls between existing vertices.
    pub fn synthetic(coord: Coord<f64>, poff: f64, length_km: f64) -> Self {
        Self {
            coord,
            poff,
            noff: length_km - poff,
            node_id: None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.node_id.is_none()
    }
}
