mod osm_node_id;
mod osm_way_id;
mod reference_line;
mod reference_vertex;
mod road_class;
mod vertex_sequence;
mod way_section;

pub use osm_node_id::OsmNodeId;
pub use osm_way_id::OsmWayId;
pub use reference_line::ReferenceLine;
pub use reference_vertex::ReferenceVertex;
pub use road_class::RoadClass;
pub use vertex_sequence::VertexSequence;
pub use way_section::{node_id_sequence, WaySection, WaySectionMetadata};
