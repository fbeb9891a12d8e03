mod overlap_resolver;
mod spatial_relationship;

pub use overlap_resolver::{resolve_overlaps, verify_no_overlaps};
pub use spatial_relationship::SpatialRelationship;
