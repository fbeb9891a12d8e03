pub mod chain;
pub mod overlap;
pub mod partition;
pub mod projection;
pub mod snapping;

pub use overlap::resolve_overlaps;
pub use partition::partition_reference;
pub use projection::project_matched_segment;
pub use snapping::snap_offsets;
