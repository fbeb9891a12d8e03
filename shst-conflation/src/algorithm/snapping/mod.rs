mod vertex_snapping;

pub use vertex_snapping::snap_offsets;
