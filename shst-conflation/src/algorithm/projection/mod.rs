mod linear_projection;

pub use linear_projection::{project_geometry, project_matched_segment};
