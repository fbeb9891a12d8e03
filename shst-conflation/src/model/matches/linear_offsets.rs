use serde::{Deserialize, Serialize};

/// an interval along a reference line. `poff` is the distance from the line's start to
/// the interval start and `noff` the distance from the interval end to the line's end.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LinearOffsets {
    pub poff: f64,
    pub noff: f64,
    pub start_dist: f64,
    pub end_dist: f64,
}

impl LinearOffsets {
    pub fn new(start_dist: f64, end_dist: f64, reference_length_km: f64) -> LinearOffsets {
        LinearOffsets {
            poff: start_dist,
            noff: reference_length_km - end_dist,
            start_dist,
            end_dist,
        }
    }
}
