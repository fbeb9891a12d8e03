use geo::LineString;

use crate::{config::constants::FOLLOWS_DIRECTION_BEARING_THRESHOLD, util::geo_utils};

/// the final bearing, in whole degrees, of travel from the first coordinate of an
/// ordered chain of geometries to its last coordinate.
pub fn chain_bearing<'a>(geometries: impl IntoIterator<Item = &'a LineString<f64>>) -> Option<f64> {
    let mut coords = geometries.into_iter().flat_map(|g| g.0.iter());
    let first = *coords.next()?;
    let last = *coords.last()?;
    if first == last {
        return None;
    }
    Some(geo_utils::final_bearing(first, last).round() % 360.0)
}

/// true if two bearings (degrees) describe the same direction of travel.
pub fn follows_direction(a: f64, b: f64) -> bool {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff) < FOLLOWS_DIRECTION_BEARING_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    #[test]
    fn test_chain_bearing_northbound() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 0.01)];
        let b = line_string![(x: 0.0, y: 0.01), (x: 0.0, y: 0.02)];
        assert_eq!(chain_bearing([&a, &b]), Some(0.0));
        assert_eq!(chain_bearing([&b, &a].into_iter().rev()), Some(0.0));
    }

    #[test]
    fn test_chain_bearing_degenerate() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 0.01), (x: 0.0, y: 0.0)];
        assert_eq!(chain_bearing([&a]), None);
        assert_eq!(chain_bearing(std::iter::empty()), None);
    }

    #[test]
    fn test_follows_direction() {
        assert!(follows_direction(10.0, 40.0));
        assert!(follows_direction(350.0, 20.0));
        assert!(!follows_direction(90.0, 270.0));
        assert!(!follows_direction(0.0, 45.0));
    }
}
