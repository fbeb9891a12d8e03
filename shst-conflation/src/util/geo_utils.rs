//! distance-along-line primitives over WGS84 linestrings. all distances are great-circle
//! (haversine) kilometers.
use geo::{Bearing, Closest, ClosestPoint, Coord, Distance, Haversine, Length, Line, LineString, Point};
use uom::si::{
    f64::Length as UomLength,
    length::{kilometer, meter},
};

pub fn meters_to_km(meters: f64) -> f64 {
    UomLength::new::<meter>(meters).get::<kilometer>()
}

pub fn haversine_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    meters_to_km(Haversine.distance(Point::from(a), Point::from(b)))
}

pub fn line_length_km(line: &LineString<f64>) -> f64 {
    meters_to_km(Haversine.length(line))
}

/// distance along `line` of the location on `line` nearest to `point`.
///
/// the nearest location is found per segment in coordinate space, then ranked by
/// great-circle distance to `point`. on ties the earliest location wins.
///
/// # Returns
///
/// the offset in km, or None if the line has no segments.
pub fn locate_point_km(line: &LineString<f64>, point: Point<f64>) -> Option<f64> {
    let mut travelled = 0.0;
    let mut best: Option<(f64, f64)> = None;
    for segment in line.lines() {
        let nearest = nearest_on_segment(&segment, &point);
        let distance_to_point = haversine_km(nearest, point.0);
        let location = travelled + haversine_km(segment.start, nearest);
        match best {
            Some((d, _)) if d <= distance_to_point => {}
            _ => best = Some((distance_to_point, location)),
        }
        travelled += haversine_km(segment.start, segment.end);
    }
    best.map(|(_, location)| location)
}

/// the remainder of `line` starting `start_km` along it.
///
/// # Returns
///
/// None when `start_km` lies beyond the end of the line.
pub fn slice_from_km(line: &LineString<f64>, start_km: f64) -> Option<LineString<f64>> {
    let start_km = start_km.max(0.0);
    let mut travelled = 0.0;
    for (idx, segment) in line.lines().enumerate() {
        let segment_km = haversine_km(segment.start, segment.end);
        if travelled + segment_km >= start_km {
            let first = interpolate(&segment, start_km - travelled, segment_km);
            let mut coords = Vec::with_capacity(line.0.len() - idx);
            coords.push(first);
            coords.extend(line.0[idx + 1..].iter().copied());
            return Some(LineString::new(coords));
        }
        travelled += segment_km;
    }
    None
}

/// the final bearing (degrees in [0, 360)) on arrival at `destination` travelling from `origin`.
pub fn final_bearing(origin: Coord<f64>, destination: Coord<f64>) -> f64 {
    let reverse = Haversine.bearing(Point::from(destination), Point::from(origin));
    (reverse + 180.0) % 360.0
}

fn nearest_on_segment(segment: &Line<f64>, point: &Point<f64>) -> Coord<f64> {
    match segment.closest_point(point) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => p.0,
        Closest::Indeterminate => segment.start,
    }
}

/// linear interpolation within a single segment; at road-segment scale the
/// difference from a geodesic interpolation is negligible.
fn interpolate(segment: &Line<f64>, offset_km: f64, segment_km: f64) -> Coord<f64> {
    if segment_km <= 0.0 {
        return segment.start;
    }
    lerp_coord(segment.start, segment.end, offset_km / segment_km)
}

/// the coordinate at `ratio` (clamped to [0, 1]) of the way from `a` to `b`.
pub fn lerp_coord(a: Coord<f64>, b: Coord<f64>, ratio: f64) -> Coord<f64> {
    let ratio = ratio.clamp(0.0, 1.0);
    Coord {
        x: a.x + (b.x - a.x) * ratio,
        y: a.y + (b.y - a.y) * ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    fn straight_line() -> LineString<f64> {
        line_string![
            (x: 0.0, y: 0.0),
            (x: 0.01, y: 0.0),
            (x: 0.02, y: 0.0),
        ]
    }

    #[test]
    fn test_locate_point_on_line() {
        let line = straight_line();
        let total = line_length_km(&line);
        let located = locate_point_km(&line, Point::new(0.015, 0.0001)).unwrap();
        assert!((located - total * 0.75).abs() < 1e-6, "{located} vs {total}");
    }

    #[test]
    fn test_slice_from_midpoint() {
        let line = straight_line();
        let total = line_length_km(&line);
        let rest = slice_from_km(&line, total / 4.0).unwrap();
        assert_eq!(rest.0.len(), 3);
        assert!((rest.0[0].x - 0.005).abs() < 1e-9);
        assert!((line_length_km(&rest) - total * 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_slice_beyond_end() {
        let line = straight_line();
        let total = line_length_km(&line);
        assert!(slice_from_km(&line, total + 1.0).is_none());
    }

    #[test]
    fn test_lerp_clamps() {
        let a = Coord { x: 0.0, y: 0.0 };
        let b = Coord { x: 0.02, y: 0.01 };
        assert_eq!(lerp_coord(a, b, -1.0), a);
        assert_eq!(lerp_coord(a, b, 2.0), b);
        assert_eq!(lerp_coord(a, b, 0.5), Coord { x: 0.01, y: 0.005 });
    }

    #[test]
    fn test_final_bearing_east() {
        let bearing = final_bearing(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.01, y: 0.0 });
        assert!((bearing - 90.0).abs() < 1e-6, "{bearing}");
    }
}
