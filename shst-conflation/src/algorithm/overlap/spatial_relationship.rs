use crate::config::constants::OFFSET_EPSILON_KM;

/// how a lower-ranked interval sits relative to a higher-ranked interval of the same
/// source. intervals that only touch at an endpoint do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialRelationship {
    NoOverlap,
    /// the lower interval lies entirely within the higher one.
    CoveredByHigher,
    /// the lower interval starts inside the higher one and ends after it.
    TrailingOverlap,
    /// the lower interval starts before the higher one and ends inside it.
    LeadingOverlap,
    /// the lower interval extends past both ends of the higher one.
    CoversHigher,
}

impl SpatialRelationship {
    /// classifies `lower` = `(start, end)` against `higher` = `(start, end)`.
    pub fn classify(lower: (f64, f64), higher: (f64, f64)) -> SpatialRelationship {
        let (lower_start, lower_end) = lower;
        let (higher_start, higher_end) = higher;
        if lower_end <= higher_start + OFFSET_EPSILON_KM
            || lower_start + OFFSET_EPSILON_KM >= higher_end
        {
            return SpatialRelationship::NoOverlap;
        }
        let starts_inside = lower_start + OFFSET_EPSILON_KM >= higher_start;
        let ends_inside = lower_end <= higher_end + OFFSET_EPSILON_KM;
        match (starts_inside, ends_inside) {
            (true, true) => SpatialRelationship::CoveredByHigher,
            (true, false) => SpatialRelationship::TrailingOverlap,
            (false, true) => SpatialRelationship::LeadingOverlap,
            (false, false) => SpatialRelationship::CoversHigher,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SpatialRelationship as R;

    #[test]
    fn test_classify() {
        let higher = (2.0, 8.0);
        assert_eq!(R::classify((0.0, 2.0), higher), R::NoOverlap);
        assert_eq!(R::classify((8.0, 9.0), higher), R::NoOverlap);
        assert_eq!(R::classify((3.0, 7.0), higher), R::CoveredByHigher);
        assert_eq!(R::classify((2.0, 8.0), higher), R::CoveredByHigher);
        assert_eq!(R::classify((5.0, 9.0), higher), R::TrailingOverlap);
        assert_eq!(R::classify((1.0, 5.0), higher), R::LeadingOverlap);
        assert_eq!(R::classify((0.0, 10.0), higher), R::CoversHigher);
    }
}
