use geo::{LineString, Point};

use crate::{
    config::LinearTolerance,
    model::{
        matches::{LinearOffsets, MatchedSegment},
        reference::ReferenceLine,
        ConflationError,
    },
    util::geo_utils,
};

/// projects a matched segment onto the reference line it was aligned with.
///
/// # Returns
///
/// the interval covered by the segment, or None when no usable interval exists
/// (degenerate slice, small fragment, or an interval too short to keep).
///
/// # Errors
///
/// GeometryInconsistency when the projected start lies beyond the projected end by
/// more than the split buffer.
pub fn project_matched_segment(
    reference: &ReferenceLine,
    segment: &MatchedSegment,
    tolerance: &LinearTolerance,
) -> Result<Option<LinearOffsets>, ConflationError> {
    project_geometry(reference, &segment.geometry, tolerance).map_err(|e| match e {
        ConflationError::GeometryInconsistency {
            reference_id,
            message,
        } => ConflationError::GeometryInconsistency {
            reference_id,
            message: format!(
                "{message} (feature '{}' of '{}')",
                segment.feature_id, segment.source
            ),
        },
        other => other,
    })
}

/// projects a candidate geometry that runs in the reference line's direction onto it.
///
/// the end of the candidate is only searched for in the remainder of the reference
/// starting halfway along the candidate, so reference lines that loop back over
/// themselves do not place the end before the start.
pub fn project_geometry(
    reference: &ReferenceLine,
    candidate: &LineString<f64>,
    tolerance: &LinearTolerance,
) -> Result<Option<LinearOffsets>, ConflationError> {
    let line = reference.geometry();
    let length = reference.length_km();
    let (first, last) = match (candidate.0.first(), candidate.0.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Ok(None),
    };
    let candidate_length = geo_utils::line_length_km(candidate);

    let raw_start = match geo_utils::locate_point_km(line, Point::from(first)) {
        Some(d) => d,
        None => return Ok(None),
    };
    let slice_start = raw_start + candidate_length / 2.0;
    let remainder = match geo_utils::slice_from_km(line, slice_start) {
        Some(r) => r,
        // the candidate's midpoint lies past the reference end, so most of it runs
        // beyond the line. no interval is kept rather than a degenerate one at the end.
        None => {
            log::debug!(
                "reference '{}': cannot slice at {slice_start} of {length}",
                reference.id()
            );
            return Ok(None);
        }
    };
    let raw_end = match geo_utils::locate_point_km(&remainder, Point::from(last)) {
        Some(d) => slice_start + d,
        None => return Ok(None),
    };

    if raw_start > raw_end {
        let overlap = raw_start - raw_end;
        if overlap <= tolerance.split_buffer_km {
            return Ok(None);
        }
        return Err(ConflationError::GeometryInconsistency {
            reference_id: reference.id().to_string(),
            message: format!("projected start {raw_start} is {overlap} km past projected end {raw_end}"),
        });
    }

    // snap to the reference endpoints
    let start = if raw_start <= tolerance.split_buffer_km {
        0.0
    } else {
        raw_start
    };
    let end = if length - raw_end <= tolerance.split_buffer_km {
        length
    } else {
        raw_end
    };

    let interval_length = end - start;
    if interval_length <= 0.0 || tolerance.is_negligible(interval_length, length) {
        return Ok(None);
    }
    Ok(Some(LinearOffsets::new(start, end, length)))
}
