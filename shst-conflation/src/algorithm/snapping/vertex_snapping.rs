use crate::{
    config::{constants::OFFSET_EPSILON_KM, LinearTolerance},
    model::{matches::LinearOffsets, reference::ReferenceVertex},
};

/// moves each end of a raw interval onto an existing reference vertex when one is
/// close enough, so partitioning introduces as few synthetic vertices as possible.
///
/// ends within the split buffer of the reference's own ends snap to 0 or `length`.
/// otherwise the nearest vertex in offset space is reused if it lies within half the
/// split buffer. the start is searched from the front of the vertex sequence and the
/// end from the back; offset distance is unimodal along the sequence so each scan
/// stops at the first increase.
///
/// # Returns
///
/// the snapped interval, or None if what remains is too short to keep.
pub fn snap_offsets(
    raw: &LinearOffsets,
    vertices: &[ReferenceVertex],
    length: f64,
    tolerance: &LinearTolerance,
) -> Option<LinearOffsets> {
    let reuse_within = tolerance.split_buffer_km / 2.0 + OFFSET_EPSILON_KM;

    let start = if raw.poff <= tolerance.split_buffer_km {
        0.0
    } else {
        let scan = vertices.iter().skip(1).map(|v| (v.poff, v.poff));
        nearest_vertex(raw.poff, scan, reuse_within).unwrap_or(raw.start_dist)
    };

    let end = if raw.noff <= tolerance.split_buffer_km {
        length
    } else {
        let scan = vertices.iter().skip(1).rev().map(|v| (v.noff, v.poff));
        nearest_vertex(raw.noff, scan, reuse_within).unwrap_or(raw.end_dist)
    };

    let snapped_length = end - start;
    if snapped_length <= 0.0 || tolerance.is_negligible(snapped_length, length) {
        return None;
    }
    Some(LinearOffsets::new(start, end, length))
}

/// scans `(offset, poff)` pairs for the vertex nearest `target`, returning its POFF
/// when it is within `reuse_within`.
fn nearest_vertex(
    target: f64,
    scan: impl Iterator<Item = (f64, f64)>,
    reuse_within: f64,
) -> Option<f64> {
    let mut nearest = f64::INFINITY;
    let mut reused = None;
    for (offset, poff) in scan {
        let dist = (target - offset).abs();
        if dist < nearest {
            nearest = dist;
            if dist <= reuse_within {
                reused = Some(poff);
            }
        } else if dist > nearest {
            break;
        }
    }
    reused
}
