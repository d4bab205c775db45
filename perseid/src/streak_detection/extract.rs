//! Segment extraction from edge blobs.
//!
//! Two routes produce candidate segments:
//!
//! - an elongated blob (a streak bright within a single exposure, or the
//!   fused trace of a fast mover) becomes a segment directly, endpoints taken
//!   from the extreme projections of its pixels onto the principal axis;
//! - compact blobs are treated as support points, and collinear runs of at
//!   least [`MIN_LINKED_POINTS`] of them are fused into one segment. This is
//!   what turns a transient that lands on a different pixel in every frame
//!   into a single trajectory.
//!
//! Near-collinear overlapping segments are then merged, suppressing the
//! duplicate produced by the two parallel edges of a thick streak. Output is
//! sorted longest first with a total tie-break so the order is reproducible.

use super::blob::Blob;
use super::segment::{sort_segments, LineSegment};

/// Minimum moment elongation ratio for a blob to count as a streak by itself.
const MIN_DIRECT_ELONGATION: f32 = 3.0;
/// Minimum extent along the principal axis, in pixels, for direct promotion.
const MIN_DIRECT_EXTENT: f32 = 8.0;
/// Maximum lateral deviation of a support point from a trajectory line.
const LINK_LATERAL_TOLERANCE: f32 = 1.5;
/// Minimum number of collinear support points that form a trajectory.
const MIN_LINKED_POINTS: usize = 3;
/// Minimum |cos| between segment directions for a merge (about 5 degrees).
const MERGE_MIN_ALIGNMENT: f32 = 0.996;
/// Maximum lateral offset between merged segments.
const MERGE_LATERAL_TOLERANCE: f32 = 2.5;
/// Maximum gap between projection intervals of merged segments.
const MERGE_MAX_GAP: f32 = 2.0;

/// Segment extraction result with per-route counts for diagnostics.
#[derive(Debug, Default)]
pub(crate) struct ExtractedSegments {
    pub segments: Vec<LineSegment>,
    pub direct: usize,
    pub link_candidates: usize,
    pub linked: usize,
}

pub(crate) fn extract_segments(blobs: &[Blob]) -> ExtractedSegments {
    let mut result = ExtractedSegments::default();
    let mut support_points: Vec<(f32, f32)> = Vec::new();

    for blob in blobs {
        if blob.elongation >= MIN_DIRECT_ELONGATION && blob.extent >= MIN_DIRECT_EXTENT {
            let ((x1, y1), (x2, y2)) = blob.axis_endpoints();
            result.segments.push(LineSegment::new(x1, y1, x2, y2));
            result.direct += 1;
        } else {
            support_points.push(blob.centroid);
        }
    }
    result.link_candidates = support_points.len();

    let linked = link_support_points(&support_points);
    result.linked = linked.len();
    result.segments.extend(linked);

    result.segments = merge_collinear(result.segments);
    sort_segments(&mut result.segments);
    result
}

/// Fuse collinear runs of support points into trajectory segments.
///
/// Every point pair is a line hypothesis; hypotheses are tried longest span
/// first, and each accepted trajectory claims its members so a point joins at
/// most one segment.
fn link_support_points(points: &[(f32, f32)]) -> Vec<LineSegment> {
    let mut hypotheses: Vec<(usize, usize, f32)> = Vec::new();
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            let span = (points[j].0 - points[i].0).hypot(points[j].1 - points[i].1);
            if span > f32::EPSILON {
                hypotheses.push((i, j, span));
            }
        }
    }
    hypotheses.sort_by(|a, b| {
        b.2.total_cmp(&a.2)
            .then(a.0.cmp(&b.0))
            .then(a.1.cmp(&b.1))
    });

    let mut claimed = vec![false; points.len()];
    let mut segments = Vec::new();

    for (i, j, span) in hypotheses {
        if claimed[i] || claimed[j] {
            continue;
        }
        let (ox, oy) = points[i];
        let dir = ((points[j].0 - ox) / span, (points[j].1 - oy) / span);

        let mut members: Vec<(usize, f32)> = Vec::new();
        for (k, &(px, py)) in points.iter().enumerate() {
            if claimed[k] {
                continue;
            }
            let dx = px - ox;
            let dy = py - oy;
            let along = dx * dir.0 + dy * dir.1;
            let lateral = (dx * dir.1 - dy * dir.0).abs();
            if lateral <= LINK_LATERAL_TOLERANCE
                && along >= -LINK_LATERAL_TOLERANCE
                && along <= span + LINK_LATERAL_TOLERANCE
            {
                members.push((k, along));
            }
        }
        if members.len() < MIN_LINKED_POINTS {
            continue;
        }

        // Endpoints are the actual extreme support points, not projections.
        let mut first = members[0];
        let mut last = members[0];
        for &(k, along) in &members {
            if along < first.1 {
                first = (k, along);
            }
            if along > last.1 {
                last = (k, along);
            }
        }
        segments.push(LineSegment::new(
            points[first.0].0,
            points[first.0].1,
            points[last.0].0,
            points[last.0].1,
        ));
        for (k, _) in members {
            claimed[k] = true;
        }
    }

    segments
}

/// Repeatedly merge near-collinear, laterally close, overlapping segment
/// pairs until a fixed point is reached.
fn merge_collinear(mut segments: Vec<LineSegment>) -> Vec<LineSegment> {
    loop {
        let mut merged_any = false;

        'outer: for a_idx in 0..segments.len() {
            for b_idx in a_idx + 1..segments.len() {
                if let Some(merged) = try_merge(&segments[a_idx], &segments[b_idx]) {
                    segments[a_idx] = merged;
                    segments.remove(b_idx);
                    merged_any = true;
                    break 'outer;
                }
            }
        }

        if !merged_any {
            return segments;
        }
    }
}

fn try_merge(a: &LineSegment, b: &LineSegment) -> Option<LineSegment> {
    let dir_a = a.direction()?;
    let dir_b = b.direction()?;
    let alignment = (dir_a.0 * dir_b.0 + dir_a.1 * dir_b.1).abs();
    if alignment < MERGE_MIN_ALIGNMENT {
        return None;
    }

    let project = |x: f32, y: f32| -> (f32, f32) {
        let dx = x - a.x1;
        let dy = y - a.y1;
        let along = dx * dir_a.0 + dy * dir_a.1;
        let lateral = (dx * dir_a.1 - dy * dir_a.0).abs();
        (along, lateral)
    };

    let (tb1, lat1) = project(b.x1, b.y1);
    let (tb2, lat2) = project(b.x2, b.y2);
    if lat1 > MERGE_LATERAL_TOLERANCE || lat2 > MERGE_LATERAL_TOLERANCE {
        return None;
    }

    let b_min = tb1.min(tb2);
    let b_max = tb1.max(tb2);
    if b_min > a.length() + MERGE_MAX_GAP || b_max < -MERGE_MAX_GAP {
        return None;
    }

    // Keep the two actual endpoints with extreme projections.
    let endpoints = [
        (0.0, (a.x1, a.y1)),
        (a.length(), (a.x2, a.y2)),
        (tb1, (b.x1, b.y1)),
        (tb2, (b.x2, b.y2)),
    ];
    let mut near = endpoints[0];
    let mut far = endpoints[0];
    for candidate in endpoints {
        if candidate.0 < near.0 {
            near = candidate;
        }
        if candidate.0 > far.0 {
            far = candidate;
        }
    }
    Some(LineSegment::new(near.1 .0, near.1 .1, far.1 .0, far.1 .1))
}

#[cfg(test)]
mod tests {
    use super::super::blob::find_blobs;
    use super::super::edges::detect_edges;
    use super::*;
    use crate::testing::{frame_with_dots, streak_frame};

    #[test]
    fn test_collinear_dots_link_into_one_trajectory() {
        let frame = frame_with_dots(100, 100, &[(10, 10, 200), (50, 50, 200), (90, 90, 200)]);
        let map = detect_edges(&frame, 100.0, 200.0);
        let blobs = find_blobs(&map);
        assert_eq!(blobs.len(), 3);

        let extracted = extract_segments(&blobs);
        assert_eq!(extracted.link_candidates, 3);
        assert_eq!(extracted.segments.len(), 1);

        let segment = extracted.segments[0];
        assert!((segment.x1 - 10.0).abs() < 1.0 && (segment.y1 - 10.0).abs() < 1.0);
        assert!((segment.x2 - 90.0).abs() < 1.0 && (segment.y2 - 90.0).abs() < 1.0);
        assert!((segment.length() - 113.1).abs() < 2.0);
    }

    #[test]
    fn test_two_dots_are_not_a_trajectory() {
        let frame = frame_with_dots(100, 100, &[(20, 20, 200), (70, 70, 200)]);
        let blobs = find_blobs(&detect_edges(&frame, 100.0, 200.0));
        let extracted = extract_segments(&blobs);
        assert!(extracted.segments.is_empty());
    }

    #[test]
    fn test_off_line_dot_is_left_out() {
        let frame = frame_with_dots(
            100,
            100,
            &[(10, 10, 200), (40, 40, 200), (70, 70, 200), (20, 80, 200)],
        );
        let blobs = find_blobs(&detect_edges(&frame, 100.0, 200.0));
        let extracted = extract_segments(&blobs);
        assert_eq!(extracted.segments.len(), 1);
        assert_eq!(extracted.linked, 1);
    }

    #[test]
    fn test_elongated_blob_promoted_directly() {
        let frame = streak_frame(80, 80, (15.0, 40.0), (65.0, 40.0), 220);
        let blobs = find_blobs(&detect_edges(&frame, 100.0, 200.0));
        let extracted = extract_segments(&blobs);

        assert!(extracted.direct >= 1);
        assert_eq!(extracted.segments.len(), 1, "parallel edges merge into one");
        let segment = extracted.segments[0];
        assert!(segment.length() > 40.0);
        assert!((segment.y1 - 40.0).abs() < 2.5 && (segment.y2 - 40.0).abs() < 2.5);
    }

    #[test]
    fn test_merge_requires_alignment_and_overlap() {
        // Parallel, laterally close, overlapping: merges.
        let merged = try_merge(
            &LineSegment::new(0.0, 10.0, 40.0, 10.0),
            &LineSegment::new(20.0, 11.0, 60.0, 11.0),
        )
        .unwrap();
        assert_eq!((merged.x1, merged.x2), (0.0, 60.0));

        // Far apart laterally: no merge.
        assert!(try_merge(
            &LineSegment::new(0.0, 10.0, 40.0, 10.0),
            &LineSegment::new(0.0, 30.0, 40.0, 30.0),
        )
        .is_none());

        // Collinear but disjoint beyond the gap: no merge.
        assert!(try_merge(
            &LineSegment::new(0.0, 10.0, 20.0, 10.0),
            &LineSegment::new(40.0, 10.0, 60.0, 10.0),
        )
        .is_none());

        // Crossing at a steep angle: no merge.
        assert!(try_merge(
            &LineSegment::new(0.0, 0.0, 40.0, 0.0),
            &LineSegment::new(20.0, -10.0, 20.0, 10.0),
        )
        .is_none());
    }
}
