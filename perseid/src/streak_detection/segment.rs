//! The line segment value type.

/// A candidate trajectory segment in image coordinates (origin top-left,
/// x right, y down). Endpoints are sub-pixel; a segment has no identity
/// beyond its coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl LineSegment {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Euclidean distance between the endpoints.
    #[inline]
    pub fn length(&self) -> f32 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        (dx * dx + dy * dy).sqrt()
    }

    /// Unit direction from the first to the second endpoint, or `None` for a
    /// degenerate zero-length segment.
    pub(crate) fn direction(&self) -> Option<(f32, f32)> {
        let length = self.length();
        if length <= f32::EPSILON {
            return None;
        }
        Some(((self.x2 - self.x1) / length, (self.y2 - self.y1) / length))
    }
}

/// Sort longest first with a total coordinate tie-break, so detector output
/// order is reproducible byte for byte.
pub(crate) fn sort_segments(segments: &mut [LineSegment]) {
    segments.sort_by(|a, b| {
        b.length()
            .total_cmp(&a.length())
            .then(a.x1.total_cmp(&b.x1))
            .then(a.y1.total_cmp(&b.y1))
            .then(a.x2.total_cmp(&b.x2))
            .then(a.y2.total_cmp(&b.y2))
    });
}
