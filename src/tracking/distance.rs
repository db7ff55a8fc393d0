//! Distance measurements between landmarks.

use super::landmarks::LandmarkSnapshot;

/// A measured segment between two landmarks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Floor midpoint, where click feedback is anchored
    pub midpoint: (i32, i32),
    pub length: f64,
}

/// Measures the segment between landmarks `a` and `b`.
///
/// Returns `None` if either id is outside the snapshot.
pub fn measure(snapshot: &LandmarkSnapshot, a: usize, b: usize) -> Option<Segment> {
    let p1 = snapshot.get(a)?;
    let p2 = snapshot.get(b)?;

    let (x1, y1) = (i64::from(p1.x), i64::from(p1.y));
    let (x2, y2) = (i64::from(p2.x), i64::from(p2.y));

    // The mean of two i32 values always fits back in an i32.
    let midpoint = (
        (x1 + x2).div_euclid(2) as i32,
        (y1 + y2).div_euclid(2) as i32,
    );
    let length = ((x2 - x1) as f64).hypot((y2 - y1) as f64);

    Some(Segment { midpoint, length })
}

/// Euclidean pixel distance between landmarks `a` and `b`.
pub fn distance(snapshot: &LandmarkSnapshot, a: usize, b: usize) -> Option<f64> {
    measure(snapshot, a, b).map(|s| s.length)
}

/// Distance truncated to whole pixels, the unit gesture thresholds are expressed in.
pub fn pixel_distance(snapshot: &LandmarkSnapshot, a: usize, b: usize) -> Option<u32> {
    distance(snapshot, a, b).map(|d| d as u32)
}
