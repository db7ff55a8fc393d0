//! Per-frame hand landmark snapshots.
//!
//! A snapshot holds the 21 anatomical points of one tracked hand in frame
//! pixel coordinates, or nothing when no hand was detected.

use serde::{Deserialize, Serialize};

/// Number of landmarks reported per hand.
pub const LANDMARK_COUNT: usize = 21;

pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

/// Fingertip landmark ids, thumb first.
pub const TIP_IDS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// One landmark in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landmark {
    pub id: usize,
    pub x: i32,
    pub y: i32,
}

/// A landmark as reported by the pose estimator, normalized to the frame (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
}

impl NormalizedPoint {
    /// Estimators report points slightly past the frame edge for partly
    /// visible hands. Anything further out, or non-finite, is garbage.
    pub fn is_plausible(&self) -> bool {
        const RANGE: std::ops::RangeInclusive<f32> = -1.0..=2.0;
        RANGE.contains(&self.x) && RANGE.contains(&self.y)
    }
}

/// Axis-aligned box enclosing every landmark: `(xmin, ymin, xmax, ymax)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

/// Landmarks of one hand for a single frame.
///
/// Either empty (no hand) or, when built from estimator output, exactly
/// [`LANDMARK_COUNT`] points indexed by anatomical id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandmarkSnapshot {
    points: Vec<Landmark>,
}

impl LandmarkSnapshot {
    /// A snapshot for a frame without a detected hand.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot from pixel coordinates in landmark id order.
    pub fn from_pixels(points: &[(i32, i32)]) -> Self {
        Self {
            points: points
                .iter()
                .enumerate()
                .map(|(id, &(x, y))| Landmark { id, x, y })
                .collect(),
        }
    }

    /// Converts estimator output to pixel coordinates.
    ///
    /// Coordinates are truncated toward zero, as the estimator's own drawing
    /// helpers do. With `mirror` set the x axis is flipped, matching a camera
    /// frame that was flipped horizontally before estimation.
    pub fn from_normalized(hand: &[NormalizedPoint], width: u32, height: u32, mirror: bool) -> Self {
        let points: Vec<(i32, i32)> = hand
            .iter()
            .map(|p| {
                let nx = if mirror { 1.0 - p.x } else { p.x };
                ((nx * width as f32) as i32, (p.y * height as f32) as i32)
            })
            .collect();
        Self::from_pixels(&points)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when the snapshot carries a full hand skeleton.
    pub fn is_complete(&self) -> bool {
        self.points.len() == LANDMARK_COUNT
    }

    /// Returns the landmark with the given id, if the snapshot has it.
    pub fn get(&self, id: usize) -> Option<&Landmark> {
        self.points.get(id).filter(|p| p.id == id)
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Bounding box of all landmarks, or `None` for an empty snapshot.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let points = self.points();
        let first = points.first()?;
        let init = BoundingBox {
            xmin: first.x,
            ymin: first.y,
            xmax: first.x,
            ymax: first.y,
        };
        Some(points.iter().fold(init, |b, p| BoundingBox {
            xmin: b.xmin.min(p.x),
            ymin: b.ymin.min(p.y),
            xmax: b.xmax.max(p.x),
            ymax: b.ymax.max(p.y),
        }))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// An open hand, palm toward the camera: every finger extended.
    pub fn open_hand() -> Vec<(i32, i32)> {
        vec![
            (320, 400), // wrist
            (290, 380),
            (270, 350),
            (260, 330), // thumb ip
            (250, 310), // thumb tip
            (290, 300),
            (290, 260), // index pip
            (290, 240),
            (290, 220), // index tip
            (320, 300),
            (320, 255),
            (320, 235),
            (320, 215), // middle tip
            (340, 305),
            (340, 265),
            (340, 245),
            (340, 228), // ring tip
            (360, 315),
            (360, 285),
            (360, 270),
            (360, 255), // pinky tip
        ]
    }

    /// Folds the finger whose tip is landmark `tip` so the tip sits below its PIP joint.
    pub fn fold(points: &mut [(i32, i32)], tip: usize) {
        let pip = points[tip - 2];
        points[tip] = (pip.0, pip.1 + 20);
    }

    /// Folds the thumb across the palm.
    pub fn fold_thumb(points: &mut [(i32, i32)]) {
        let ip = points[THUMB_IP];
        points[THUMB_TIP] = (ip.0 + 20, ip.1);
    }

    /// Builds a hand with the requested finger pose (thumb, index, middle, ring, pinky).
    pub fn hand_with(up: [bool; 5]) -> LandmarkSnapshot {
        let mut points = open_hand();
        if !up[0] {
            fold_thumb(&mut points);
        }
        for (finger, &is_up) in up.iter().enumerate().skip(1) {
            if !is_up {
                fold(&mut points, TIP_IDS[finger]);
            }
        }
        LandmarkSnapshot::from_pixels(&points)
    }
}
