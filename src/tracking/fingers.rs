//! Finger up/down classification.

use std::fmt;

use super::landmarks::{LandmarkSnapshot, THUMB_IP, THUMB_TIP, TIP_IDS};

/// The five fingers, in landmark order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

/// Up/down state of each finger for one frame. `true` means extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerState([bool; 5]);

impl FingerState {
    pub const CLOSED_FIST: FingerState = FingerState([false; 5]);

    pub fn new(up: [bool; 5]) -> Self {
        Self(up)
    }

    pub fn is_up(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    pub fn is_down(&self, finger: Finger) -> bool {
        !self.is_up(finger)
    }

    /// All five fingers folded.
    pub fn is_fist(&self) -> bool {
        *self == Self::CLOSED_FIST
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl fmt::Display for FingerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits: Vec<&str> = self
            .as_slice()
            .iter()
            .map(|&up| if up { "1" } else { "0" })
            .collect();
        write!(f, "[{}]", bits.join(","))
    }
}

/// Derives the finger state from a snapshot.
///
/// The thumb flexes sideways for a hand facing the camera, so it is up when
/// its tip lies left of the joint below it. The other fingers are up when the
/// tip sits higher in the image (smaller y) than the joint two below it.
///
/// Returns `None` when the snapshot is not a full hand.
pub fn classify(snapshot: &LandmarkSnapshot) -> Option<FingerState> {
    if !snapshot.is_complete() {
        return None;
    }

    let mut up = [false; 5];

    let thumb_tip = snapshot.get(THUMB_TIP)?;
    let thumb_joint = snapshot.get(THUMB_IP)?;
    up[Finger::Thumb as usize] = thumb_tip.x < thumb_joint.x;

    for finger in 1..5 {
        let tip = snapshot.get(TIP_IDS[finger])?;
        let pip = snapshot.get(TIP_IDS[finger] - 2)?;
        up[finger] = tip.y < pip.y;
    }

    Some(FingerState::new(up))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::landmarks::fixtures::{hand_with, open_hand};

    #[test]
    fn test_empty_snapshot_has_no_state() {
        assert_eq!(classify(&LandmarkSnapshot::empty()), None);
    }

    #[test]
    fn test_partial_snapshot_has_no_state() {
        let points = open_hand();
        let snap = LandmarkSnapshot::from_pixels(&points[..10]);
        assert_eq!(classify(&snap), None);
    }

    #[test]
    fn test_open_hand_all_up() {
        let snap = LandmarkSnapshot::from_pixels(&open_hand());
        let state = classify(&snap).unwrap();
        assert_eq!(state.as_slice().len(), 5);
        assert_eq!(state, FingerState::new([true; 5]));
    }

    #[test]
    fn test_fist_all_down() {
        let state = classify(&hand_with([false; 5])).unwrap();
        assert!(state.is_fist());
    }

    #[test]
    fn test_each_pose_round_trips_through_landmarks() {
        let poses = [
            [false, true, false, false, false],
            [true, false, false, true, true],
            [true, true, false, true, true],
            [false, true, false, false, true],
            [false, false, true, false, true],
        ];
        for pose in poses {
            assert_eq!(classify(&hand_with(pose)), Some(FingerState::new(pose)));
        }
    }

    #[test]
    fn test_thumb_uses_horizontal_axis() {
        let mut points = open_hand();
        // Tip level with the joint vertically but to its right: folded.
        points[4] = (points[3].0 + 1, points[3].1 - 50);
        let state = classify(&LandmarkSnapshot::from_pixels(&points)).unwrap();
        assert!(state.is_down(Finger::Thumb));
        assert!(state.is_up(Finger::Index));
    }

    #[test]
    fn test_display() {
        let state = FingerState::new([true, false, false, true, true]);
        assert_eq!(state.to_string(), "[1,0,0,1,1]");
    }
}
