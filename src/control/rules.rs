//! Ordered decision table for click, scroll and screenshot gestures.
//!
//! Rules are evaluated top to bottom and the first match wins. The table is
//! only consulted when the thumb is away from the index finger and no click
//! is suppressed.

use crate::tracking::{Finger, FingerState};

use super::timers::RearmLatch;

/// What a matched rule asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    LeftClick,
    RightClick,
    Scroll,
    Screenshot,
    /// The fist is open: arms the next screenshot.
    FistOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// A predicate over the frame's finger state and the screenshot latch.
pub struct Rule {
    pub name: &'static str,
    pub dispatch: Dispatch,
    pub matches: fn(&FingerState, &RearmLatch) -> bool,
}

fn left_click(f: &FingerState, _: &RearmLatch) -> bool {
    f.is_down(Finger::Index) && f.is_up(Finger::Ring) && f.is_up(Finger::Pinky)
}

fn right_click(f: &FingerState, _: &RearmLatch) -> bool {
    f.is_down(Finger::Middle) && f.is_up(Finger::Ring) && f.is_up(Finger::Pinky)
}

fn scroll(f: &FingerState, _: &RearmLatch) -> bool {
    f.is_down(Finger::Ring) && f.is_up(Finger::Pinky)
}

fn screenshot(f: &FingerState, latch: &RearmLatch) -> bool {
    f.is_fist() && latch.can_fire()
}

fn fist_open(f: &FingerState, _: &RearmLatch) -> bool {
    !f.is_fist()
}

/// Dispatch rules in priority order.
pub static DISPATCH_RULES: [Rule; 5] = [
    Rule {
        name: "left-click",
        dispatch: Dispatch::LeftClick,
        matches: left_click,
    },
    Rule {
        name: "right-click",
        dispatch: Dispatch::RightClick,
        matches: right_click,
    },
    Rule {
        name: "scroll",
        dispatch: Dispatch::Scroll,
        matches: scroll,
    },
    Rule {
        name: "screenshot",
        dispatch: Dispatch::Screenshot,
        matches: screenshot,
    },
    Rule {
        name: "fist-open",
        dispatch: Dispatch::FistOpen,
        matches: fist_open,
    },
];

/// Returns the first rule matching this frame, if any.
pub fn select(fingers: &FingerState, latch: &RearmLatch) -> Option<&'static Rule> {
    DISPATCH_RULES
        .iter()
        .find(|rule| (rule.matches)(fingers, latch))
}

/// Scroll direction for a frame already in scroll pose.
///
/// Index up with middle down scrolls up; the reverse scrolls down. Any other
/// combination holds the scroll pose without scrolling.
pub fn scroll_direction(fingers: &FingerState) -> Option<ScrollDirection> {
    match (fingers.is_up(Finger::Index), fingers.is_up(Finger::Middle)) {
        (true, false) => Some(ScrollDirection::Up),
        (false, true) => Some(ScrollDirection::Down),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatch(up: [bool; 5]) -> Option<Dispatch> {
        select(&FingerState::new(up), &RearmLatch::default()).map(|r| r.dispatch)
    }

    #[test]
    fn test_left_click_pose() {
        assert_eq!(dispatch([true, false, false, true, true]), Some(Dispatch::LeftClick));
        assert_eq!(dispatch([false, false, true, true, true]), Some(Dispatch::LeftClick));
    }

    #[test]
    fn test_right_click_pose() {
        assert_eq!(dispatch([true, true, false, true, true]), Some(Dispatch::RightClick));
    }

    #[test]
    fn test_scroll_pose() {
        assert_eq!(dispatch([false, true, false, false, true]), Some(Dispatch::Scroll));
        assert_eq!(dispatch([false, false, true, false, true]), Some(Dispatch::Scroll));
        assert_eq!(dispatch([false, true, true, false, true]), Some(Dispatch::Scroll));
    }

    #[test]
    fn test_fist_and_open_hand() {
        assert_eq!(dispatch([false; 5]), Some(Dispatch::Screenshot));
        assert_eq!(dispatch([true; 5]), Some(Dispatch::FistOpen));
        assert_eq!(dispatch([false, true, false, false, false]), Some(Dispatch::FistOpen));
    }

    #[test]
    fn test_spent_latch_blocks_screenshot() {
        let mut latch = RearmLatch::default();
        latch.fire();
        assert!(select(&FingerState::CLOSED_FIST, &latch).is_none());
    }

    #[test]
    fn test_scroll_direction() {
        let up = FingerState::new([false, true, false, false, true]);
        let down = FingerState::new([false, false, true, false, true]);
        let both = FingerState::new([false, true, true, false, true]);
        assert_eq!(scroll_direction(&up), Some(ScrollDirection::Up));
        assert_eq!(scroll_direction(&down), Some(ScrollDirection::Down));
        assert_eq!(scroll_direction(&both), None);
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = DISPATCH_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["left-click", "right-click", "scroll", "screenshot", "fist-open"]
        );
    }
}
