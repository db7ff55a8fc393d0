//! Cooldown timers and re-arm latches used by the gesture engine.

use std::time::{Duration, Instant};

/// Named timers owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    /// Blocks move, click and scroll evaluation after a click.
    ClickSuppression,
    /// Keeps the last action label current for display.
    LabelDecay,
}

/// A single cooldown: armed at some instant, expiring after a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    duration: Duration,
    armed_at: Option<Instant>,
}

impl Cooldown {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            armed_at: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.armed_at = Some(now);
    }

    pub fn disarm(&mut self) {
        self.armed_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// True once strictly more than `duration` has passed since arming.
    /// A cooldown that was never armed counts as expired.
    pub fn expired(&self, now: Instant) -> bool {
        match self.armed_at {
            Some(at) => now.saturating_duration_since(at) > self.duration,
            None => true,
        }
    }
}

/// The engine's cooldowns, addressed by [`TimerId`].
#[derive(Debug, Clone, PartialEq)]
pub struct Timers {
    click_suppression: Cooldown,
    label_decay: Cooldown,
}

impl Timers {
    pub fn new(click_suppression: Duration, label_decay: Duration) -> Self {
        Self {
            click_suppression: Cooldown::new(click_suppression),
            label_decay: Cooldown::new(label_decay),
        }
    }

    fn get(&self, id: TimerId) -> &Cooldown {
        match id {
            TimerId::ClickSuppression => &self.click_suppression,
            TimerId::LabelDecay => &self.label_decay,
        }
    }

    fn get_mut(&mut self, id: TimerId) -> &mut Cooldown {
        match id {
            TimerId::ClickSuppression => &mut self.click_suppression,
            TimerId::LabelDecay => &mut self.label_decay,
        }
    }

    pub fn arm(&mut self, id: TimerId, now: Instant) {
        self.get_mut(id).arm(now);
    }

    pub fn disarm(&mut self, id: TimerId) {
        self.get_mut(id).disarm();
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.get(id).is_armed()
    }

    pub fn expired(&self, id: TimerId, now: Instant) -> bool {
        self.get(id).expired(now)
    }
}

/// One-shot trigger re-armed by an observed release.
///
/// Fires once, then stays spent until [`release`](Self::release) has been
/// observed and [`settle`](Self::settle) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RearmLatch {
    fired: bool,
    released: bool,
}

impl RearmLatch {
    pub fn can_fire(&self) -> bool {
        !self.fired
    }

    pub fn fire(&mut self) {
        self.fired = true;
        self.released = false;
    }

    pub fn release(&mut self) {
        self.released = true;
    }

    /// Re-arms the latch if a release was seen since it last fired.
    pub fn settle(&mut self) {
        if self.released && self.fired {
            self.fired = false;
        }
    }
}
