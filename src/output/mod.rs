//! OS-side effects requested by the gesture engine.
//!
//! This module provides:
//! - The `ActionSink` trait the engine issues requests through
//! - SendInput-based mouse injection (Windows)
//! - Screen capture and timestamped screenshot persistence
//! - A dry-run sink that only logs requests

pub mod dry_run;
#[cfg(windows)]
pub mod input;
pub mod screenshot;

use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

pub use dry_run::DryRunSink;
#[cfg(windows)]
pub use input::SendInputSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MouseButton::Left => write!(f, "left"),
            MouseButton::Right => write!(f, "right"),
        }
    }
}

/// Receiver of pointer, button, wheel and screenshot requests.
///
/// Requests are fire-and-forget from the engine's point of view: an error is
/// logged and the frame continues.
pub trait ActionSink {
    /// Screen size in pixels.
    fn screen_size(&self) -> Result<(u32, u32)>;

    /// Moves the pointer to an absolute screen position.
    fn move_pointer(&mut self, x: i32, y: i32) -> Result<()>;

    fn press(&mut self, button: MouseButton) -> Result<()>;

    fn release(&mut self, button: MouseButton) -> Result<()>;

    /// Scrolls the wheel; positive is up.
    fn scroll(&mut self, amount: i32) -> Result<()>;

    /// Captures the screen and saves it, returning the file written.
    fn screenshot(&mut self) -> Result<PathBuf>;
}

/// Test double that records every request.
#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use anyhow::anyhow;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Request {
        Move(i32, i32),
        Press(MouseButton),
        Release(MouseButton),
        Scroll(i32),
        Screenshot,
    }

    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub requests: Vec<Request>,
        /// When set, every request fails after being recorded.
        pub fail: bool,
    }

    impl RecordingSink {
        pub fn failing() -> Self {
            Self {
                requests: Vec::new(),
                fail: true,
            }
        }

        pub fn count(&self, pred: impl Fn(&Request) -> bool) -> usize {
            self.requests.iter().filter(|r| pred(r)).count()
        }

        pub fn moves(&self) -> usize {
            self.count(|r| matches!(r, Request::Move(..)))
        }

        pub fn screenshots(&self) -> usize {
            self.count(|r| matches!(r, Request::Screenshot))
        }

        pub fn clear(&mut self) {
            self.requests.clear();
        }

        fn record(&mut self, request: Request) -> Result<()> {
            self.requests.push(request);
            if self.fail {
                return Err(anyhow!("injected sink failure"));
            }
            Ok(())
        }
    }

    impl ActionSink for RecordingSink {
        fn screen_size(&self) -> Result<(u32, u32)> {
            Ok((1920, 1080))
        }

        fn move_pointer(&mut self, x: i32, y: i32) -> Result<()> {
            self.record(Request::Move(x, y))
        }

        fn press(&mut self, button: MouseButton) -> Result<()> {
            self.record(Request::Press(button))
        }

        fn release(&mut self, button: MouseButton) -> Result<()> {
            self.record(Request::Release(button))
        }

        fn scroll(&mut self, amount: i32) -> Result<()> {
            self.record(Request::Scroll(amount))
        }

        fn screenshot(&mut self) -> Result<PathBuf> {
            self.record(Request::Screenshot)?;
            Ok(PathBuf::from("Screenshots/screenshot_test.png"))
        }
    }
}
