//! Sink that logs requests instead of performing them.
//!
//! Used when `dry_run` is set in config.json and on platforms without an
//! input backend.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

use super::{ActionSink, MouseButton};
use crate::control::config::ScreenSize;

pub struct DryRunSink {
    screen: ScreenSize,
}

impl DryRunSink {
    pub fn new(screen: ScreenSize) -> Self {
        Self { screen }
    }
}

impl ActionSink for DryRunSink {
    fn screen_size(&self) -> Result<(u32, u32)> {
        Ok((self.screen.width, self.screen.height))
    }

    // Pointer moves arrive every frame; only buttons and the wheel are logged.
    fn move_pointer(&mut self, _x: i32, _y: i32) -> Result<()> {
        Ok(())
    }

    fn press(&mut self, button: MouseButton) -> Result<()> {
        crate::log(&format!("[dry-run] press {}", button));
        Ok(())
    }

    fn release(&mut self, button: MouseButton) -> Result<()> {
        crate::log(&format!("[dry-run] release {}", button));
        Ok(())
    }

    fn scroll(&mut self, amount: i32) -> Result<()> {
        crate::log(&format!("[dry-run] scroll {}", amount));
        Ok(())
    }

    fn screenshot(&mut self) -> Result<PathBuf> {
        Err(anyhow!("screen capture is not available in dry-run mode"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_configured_screen() {
        let sink = DryRunSink::new(ScreenSize {
            width: 1280,
            height: 720,
        });
        assert_eq!(sink.screen_size().unwrap(), (1280, 720));
    }

    #[test]
    fn test_requests_succeed_except_screenshot() {
        let mut sink = DryRunSink::new(ScreenSize::default());
        assert!(sink.move_pointer(10, 10).is_ok());
        assert!(sink.press(MouseButton::Left).is_ok());
        assert!(sink.release(MouseButton::Left).is_ok());
        assert!(sink.scroll(-100).is_ok());
        assert!(sink.screenshot().is_err());
    }
}
