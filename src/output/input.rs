//! Mouse input injection through SendInput.
//!
//! SendInput simulates hardware-level input, so the real cursor moves and
//! every application sees the events as if they came from a mouse.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN,
    MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MOVE, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP,
    MOUSEEVENTF_WHEEL, MOUSE_EVENT_FLAGS, MOUSEINPUT,
};
use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

use super::screenshot::capture_screen_to_file;
use super::{ActionSink, MouseButton};

/// Sends a single mouse event.
fn send_mouse(dx: i32, dy: i32, data: u32, flags: MOUSE_EVENT_FLAGS) -> Result<()> {
    let input = INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: data,
                dwFlags: flags,
                ..Default::default()
            },
        },
    };
    let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if sent != 1 {
        return Err(anyhow!("SendInput delivered {} of 1 events", sent));
    }
    Ok(())
}

/// Action sink driving the real mouse on Windows.
pub struct SendInputSink {
    screen_width: i32,
    screen_height: i32,
}

impl SendInputSink {
    /// Queries the primary screen size once.
    pub fn new() -> Result<Self> {
        let screen_width = unsafe { GetSystemMetrics(SM_CXSCREEN) };
        let screen_height = unsafe { GetSystemMetrics(SM_CYSCREEN) };
        if screen_width <= 0 || screen_height <= 0 {
            return Err(anyhow!("GetSystemMetrics returned no screen size"));
        }
        crate::log(&format!("Screen: {}x{}", screen_width, screen_height));
        Ok(Self {
            screen_width,
            screen_height,
        })
    }

    /// Normalizes a screen position to the 0-65535 range MOUSEEVENTF_ABSOLUTE expects.
    fn normalize(&self, x: i32, y: i32) -> (i32, i32) {
        let norm_x = ((x as i64 * 65535) / self.screen_width as i64) as i32;
        let norm_y = ((y as i64 * 65535) / self.screen_height as i64) as i32;
        (norm_x, norm_y)
    }
}

impl ActionSink for SendInputSink {
    fn screen_size(&self) -> Result<(u32, u32)> {
        Ok((self.screen_width as u32, self.screen_height as u32))
    }

    fn move_pointer(&mut self, x: i32, y: i32) -> Result<()> {
        let (nx, ny) = self.normalize(x, y);
        send_mouse(nx, ny, 0, MOUSEEVENTF_MOVE | MOUSEEVENTF_ABSOLUTE)
    }

    fn press(&mut self, button: MouseButton) -> Result<()> {
        let flags = match button {
            MouseButton::Left => MOUSEEVENTF_LEFTDOWN,
            MouseButton::Right => MOUSEEVENTF_RIGHTDOWN,
        };
        send_mouse(0, 0, 0, flags)
    }

    fn release(&mut self, button: MouseButton) -> Result<()> {
        let flags = match button {
            MouseButton::Left => MOUSEEVENTF_LEFTUP,
            MouseButton::Right => MOUSEEVENTF_RIGHTUP,
        };
        send_mouse(0, 0, 0, flags)
    }

    fn scroll(&mut self, amount: i32) -> Result<()> {
        // Wheel delta travels as the two's-complement bits of a signed value.
        send_mouse(0, 0, amount as u32, MOUSEEVENTF_WHEEL)
    }

    fn screenshot(&mut self) -> Result<PathBuf> {
        capture_screen_to_file()
    }
}
