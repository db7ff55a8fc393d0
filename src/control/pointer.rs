//! Frame-to-screen pointer mapping.
//!
//! Maps a fingertip position inside the camera frame to a screen position,
//! smooths it against the previous position and drops jitter below the dead
//! zone.

use super::config::ControlConfig;

/// Last committed screen position of the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorState {
    pub x: f64,
    pub y: f64,
}

/// A pointer move to request from the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

/// Pointer mapping parameters for one screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerMapper {
    screen_width: u32,
    screen_height: u32,
    margin: f64,
    smoothing: f64,
    dead_zone: f64,
}

impl PointerMapper {
    pub fn new(screen_width: u32, screen_height: u32, config: &ControlConfig) -> Self {
        Self {
            screen_width,
            screen_height,
            margin: f64::from(config.boundary_margin),
            smoothing: config.smoothing,
            dead_zone: config.dead_zone,
        }
    }

    /// Linearly maps `value` from `[margin, extent - margin]` onto `[0, target]`.
    ///
    /// Values outside the source range extrapolate. Returns `None` when the
    /// margins leave no usable range.
    fn rescale(&self, value: f64, extent: u32, target: u32) -> Option<f64> {
        let span = f64::from(extent) - 2.0 * self.margin;
        if span <= 0.0 {
            return None;
        }
        Some((value - self.margin) * f64::from(target) / span)
    }

    /// Advances the cursor toward the frame point `(x, y)`.
    ///
    /// Returns the position to move the OS pointer to, or `None` when the
    /// smoothed motion stays inside the dead zone. `cursor` is only updated
    /// when a move is returned.
    pub fn track(
        &self,
        cursor: &mut CursorState,
        (x, y): (i32, i32),
        (frame_width, frame_height): (u32, u32),
    ) -> Option<ScreenPoint> {
        let target_x = self.rescale(f64::from(x), frame_width, self.screen_width)?;
        let target_y = self.rescale(f64::from(y), frame_height, self.screen_height)?;

        let max_x = f64::from(self.screen_width.saturating_sub(1));
        let max_y = f64::from(self.screen_height.saturating_sub(1));
        let next_x = (cursor.x + (target_x - cursor.x) * self.smoothing).clamp(0.0, max_x);
        let next_y = (cursor.y + (target_y - cursor.y) * self.smoothing).clamp(0.0, max_y);

        let moved = (next_x - cursor.x).abs() > self.dead_zone
            || (next_y - cursor.y).abs() > self.dead_zone;
        if !moved {
            return None;
        }

        *cursor = CursorState {
            x: next_x,
            y: next_y,
        };
        Some(ScreenPoint {
            x: next_x as i32,
            y: next_y as i32,
        })
    }
}
