//! Landmark frames delivered by the external pose estimator.
//!
//! The estimator writes one JSON object per line:
//!
//! ```text
//! {"width":640,"height":512,"hands":[[{"x":0.51,"y":0.42,"z":-0.03}, ...]]}
//! ```
//!
//! Coordinates are normalized to the frame. Only the first hand is tracked.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::BufRead;

use super::landmarks::{LandmarkSnapshot, NormalizedPoint};

/// One frame of estimator output.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameRecord {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Detected hands, each a list of landmarks in id order
    #[serde(default)]
    pub hands: Vec<Vec<NormalizedPoint>>,
}

impl FrameRecord {
    /// Pixel-space snapshot of the first detected hand.
    ///
    /// Empty when no hand was detected or the hand has coordinates far
    /// outside the frame.
    pub fn snapshot(&self, mirror: bool) -> LandmarkSnapshot {
        let Some(hand) = self.hands.first() else {
            return LandmarkSnapshot::empty();
        };
        if !hand.iter().all(NormalizedPoint::is_plausible) {
            crate::log("Ignoring hand with out-of-frame landmarks");
            return LandmarkSnapshot::empty();
        }
        LandmarkSnapshot::from_normalized(hand, self.width, self.height, mirror)
    }
}

/// Parses a single line of estimator output.
pub fn parse_frame(line: &str) -> Result<FrameRecord> {
    serde_json::from_str(line).context("Failed to parse landmark frame")
}

/// Reads frames line by line from an estimator stream.
pub struct FrameReader<R> {
    reader: R,
    line: String,
    line_number: usize,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }

    /// Returns the next well-formed frame, or `None` at end of input.
    ///
    /// Blank lines are skipped. Malformed lines are logged and skipped so a
    /// single bad record does not stop pointer control.
    pub fn next_frame(&mut self) -> Result<Option<FrameRecord>> {
        loop {
            self.line.clear();
            let read = self
                .reader
                .read_line(&mut self.line)
                .context("Failed to read landmark stream")?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match parse_frame(trimmed) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) => crate::log(&format!(
                    "Skipping line {}: {:#}",
                    self.line_number, e
                )),
            }
        }
    }
}
