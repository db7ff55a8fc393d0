//! Frame-driven control loop.
//!
//! Reads landmark frames one at a time, runs the gesture engine to
//! completion on each, and forwards the resulting requests to the sink.
//! The loop ends when the estimator closes its stream.

use anyhow::Result;
use std::fmt;
use std::io::BufRead;
use std::time::Instant;

use crate::output::{ActionSink, MouseButton};
use crate::tracking::FrameReader;

use super::config::ControlConfig;
use super::engine::{ControlState, Event, FrameInput, FrameReport, GestureEngine};
use super::rules::ScrollDirection;

/// Counters for one control session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    /// Frames in which a full hand was tracked
    pub hand_frames: u64,
    pub pointer_moves: u64,
    pub left_clicks: u64,
    pub right_clicks: u64,
    pub scrolls_up: u64,
    pub scrolls_down: u64,
    pub drags: u64,
    pub screenshots: u64,
}

impl RunSummary {
    fn record(&mut self, input: &FrameInput, report: &FrameReport) {
        self.frames += 1;
        if input.fingers.is_some() {
            self.hand_frames += 1;
        }
        for event in &report.events {
            match event {
                Event::PointerMoved => self.pointer_moves += 1,
                Event::DragStarted => self.drags += 1,
                Event::DragEnded => {}
                Event::Clicked(MouseButton::Left) => self.left_clicks += 1,
                Event::Clicked(MouseButton::Right) => self.right_clicks += 1,
                Event::Scrolled(ScrollDirection::Up) => self.scrolls_up += 1,
                Event::Scrolled(ScrollDirection::Down) => self.scrolls_down += 1,
                Event::Screenshot => self.screenshots += 1,
            }
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames ({} with hand): {} moves, {} left clicks, {} right clicks, {}/{} scrolls up/down, {} drags, {} screenshots",
            self.frames,
            self.hand_frames,
            self.pointer_moves,
            self.left_clicks,
            self.right_clicks,
            self.scrolls_up,
            self.scrolls_down,
            self.drags,
            self.screenshots
        )
    }
}

/// Runs gesture control until the frame stream ends.
///
/// A held drag is released before returning, including when the stream
/// fails mid-way.
pub fn run<R: BufRead>(
    frames: &mut FrameReader<R>,
    sink: &mut dyn ActionSink,
    config: &ControlConfig,
) -> Result<RunSummary> {
    let (screen_width, screen_height) = match sink.screen_size() {
        Ok(size) => size,
        Err(e) => {
            crate::log(&format!(
                "Could not query screen size: {:#}. Using {}x{}.",
                e, config.fallback_screen.width, config.fallback_screen.height
            ));
            (config.fallback_screen.width, config.fallback_screen.height)
        }
    };

    let engine = GestureEngine::new(config, screen_width, screen_height);
    let mut state = ControlState::new(config);
    let mut summary = RunSummary::default();

    crate::log(&format!(
        "Gesture control started ({}x{} screen)",
        screen_width, screen_height
    ));

    let mut hand_visible = false;
    let result = loop {
        let frame = match frames.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        };

        let frame_size = (frame.width, frame.height);
        let snapshot = frame.snapshot(config.mirror_input);
        match (hand_visible, snapshot.bounding_box()) {
            (false, Some(bbox)) => {
                crate::log(&format!(
                    "Hand acquired at ({}, {})-({}, {})",
                    bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax
                ));
                hand_visible = true;
            }
            (true, None) => {
                crate::log("Hand lost");
                hand_visible = false;
            }
            _ => {}
        }

        let input = if snapshot.is_empty() {
            FrameInput::no_hand(frame_size)
        } else {
            FrameInput::from_snapshot(&snapshot, frame_size)
        };
        let now = Instant::now();

        let report = engine.step(&mut state, &input, now, sink);
        summary.record(&input, &report);
    };

    engine.release_held_buttons(&mut state, sink);
    result.map(|()| summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::recording::{RecordingSink, Request};
    use crate::tracking::landmarks::fixtures::{hand_with, open_hand};
    use crate::tracking::LandmarkSnapshot;
    use std::io::Cursor;

    const SIZE: u32 = 512;

    /// Serializes a pixel snapshot as a normalized frame line.
    fn frame_line(snapshot: Option<&LandmarkSnapshot>) -> String {
        let hands = match snapshot {
            Some(s) => {
                let points: Vec<String> = s
                    .points()
                    .iter()
                    .map(|p| {
                        format!(
                            "{{\"x\":{},\"y\":{}}}",
                            p.x as f32 / SIZE as f32,
                            p.y as f32 / SIZE as f32
                        )
                    })
                    .collect();
                format!("[[{}]]", points.join(","))
            }
            None => "[]".to_string(),
        };
        format!(
            "{{\"width\":{},\"height\":{},\"hands\":{}}}",
            SIZE, SIZE, hands
        )
    }

    fn drag_hand() -> LandmarkSnapshot {
        let mut points = open_hand();
        points[12] = (300, 215);
        LandmarkSnapshot::from_pixels(&points)
    }

    #[test]
    fn test_run_counts_actions_and_releases_drag() {
        let fist = hand_with([false; 5]);
        let drag = drag_hand();
        let lines = [
            frame_line(Some(&fist)),
            frame_line(Some(&fist)),
            frame_line(Some(&fist)),
            frame_line(None),
            frame_line(Some(&drag)),
        ];
        let mut reader = FrameReader::new(Cursor::new(lines.join("\n")));
        let mut sink = RecordingSink::default();

        let summary = run(&mut reader, &mut sink, &ControlConfig::default()).unwrap();

        assert_eq!(summary.frames, 5);
        assert_eq!(summary.hand_frames, 4);
        assert_eq!(summary.screenshots, 1);
        assert_eq!(summary.drags, 1);
        assert_eq!(sink.requests.last(), Some(&Request::Release(MouseButton::Left)));
    }

    #[test]
    fn test_run_on_empty_stream() {
        let mut reader = FrameReader::new(Cursor::new(String::new()));
        let mut sink = RecordingSink::default();

        let summary = run(&mut reader, &mut sink, &ControlConfig::default()).unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(sink.requests.is_empty());
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            frames: 10,
            hand_frames: 8,
            left_clicks: 1,
            ..RunSummary::default()
        };
        let text = summary.to_string();
        assert!(text.starts_with("10 frames (8 with hand)"));
        assert!(text.contains("1 left clicks"));
    }
}
