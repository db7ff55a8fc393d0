//! Hand tracking inputs.
//!
//! This module provides:
//! - Landmark snapshots built from pose estimator output
//! - Finger up/down classification
//! - Landmark distance measurement
//! - A line-oriented reader for the estimator's frame stream

pub mod distance;
pub mod fingers;
pub mod landmarks;
pub mod source;

pub use distance::{measure, pixel_distance};
pub use fingers::{classify, Finger, FingerState};
pub use landmarks::LandmarkSnapshot;
pub use source::FrameReader;
