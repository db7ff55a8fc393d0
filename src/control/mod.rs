//! Gesture-to-pointer control.
//!
//! This module provides:
//! - Configuration loading (thresholds, timing, pointer tuning)
//! - Frame-to-screen pointer mapping with smoothing and a dead zone
//! - Cooldown timers and the ordered gesture decision table
//! - The gesture action engine and the frame-driven control loop

pub mod config;
pub mod engine;
pub mod pointer;
pub mod rules;
pub mod runner;
pub mod timers;

pub use config::{get_config, init_config, ControlConfig};
pub use runner::run;
