//! Virtual Mouse
//!
//! Drives the system pointer from hand gestures. Hand landmarks come from an
//! external pose estimator as JSON lines on stdin (or a file given as the
//! only argument); each frame is classified into move, click, scroll, drag
//! or screenshot actions.

mod control;
mod output;
mod paths;
mod tracking;

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};

use crate::output::{ActionSink, DryRunSink};
use crate::tracking::FrameReader;

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("virtual_mouse.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        let log_msg = format!("[PANIC]{} {}\n", location, msg);
        eprintln!("{}", log_msg);
        let log_path = paths::get_logs_dir().join("virtual_mouse.log");
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            let _ = file.write_all(log_msg.as_bytes());
        }
    }));

    // Screen capture goes through WinRT
    #[cfg(windows)]
    unsafe {
        windows::Win32::System::WinRT::RoInitialize(
            windows::Win32::System::WinRT::RO_INIT_MULTITHREADED,
        )?
    };

    // Ensure output directories exist
    paths::ensure_directories()?;

    // Load configuration
    control::init_config();
    let config = control::get_config();

    let mut sink = create_sink(config);

    let summary = match std::env::args().nth(1) {
        Some(path) => {
            log(&format!("Reading landmark frames from {}", path));
            let file = File::open(&path).with_context(|| format!("Failed to open {}", path))?;
            let mut frames = FrameReader::new(BufReader::new(file));
            control::run(&mut frames, sink.as_mut(), config)?
        }
        None => {
            log("Reading landmark frames from stdin");
            let mut frames = FrameReader::new(std::io::stdin().lock());
            control::run(&mut frames, sink.as_mut(), config)?
        }
    };

    log(&format!("Input ended: {}", summary));
    Ok(())
}

/// Picks the OS backend, falling back to logging when none is available.
fn create_sink(config: &control::ControlConfig) -> Box<dyn ActionSink> {
    if config.dry_run {
        log("Dry-run mode: OS actions are logged, not performed");
        return Box::new(DryRunSink::new(config.fallback_screen));
    }

    #[cfg(windows)]
    {
        match output::SendInputSink::new() {
            Ok(sink) => return Box::new(sink),
            Err(e) => log(&format!("Mouse input unavailable: {:#}. Falling back to dry-run.", e)),
        }
    }

    #[cfg(not(windows))]
    log("No mouse input backend on this platform. Falling back to dry-run.");

    Box::new(DryRunSink::new(config.fallback_screen))
}
