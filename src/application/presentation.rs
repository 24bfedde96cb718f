//! Rotating status line shown while a scrape runs
//!
//! Messages are loaded once at startup and shared read-only with the ticker
//! thread. The ticker has no data dependency on the pipeline; it only owns the
//! terminal line until it is stopped.

#![allow(clippy::uninlined_format_args)]

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::infrastructure::config::PresentationConfig;

pub const FALLBACK_MESSAGE: &str = "data loading.......";

/// Longest uninterrupted sleep, so a stop request is noticed quickly
const STOP_CHECK_SLICE: Duration = Duration::from_millis(25);

/// One message per line, blank lines skipped
pub fn parse_status_messages(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads the messages file; a missing or empty file yields the fallback message
pub fn load_status_messages(path: &Path) -> Arc<[String]> {
    let messages = match std::fs::read_to_string(path) {
        Ok(contents) => parse_status_messages(&contents),
        Err(e) => {
            debug!("No status messages at {:?}: {}", path, e);
            Vec::new()
        }
    };

    if messages.is_empty() {
        return Arc::from(vec![FALLBACK_MESSAGE.to_string()]);
    }
    debug!("Loaded {} status messages", messages.len());
    Arc::from(messages)
}

/// Writes `text` one character at a time
pub fn type_out<W: Write>(writer: &mut W, text: &str, delay: Duration) -> io::Result<()> {
    for c in text.chars() {
        write!(writer, "{}", c)?;
        writer.flush()?;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct TickerSettings {
    pub typing_delay: Duration,
    pub hold: Duration,
}

impl From<&PresentationConfig> for TickerSettings {
    fn from(config: &PresentationConfig) -> Self {
        Self {
            typing_delay: config.typing_delay(),
            hold: config.hold(),
        }
    }
}

/// Handle to the ticker thread; stopping (or dropping) it clears the line
pub struct StatusTicker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl StatusTicker {
    pub fn start<W>(messages: Arc<[String]>, settings: TickerSettings, writer: W) -> io::Result<Self>
    where
        W: Write + Send + 'static,
    {
        let messages = if messages.is_empty() {
            Arc::from(vec![FALLBACK_MESSAGE.to_string()])
        } else {
            messages
        };

        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("status-ticker".to_string())
            .spawn(move || run_ticker(&messages, settings, &flag, writer))?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Status ticker thread panicked");
            }
        }
    }
}

impl Drop for StatusTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Sleeps for `duration` in short slices; false once a stop was requested
fn pause(stop: &AtomicBool, duration: Duration) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep((deadline - now).min(STOP_CHECK_SLICE));
    }
}

fn clear_line<W: Write>(writer: &mut W, width: usize) -> io::Result<()> {
    write!(writer, "\r{}\r", " ".repeat(width))?;
    writer.flush()
}

fn run_ticker<W: Write>(messages: &[String], settings: TickerSettings, stop: &AtomicBool, mut writer: W) {
    let mut width = 0;

    'outer: while !stop.load(Ordering::Relaxed) {
        let message = &messages[fastrand::usize(..messages.len())];

        for c in message.chars() {
            if let Err(e) = write!(writer, "{}", c).and_then(|()| writer.flush()) {
                debug!("Status ticker output closed: {}", e);
                return;
            }
            width += 1;
            if !pause(stop, settings.typing_delay) {
                break 'outer;
            }
        }

        if !pause(stop, settings.hold) {
            break;
        }
        if let Err(e) = clear_line(&mut writer, width) {
            debug!("Status ticker output closed: {}", e);
            return;
        }
        width = 0;
    }

    // a stop leaves a partly typed message behind
    if let Err(e) = clear_line(&mut writer, width) {
        debug!("Failed to clear status line: {}", e);
    }
}
