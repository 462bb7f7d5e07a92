//! Shared test helpers for streamfmt tests.
//!
//! This module provides common utilities used across test files to reduce
//! duplication and ensure consistent test behavior.

// Allow dead code since not all test files use all helpers
#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use streamfmt::{StreamInsert, TraceSink};

// =============================================================================
// ANSI Stripping
// =============================================================================

/// Strip ANSI escape codes for content verification in tests.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip the escape sequence
            if chars.peek() == Some(&'[') {
                chars.next(); // consume '['
                // Skip until we hit a letter (the terminator)
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

// =============================================================================
// Sample Types
// =============================================================================

/// Point rendered as `(x,y)` through stream insertion only.
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl StreamInsert for Point {
    fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
        write!(stream, "({},{})", self.x, self.y)
    }
}

/// Writes `len` units, one `write_all` per unit.
pub struct Letters {
    pub len: usize,
}

impl Letters {
    /// The exact bytes an insertion of `self` produces.
    pub fn expected(&self) -> String {
        (0..self.len)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect()
    }
}

impl StreamInsert for Letters {
    fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
        for i in 0..self.len {
            stream.write_all(&[b'a' + (i % 26) as u8])?;
        }
        Ok(())
    }
}

/// Writes its chunks with one `write_all` each.
pub struct Chunks(pub Vec<String>);

impl StreamInsert for Chunks {
    fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
        for chunk in &self.0 {
            stream.write_all(chunk.as_bytes())?;
        }
        Ok(())
    }
}

/// Has no rendering of any kind.
pub struct Opaque;

// =============================================================================
// Sinks
// =============================================================================

/// An `io::Write` sink that counts write calls and keeps the bytes.
#[derive(Default)]
pub struct RecordingWriter {
    pub calls: usize,
    pub bytes: Vec<u8>,
}

impl RecordingWriter {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl io::Write for RecordingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.calls += 1;
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// An `io::Write` sink whose every write fails.
pub struct FailingWriter {
    pub kind: io::ErrorKind,
}

impl io::Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(self.kind, "sink unavailable"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Test Capture Sink
// =============================================================================

/// A trace sink that captures all logged output for verification.
pub struct CaptureSink {
    /// The captured messages, wrapped in Arc<Mutex> for thread safety.
    pub captured: Arc<Mutex<Vec<String>>>,
}

impl CaptureSink {
    /// Create a new capture sink and return both the sink and a handle
    /// to the captured messages.
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = Self {
            captured: captured.clone(),
        };
        (sink, captured)
    }
}

impl Default for CaptureSink {
    fn default() -> Self {
        Self::new().0
    }
}

impl TraceSink for CaptureSink {
    fn emit(&self, message: &str) {
        self.captured.lock().unwrap().push(message.to_string());
    }

    fn emit_line(&self, message: &str) {
        self.captured.lock().unwrap().push(message.to_string());
    }
}

// =============================================================================
// RAII Guards
// =============================================================================

/// Serializes tests that install the global trace sink.
pub static TRACE_LOCK: Mutex<()> = Mutex::new(());

/// RAII guard for trace state cleanup.
///
/// Holds [`TRACE_LOCK`] and removes the global sink when dropped, even if
/// the test panics.
pub struct TraceGuard {
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl TraceGuard {
    /// Install a fresh capture sink and return the guard with its messages.
    pub fn install() -> (Self, Arc<Mutex<Vec<String>>>) {
        let lock = TRACE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let (sink, captured) = CaptureSink::new();
        streamfmt::enable_logging();
        streamfmt::set_trace_sink(Arc::new(sink));
        (Self { _lock: lock }, captured)
    }
}

impl Drop for TraceGuard {
    fn drop(&mut self) {
        streamfmt::reset_trace_sink();
    }
}
