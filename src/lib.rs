//! Stream-insertion formatting bridge.
//!
//! streamfmt lets the standard formatting machinery render values whose only
//! textual form comes from writing themselves into a stream, and delivers the
//! finished output to any `std::io::Write` sink. It provides:
//!
//! - A growable buffer contract and a heap-backed buffer
//! - A stream adapter that grows its buffer whenever a writer overflows it
//! - A compile-time probe for the stream-insertion capability
//! - Value capture that feeds stream-inserted text back into formatting
//! - A printer that writes assembled output to a sink
//!
//! # Example
//!
//! ```
//! use std::io;
//! use streamfmt::StreamInsert;
//!
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl StreamInsert for Point {
//!     fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
//!         write!(stream, "({},{})", self.x, self.y)
//!     }
//! }
//!
//! let mut out = Vec::new();
//! streamfmt::print!(&mut out, "point={}", Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(out, b"point=(1,2)");
//! ```
//!
//! # Modules
//!
//! - [`buffer`] - GrowableBuffer contract and MemoryBuffer
//! - [`adapter`] - StreamSinkAdapter and OutputStream
//! - [`probe`] - StreamInsert trait and the `can_insert!` probe
//! - [`capture`] - format_value, Argument, and the `arg!` selector
//! - [`sink`] - SinkWriter `write`, Printer, `vprint`, and `print!`
//! - [`json`] - serde-backed stream insertion
//! - [`logging`] - TraceSink trait and global trace logging

pub mod adapter;
pub mod buffer;
pub mod capture;
pub mod json;
pub mod logging;
pub mod probe;
pub mod sink;

// Re-export commonly used types
pub use adapter::{OutputStream, StreamSinkAdapter};
pub use buffer::{BufferError, DEFAULT_CAPACITY, GrowableBuffer, MIN_CAPACITY, MemoryBuffer};
pub use capture::{Argument, format_value};
pub use json::Json;
pub use logging::{
    TraceSink, disable_logging, enable_logging, get_trace_sink, is_logging_enabled, log_event,
    log_event_line, reset_trace_sink, set_trace_sink,
};
pub use probe::StreamInsert;
pub use sink::{PrintError, Printer, format_into, vprint, write};
