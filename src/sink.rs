//! Assembling formatted output and delivering it to a sink.
//!
//! A [`Printer`] formats a whole line into a [`MemoryBuffer`] through the
//! stream adapter, then [`write`] copies the buffer's contents to an
//! `std::io::Write` sink. [`print!`](crate::print) is the variadic entry
//! point; every argument goes through [`arg!`](crate::arg), so values that
//! only support stream insertion print alongside ordinary `Display` values.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::adapter::OutputStream;
use crate::buffer::{BufferError, DEFAULT_CAPACITY, GrowableBuffer, MemoryBuffer};
use crate::logging::log_event;

// ============================================================================
// Errors
// ============================================================================

/// Why a print did not reach its sink.
#[derive(Debug, Error)]
pub enum PrintError {
    /// An argument's formatting failed.
    #[error("formatting an argument failed")]
    Format(#[from] fmt::Error),
    /// The output buffer could not grow.
    #[error(transparent)]
    Buffer(#[from] BufferError),
    /// The sink rejected the write.
    #[error(transparent)]
    Sink(#[from] io::Error),
}

// ============================================================================
// Sink Writer
// ============================================================================

/// Write every unit held by `buffer` to `sink`, in order.
///
/// Nothing is added around the contents. An empty buffer performs no write
/// at all. Sink failures are returned unchanged.
pub fn write<W, B>(sink: &mut W, buffer: &B) -> io::Result<()>
where
    W: io::Write + ?Sized,
    B: GrowableBuffer + ?Sized,
{
    let bytes = buffer.as_bytes();
    if bytes.is_empty() {
        return Ok(());
    }
    sink.write_all(bytes)
}

/// Format `args` into `buffer`, replacing its contents.
///
/// On failure the buffer is left empty.
pub fn format_into<B>(buffer: &mut B, args: fmt::Arguments<'_>) -> Result<(), PrintError>
where
    B: GrowableBuffer + ?Sized,
{
    let written = {
        let mut stream = OutputStream::over(buffer);
        match fmt::Write::write_fmt(&mut stream, args) {
            Ok(()) => Ok(stream.size()),
            Err(err) => Err(stream
                .take_error()
                .map_or(PrintError::Format(err), PrintError::Buffer)),
        }
    };
    match written {
        Ok(size) => {
            buffer.resize(size)?;
            Ok(())
        }
        Err(err) => {
            buffer.clear();
            Err(err)
        }
    }
}

// ============================================================================
// Printer
// ============================================================================

/// Formats lines and writes them to sinks.
///
/// # Example
///
/// ```
/// use streamfmt::Printer;
///
/// let printer = Printer::with_capacity(64);
/// let mut out = Vec::new();
/// printer.print(&mut out, format_args!("{}-{}", "a", 1)).unwrap();
/// assert_eq!(out, b"a-1");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    capacity: usize,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    /// Create a printer whose output buffer starts at [`DEFAULT_CAPACITY`].
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Create a printer whose output buffer starts at `capacity` units.
    ///
    /// Any capacity works, zero included; the buffer grows as needed.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Initial capacity of each output buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Format `args` into a fresh buffer.
    pub fn format(&self, args: fmt::Arguments<'_>) -> Result<MemoryBuffer, PrintError> {
        let mut buffer = MemoryBuffer::with_capacity(self.capacity);
        format_into(&mut buffer, args)?;
        Ok(buffer)
    }

    /// Format `args` and write the result to `sink`.
    ///
    /// Nothing reaches the sink unless formatting fully succeeded.
    pub fn print<W: io::Write>(
        &self,
        mut sink: W,
        args: fmt::Arguments<'_>,
    ) -> Result<(), PrintError> {
        let buffer = self.format(args)?;
        write(&mut sink, &buffer).map_err(|err| {
            log_event(&format!("streamfmt: sink write failed: {err}"));
            PrintError::Sink(err)
        })
    }
}

/// Format `args` with the default [`Printer`] and write them to `sink`.
pub fn vprint<W: io::Write>(sink: W, args: fmt::Arguments<'_>) -> Result<(), PrintError> {
    Printer::new().print(sink, args)
}

/// Print formatted arguments to an `io::Write` sink.
///
/// Arguments are positional. Each one renders through its `Display` if it
/// has one, otherwise through its [`StreamInsert`](crate::StreamInsert)
/// implementation.
///
/// ```
/// use std::io;
/// use streamfmt::StreamInsert;
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl StreamInsert for Point {
///     fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
///         write!(stream, "({},{})", self.x, self.y)
///     }
/// }
///
/// let mut out = Vec::new();
/// streamfmt::print!(&mut out, "point={}", Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(out, b"point=(1,2)");
/// ```
#[macro_export]
macro_rules! print {
    ($sink:expr, $template:literal $(, $arg:expr)* $(,)?) => {
        $crate::vprint($sink, ::std::format_args!($template $(, $crate::arg!($arg))*))
    };
}

// ============================================================================
// Tests
// ============================================================================
