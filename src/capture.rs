//! Capturing stream-inserted text for the formatting engine.
//!
//! [`format_value`] runs a value's stream insertion into a buffer through
//! the adapter. [`Argument`] is what `print!` hands the engine for each
//! argument: the value itself when it has a native `Display`, or a deferred
//! capture when its only rendering is [`StreamInsert`]. [`arg!`](crate::arg)
//! makes that choice per type at compile time.

use std::fmt;
use std::io;

use crate::adapter::OutputStream;
use crate::buffer::{GrowableBuffer, MemoryBuffer};
use crate::logging::log_event;
use crate::probe::StreamInsert;

// ============================================================================
// Value Capture
// ============================================================================

/// Write `value` into `buffer` by stream insertion.
///
/// The buffer is overwritten from its start. On success its size is exactly
/// the number of units the insertion produced. On failure the buffer is left
/// empty and the insertion's error is returned.
///
/// # Example
///
/// ```
/// use std::io;
/// use streamfmt::{MemoryBuffer, StreamInsert, format_value};
///
/// struct Version(u8, u8);
///
/// impl StreamInsert for Version {
///     fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
///         write!(stream, "v{}.{}", self.0, self.1)
///     }
/// }
///
/// let mut buffer = MemoryBuffer::new();
/// format_value(&mut buffer, &Version(1, 4)).unwrap();
/// assert_eq!(buffer.as_str(), Some("v1.4"));
/// ```
pub fn format_value<B, T>(buffer: &mut B, value: &T) -> io::Result<()>
where
    B: GrowableBuffer + ?Sized,
    T: StreamInsert + ?Sized,
{
    let written = {
        let mut stream = OutputStream::over(buffer);
        value.insert(&mut stream).map(|()| stream.size())
    };
    match written {
        Ok(size) => {
            buffer.resize(size)?;
            Ok(())
        }
        Err(err) => {
            // No partial output survives a failed insertion.
            buffer.clear();
            Err(err)
        }
    }
}

// ============================================================================
// Arguments
// ============================================================================

/// One argument as seen by the formatting engine.
#[derive(Clone, Copy)]
pub enum Argument<'a> {
    /// Rendered by the value's own `Display`.
    Native(&'a dyn fmt::Display),
    /// Rendered by capturing the value's stream insertion.
    Inserted(&'a dyn StreamInsert),
}

impl Argument<'_> {
    /// Whether this argument renders through stream-insertion capture.
    pub fn is_captured(&self) -> bool {
        matches!(self, Argument::Inserted(_))
    }
}

impl fmt::Debug for Argument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Native(_) => f.write_str("Argument::Native(..)"),
            Argument::Inserted(_) => f.write_str("Argument::Inserted(..)"),
        }
    }
}

impl fmt::Display for Argument<'_> {
    /// Captured text is formatted as a string argument: width, fill,
    /// alignment and precision apply to it as they would to `&str`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Argument::Native(value) => value.fmt(f),
            Argument::Inserted(value) => {
                let mut buffer = MemoryBuffer::new();
                if let Err(err) = format_value(&mut buffer, value) {
                    log_event(&format!("streamfmt: stream insertion failed: {err}"));
                    return Err(fmt::Error);
                }
                f.pad(&String::from_utf8_lossy(buffer.as_bytes()))
            }
        }
    }
}

// ============================================================================
// Argument Selection
// ============================================================================

/// Borrowed value awaiting argument selection by [`arg!`](crate::arg).
pub struct Select<'a, T: ?Sized>(pub &'a T);

/// Selection when the value has a native `Display`.
///
/// Implemented on `Select` itself, so it wins method resolution.
pub trait NativeKind<'a> {
    fn argument(&self) -> Argument<'a>;
}

impl<'a, T: fmt::Display> NativeKind<'a> for Select<'a, T> {
    fn argument(&self) -> Argument<'a> {
        Argument::Native(self.0)
    }
}

/// Selection when the value only has stream insertion.
///
/// Implemented on `&Select`, reached only after autoref.
pub trait InsertedKind<'a> {
    fn argument(&self) -> Argument<'a>;
}

impl<'a, 'b, T: StreamInsert> InsertedKind<'a> for &'b Select<'a, T> {
    fn argument(&self) -> Argument<'a> {
        Argument::Inserted(self.0)
    }
}

/// Turn a value into an [`Argument`], preferring its native `Display`.
///
/// Falls back to stream-insertion capture when the type only implements
/// [`StreamInsert`]. A type with neither is a compile error.
///
/// ```
/// use streamfmt::arg;
///
/// let count = 3u32;
/// assert!(!arg!(count).is_captured());
/// assert!(arg!(streamfmt::Json::new([1u8, 2])).is_captured());
/// ```
#[macro_export]
macro_rules! arg {
    ($value:expr) => {
        match &$value {
            value => {
                #[allow(unused_imports)]
                use $crate::capture::{InsertedKind as _, NativeKind as _};
                (&$crate::capture::Select(value)).argument()
            }
        }
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MIN_CAPACITY;
    use crate::logging::tests::{MockSink, SINK_LOCK};
    use crate::logging::{enable_logging, reset_trace_sink, set_trace_sink};
    use std::sync::Arc;

    struct Point {
        x: i32,
        y: i32,
    }

    impl StreamInsert for Point {
        fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
            write!(stream, "({},{})", self.x, self.y)
        }
    }

    /// Writes `len` bytes one at a time.
    struct Run {
        len: usize,
    }

    impl StreamInsert for Run {
        fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
            for i in 0..self.len {
                stream.write_all(&[b'a' + (i % 26) as u8])?;
            }
            Ok(())
        }
    }

    /// Writes a prefix and then fails.
    struct Broken;

    impl StreamInsert for Broken {
        fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
            stream.write_all(b"partial")?;
            Err(io::Error::other("insertion refused"))
        }
    }

    /// Implements both renderings with different output.
    struct Both;

    impl fmt::Display for Both {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("display")
        }
    }

    impl StreamInsert for Both {
        fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
            stream.write_all(b"inserted")
        }
    }

    fn reference_output(value: &dyn StreamInsert) -> Vec<u8> {
        let mut direct = Vec::new();
        value.insert(&mut direct).unwrap();
        direct
    }

    #[test]
    fn test_format_value_matches_direct_write() {
        let point = Point { x: -7, y: 12 };
        let mut buffer = MemoryBuffer::new();
        format_value(&mut buffer, &point).unwrap();
        assert_eq!(buffer.as_bytes(), reference_output(&point).as_slice());
        assert_eq!(buffer.size(), "(-7,12)".len());
    }

    #[test]
    fn test_format_value_grows_small_buffer() {
        let run = Run { len: 1000 };
        let mut buffer = MemoryBuffer::with_capacity(0);
        format_value(&mut buffer, &run).unwrap();
        assert_eq!(buffer.size(), 1000);
        assert_eq!(buffer.as_bytes(), reference_output(&run).as_slice());
    }

    #[test]
    fn test_format_value_at_capacity_boundary() {
        for len in [MIN_CAPACITY - 1, MIN_CAPACITY, MIN_CAPACITY + 1] {
            let run = Run { len };
            let mut buffer = MemoryBuffer::with_capacity(MIN_CAPACITY);
            format_value(&mut buffer, &run).unwrap();
            assert_eq!(buffer.size(), len);
            assert_eq!(buffer.as_bytes(), reference_output(&run).as_slice());
        }
    }

    #[test]
    fn test_format_value_replaces_previous_contents() {
        let mut buffer = MemoryBuffer::new();
        format_value(&mut buffer, &Run { len: 40 }).unwrap();
        format_value(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
        assert_eq!(buffer.as_str(), Some("(1,2)"));
    }

    #[test]
    fn test_format_value_failure_leaves_buffer_empty() {
        let mut buffer = MemoryBuffer::new();
        let err = format_value(&mut buffer, &Broken).unwrap_err();
        assert_eq!(err.to_string(), "insertion refused");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_empty_value_does_not_grow_buffer() {
        let mut buffer = MemoryBuffer::with_capacity(0);
        format_value(&mut buffer, &Run { len: 0 }).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 0);

        let mut small = MemoryBuffer::with_capacity(8);
        format_value(&mut small, &Point { x: 1, y: 2 }).unwrap();
        assert_eq!(small.as_str(), Some("(1,2)"));
        assert_eq!(small.capacity(), 8);
    }

    #[test]
    fn test_arg_prefers_native_display() {
        let both = Both;
        let argument = arg!(both);
        assert!(!argument.is_captured());
        assert_eq!(argument.to_string(), "display");

        let text = "plain";
        assert!(!arg!(text).is_captured());
    }

    #[test]
    fn test_arg_falls_back_to_insertion() {
        let point = Point { x: 1, y: 2 };
        let argument = arg!(point);
        assert!(argument.is_captured());
        assert_eq!(argument.to_string(), "(1,2)");
        assert_eq!(format!("{:?}", argument), "Argument::Inserted(..)");
    }

    #[test]
    fn test_captured_text_honors_format_spec() {
        let point = Point { x: 1, y: 2 };
        assert_eq!(format!("[{:>8}]", arg!(point)), "[   (1,2)]");
        assert_eq!(format!("[{:-<7}]", arg!(point)), "[(1,2)--]");
        assert_eq!(format!("[{:.3}]", arg!(point)), "[(1,]");
    }

    #[test]
    fn test_captured_failure_is_fmt_error_and_traced() {
        let _lock = SINK_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        enable_logging();
        let sink = Arc::new(MockSink::new());
        set_trace_sink(sink.clone());

        let broken = Broken;
        let mut out = String::new();
        let result = fmt::Write::write_fmt(&mut out, format_args!("{}", arg!(broken)));

        reset_trace_sink();
        assert!(result.is_err());
        assert!(
            sink.emits()
                .iter()
                .any(|e| e.contains("stream insertion failed: insertion refused")),
            "got {:?}",
            sink.emits()
        );
    }
}
