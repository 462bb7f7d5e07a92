//! Stream-style writing into a [`GrowableBuffer`].
//!
//! [`StreamSinkAdapter`] presents the buffer's storage as a write window and
//! grows the buffer whenever that window runs out. [`OutputStream`] binds an
//! adapter to the `std::io::Write` and `std::fmt::Write` interfaces that
//! stream-insertion code and the formatting engine write through.

use std::fmt;
use std::io;

use crate::buffer::{BufferError, GrowableBuffer};
use crate::logging::{is_tracing, log_event_line};

// ============================================================================
// Stream Sink Adapter
// ============================================================================

/// Write window over a borrowed [`GrowableBuffer`].
///
/// The window is `[cursor, end)`, stored as offsets into the buffer's storage
/// so growth can relocate storage freely. Units are written from offset 0;
/// everything before `cursor` is output.
///
/// The adapter never owns the buffer and lives for a single write: create it,
/// write, read [`current_size`](Self::current_size), then drop it and commit
/// the size with `resize`.
///
/// # Example
///
/// ```
/// use streamfmt::{GrowableBuffer, MemoryBuffer, StreamSinkAdapter};
///
/// let mut buffer = MemoryBuffer::with_capacity(2);
/// let mut adapter = StreamSinkAdapter::new(&mut buffer);
/// adapter.put_units(b"grows past two").unwrap();
/// let size = adapter.current_size();
/// buffer.resize(size).unwrap();
/// assert_eq!(buffer.as_str(), Some("grows past two"));
/// ```
#[derive(Debug)]
pub struct StreamSinkAdapter<'a, B: GrowableBuffer + ?Sized> {
    buffer: &'a mut B,
    cursor: usize,
    end: usize,
}

impl<'a, B: GrowableBuffer + ?Sized> StreamSinkAdapter<'a, B> {
    /// Open a window spanning the buffer's whole current capacity.
    pub fn new(buffer: &'a mut B) -> Self {
        let end = buffer.capacity();
        Self {
            buffer,
            cursor: 0,
            end,
        }
    }

    /// Units written since the window was opened.
    pub fn current_size(&self) -> usize {
        self.cursor
    }

    /// Units left in the current window before the next overflow.
    pub fn remaining(&self) -> usize {
        self.end - self.cursor
    }

    /// Write a single unit, growing the buffer if the window is full.
    pub fn put(&mut self, unit: u8) -> Result<(), BufferError> {
        if self.cursor < self.end {
            self.buffer.storage_mut()[self.cursor] = unit;
            self.cursor += 1;
        } else {
            self.handle_overflow(Some(unit))?;
        }
        Ok(())
    }

    /// Write `units` in order, overflowing one unit at a time as needed.
    ///
    /// Returns the number of units written, which is always `units.len()`
    /// on success.
    pub fn put_units(&mut self, units: &[u8]) -> Result<usize, BufferError> {
        let mut rest = units;
        loop {
            let take = rest.len().min(self.remaining());
            let (now, later) = rest.split_at(take);
            self.buffer.storage_mut()[self.cursor..self.cursor + take].copy_from_slice(now);
            self.cursor += take;

            let Some((&next, tail)) = later.split_first() else {
                return Ok(units.len());
            };
            self.handle_overflow(Some(next))?;
            rest = tail;
        }
    }

    /// Grow the buffer because `next` did not fit in the window.
    ///
    /// `None` is the end-of-output sentinel and leaves the buffer untouched.
    /// Otherwise the written units are committed as the buffer's size,
    /// capacity is doubled, `next` is stored right after the written units
    /// and the window reopens up to the new capacity. Returns `next`.
    pub fn handle_overflow(&mut self, next: Option<u8>) -> Result<Option<u8>, BufferError> {
        let Some(unit) = next else {
            return Ok(None);
        };

        let written = self.current_size();
        let old_capacity = self.buffer.capacity();
        let doubled = written
            .checked_mul(2)
            .ok_or(BufferError::CapacityOverflow)?;
        self.buffer.resize(written)?;
        self.buffer.reserve(doubled)?;

        // Storage may have moved; only offsets survive the growth above.
        self.buffer.storage_mut()[written] = unit;
        self.cursor = written + 1;
        self.end = self.buffer.capacity();

        if is_tracing() {
            log_event_line(&format!(
                "streamfmt: buffer grew {} -> {} units after {} written",
                old_capacity, self.end, written
            ));
        }
        Ok(Some(unit))
    }
}

// ============================================================================
// Output Stream
// ============================================================================

/// Stream-like write target bound to a [`StreamSinkAdapter`].
///
/// Writes through `io::Write` report buffer failures as `io::Error` with kind
/// `OutOfMemory`. Writes through `fmt::Write` can only report `fmt::Error`,
/// so the underlying [`BufferError`] is kept and handed back by
/// [`take_error`](Self::take_error).
#[derive(Debug)]
pub struct OutputStream<'a, B: GrowableBuffer + ?Sized> {
    adapter: StreamSinkAdapter<'a, B>,
    error: Option<BufferError>,
}

impl<'a, B: GrowableBuffer + ?Sized> OutputStream<'a, B> {
    /// Bind a stream to `adapter`.
    pub fn new(adapter: StreamSinkAdapter<'a, B>) -> Self {
        Self {
            adapter,
            error: None,
        }
    }

    /// Open an adapter over `buffer` and bind a stream to it.
    pub fn over(buffer: &'a mut B) -> Self {
        Self::new(StreamSinkAdapter::new(buffer))
    }

    /// Units written so far.
    pub fn size(&self) -> usize {
        self.adapter.current_size()
    }

    /// The buffer failure behind the last `fmt::Error`, if any.
    pub fn take_error(&mut self) -> Option<BufferError> {
        self.error.take()
    }
}

impl<B: GrowableBuffer + ?Sized> io::Write for OutputStream<'_, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.adapter.put_units(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<B: GrowableBuffer + ?Sized> fmt::Write for OutputStream<'_, B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.adapter.put_units(s.as_bytes()) {
            Ok(_) => Ok(()),
            Err(err) => {
                self.error = Some(err);
                Err(fmt::Error)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
