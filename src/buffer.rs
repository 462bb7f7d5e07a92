//! Growable output buffers.
//!
//! [`GrowableBuffer`] is the contract the stream adapter writes through:
//! a contiguous storage region addressed by offset, with a logical `size`
//! tracked separately from the allocated `capacity`. [`MemoryBuffer`] is the
//! heap-backed implementation used for captures and assembled output.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Capacity of a freshly created [`MemoryBuffer`].
pub const DEFAULT_CAPACITY: usize = 500;

/// Smallest capacity any successful `reserve` call leaves behind.
///
/// Overflow on the very first unit asks for `reserve(0)`; this floor is what
/// makes room for that unit.
pub const MIN_CAPACITY: usize = 16;

// ============================================================================
// Errors
// ============================================================================

/// Failure to provide the storage a writer asked for.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The requested capacity does not fit in `usize`.
    #[error("requested buffer capacity overflows usize")]
    CapacityOverflow,
    /// The allocator refused to provide the storage.
    #[error("failed to allocate {requested} bytes of buffer storage")]
    Alloc {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
}

impl From<BufferError> for io::Error {
    fn from(err: BufferError) -> Self {
        io::Error::new(io::ErrorKind::OutOfMemory, err)
    }
}

// ============================================================================
// Buffer Contract
// ============================================================================

/// A resizable sequence of byte units with separate size and capacity.
///
/// Storage is addressed by offset only. Any call that can grow the buffer may
/// move its storage, so callers keep offsets, never slices, across growth.
pub trait GrowableBuffer {
    /// Number of units logically held.
    fn size(&self) -> usize;

    /// Number of units of allocated storage.
    fn capacity(&self) -> usize;

    /// Set the logical size, growing capacity only if `size` exceeds it.
    fn resize(&mut self, size: usize) -> Result<(), BufferError>;

    /// Drop the logical contents, keeping the storage. Never allocates.
    fn clear(&mut self);

    /// Ensure `capacity() >= max(capacity, MIN_CAPACITY)`.
    ///
    /// Implementations must honor the [`MIN_CAPACITY`] floor even when asked
    /// for zero.
    fn reserve(&mut self, capacity: usize) -> Result<(), BufferError>;

    /// The whole allocated region, `capacity()` units long.
    fn storage(&self) -> &[u8];

    /// Mutable access to the whole allocated region.
    fn storage_mut(&mut self) -> &mut [u8];

    /// The logically held units.
    fn as_bytes(&self) -> &[u8] {
        &self.storage()[..self.size()]
    }

    /// Whether the buffer logically holds nothing.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

// ============================================================================
// Memory Buffer
// ============================================================================

/// Heap-backed [`GrowableBuffer`].
///
/// The backing `Vec` is always exactly `capacity` long; the logical size is
/// tracked on the side so writers can fill storage past it before committing.
///
/// # Example
///
/// ```
/// use streamfmt::{GrowableBuffer, MemoryBuffer};
///
/// let mut buffer = MemoryBuffer::with_capacity(4);
/// buffer.reserve(32).unwrap();
/// assert!(buffer.capacity() >= 32);
/// assert!(buffer.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    data: Vec<u8>,
    size: usize,
}

impl Default for MemoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBuffer {
    /// Create an empty buffer with [`DEFAULT_CAPACITY`] units of storage.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty buffer with exactly `capacity` units of storage.
    ///
    /// A zero capacity is allowed; the first write grows it.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            size: 0,
        }
    }

    /// View the contents as UTF-8, if they are valid.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// The contents as text, replacing invalid UTF-8 sequences.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    /// Consume the buffer, returning only the logical contents.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.data.truncate(self.size);
        self.data
    }

    fn grow_to(&mut self, capacity: usize) -> Result<(), BufferError> {
        let additional = capacity - self.data.len();
        self.data
            .try_reserve_exact(additional)
            .map_err(|source| BufferError::Alloc {
                requested: capacity,
                source,
            })?;
        self.data.resize(capacity, 0);
        Ok(())
    }
}

impl GrowableBuffer for MemoryBuffer {
    fn size(&self) -> usize {
        self.size
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn resize(&mut self, size: usize) -> Result<(), BufferError> {
        if size > self.data.len() {
            self.reserve(size)?;
        }
        self.size = size;
        Ok(())
    }

    fn clear(&mut self) {
        self.size = 0;
    }

    fn reserve(&mut self, capacity: usize) -> Result<(), BufferError> {
        let wanted = capacity.max(MIN_CAPACITY);
        let current = self.data.len();
        if wanted <= current {
            return Ok(());
        }
        // Grow by half again at least, so repeated small requests stay amortized.
        let grown = current
            .checked_add(current / 2)
            .ok_or(BufferError::CapacityOverflow)?;
        self.grow_to(wanted.max(grown))
    }

    fn storage(&self) -> &[u8] {
        &self.data
    }

    fn storage_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

// ============================================================================
// Tests
// ============================================================================
